// Command-line interface for webdocx
//
// This binary exports a container of an HTML page as a DOCX document, and can show the
// intermediate stages of that export for debugging.
//
// Usage:
//  webdocx <input.html> --container <class> [--name <file>] [-o <dir>]   - Export (default)
//  webdocx export <input.html> --container <class> ...                   - Same as above (explicit)
//  webdocx inspect <input.html> --container <class> [<transform>]        - Show blocks or model
//  webdocx --list-transforms                                             - List available transforms
//
// Extra Parameters:
//
// Configuration knobs can be overridden with --extra-<key> <value>.
// The CLI layer strips the "extra-" prefix and applies the known keys to the loaded config.
// Example:
//  webdocx page.html --container report --extra-timeout-ms 2000 --extra-retries 0

use webdocx_cli::transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;
use webdocx_config::{Loader, WebdocxConfig};
use webdocx_export::{Exporter, SourceFetcher};

const SUBCOMMANDS: &[&str] = &["export", "inspect", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn container_arg() -> Arg {
    Arg::new("container")
        .long("container")
        .short('c')
        .value_name("CLASS")
        .help("Class name of the element to export (first match wins)")
        .required(true)
        .value_hint(ValueHint::Other)
}

fn base_url_arg() -> Arg {
    Arg::new("base-url")
        .long("base-url")
        .value_name("URL")
        .help("Resolve relative image references against this URL")
        .value_hint(ValueHint::Url)
}

fn build_cli() -> Command {
    Command::new("webdocx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export a rendered HTML view as an editable DOCX document")
        .long_about(
            "webdocx turns a container of an HTML page into a word processing document.\n\n\
            Commands:\n  \
            - export:  Write the container as <name>.docx (default command)\n  \
            - inspect: Show the classified blocks or the assembled content model\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration knobs:\n  \
            timeout-ms, retries, backoff-ms, atomic-class, heading-id,\n  \
            subheading-class, output-dir.\n\n\
            Examples:\n  \
            webdocx page.html --container report                 # Writes ./document.docx\n  \
            webdocx page.html -c report --name q3 -o out         # Writes out/q3.docx\n  \
            webdocx inspect page.html -c report model-outline    # Show the content model"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a webdocx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Export a container as a DOCX document (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input HTML file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(container_arg())
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .value_name("FILE")
                        .help("Output file name, '.docx' is appended when missing")
                        .default_value("document"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("DIR")
                        .help("Output directory (defaults to [output] dir from config)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(base_url_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the intermediate stages of an export")
                .long_about(
                    "View the classified blocks or the assembled content model.\n\n\
                    Transforms (stage-format):\n  \
                    - blocks-outline: Classified blocks, one per line (default)\n  \
                    - blocks-json:    Classified blocks as JSON\n  \
                    - model-outline:  Content model, one element per line\n  \
                    - model-json:     Content model as JSON\n\n\
                    model-* transforms fetch images, like a real export does."
                )
                .arg(
                    Arg::new("path")
                        .help("Input HTML file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'blocks-outline'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(container_arg())
                .arg(base_url_arg()),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "export"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "export".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        log::warn!("ignoring unknown parameter --extra-{key}");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        });

    match matches.subcommand() {
        Some(("export", sub_matches)) => runtime.block_on(handle_export_command(sub_matches, &config)),
        Some(("inspect", sub_matches)) => {
            runtime.block_on(handle_inspect_command(sub_matches, &config))
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Build an exporter whose file references resolve next to the input page.
fn build_exporter(
    input: &str,
    base_url: Option<&str>,
    output_dir: PathBuf,
    config: &WebdocxConfig,
) -> Exporter {
    let base_dir = Path::new(input)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut fetcher = SourceFetcher::new().with_base_dir(base_dir);
    if let Some(raw) = base_url.or_else(|| config.base_url()) {
        let url = Url::parse(raw).unwrap_or_else(|e| {
            eprintln!("Invalid base URL '{raw}': {e}");
            std::process::exit(1);
        });
        fetcher = fetcher.with_base_url(url);
    }

    Exporter::with_defaults(config.export_options(), output_dir).with_fetcher(Arc::new(fetcher))
}

/// Handle the export command
async fn handle_export_command(matches: &ArgMatches, config: &WebdocxConfig) {
    let input = required(matches, "input");
    let container = required(matches, "container");
    let name = required(matches, "name");
    let output_dir = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output.dir.clone());
    let base_url = matches.get_one::<String>("base-url").map(|s| s.as_str());

    let html = read_input(input);
    let exporter = build_exporter(input, base_url, output_dir, config);

    match exporter.export_document(&html, container, name).await {
        Ok(report) => println!("{}", report.path.display()),
        Err(e) => {
            eprintln!("Export failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle the inspect command
async fn handle_inspect_command(matches: &ArgMatches, config: &WebdocxConfig) {
    let path = required(matches, "path");
    let container = required(matches, "container");
    let transform = matches
        .get_one::<String>("transform")
        .map(|s| s.as_str())
        .unwrap_or(transforms::DEFAULT_TRANSFORM);
    let base_url = matches.get_one::<String>("base-url").map(|s| s.as_str());

    let html = read_input(path);
    let exporter = build_exporter(path, base_url, config.output.dir.clone(), config);

    let output = transforms::execute_transform(&exporter, &html, container, transform)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  blocks      - Classified block descriptors");
    println!("  model       - Assembled content model (fetches images)\n");

    println!("Formats:");
    println!("  json        - JSON output");
    println!("  outline     - One line per block or element\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Missing required argument '{id}'");
            std::process::exit(1);
        })
}

fn load_cli_config(explicit_path: Option<&str>) -> WebdocxConfig {
    let loader = Loader::new().with_optional_file("webdocx.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut WebdocxConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["timeout-ms", "timeout"]) {
        config.fetch.timeout_ms = parse_number_arg("timeout-ms", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["retries"]) {
        config.fetch.retries = parse_number_arg("retries", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["backoff-ms", "backoff"]) {
        config.fetch.backoff_ms = parse_number_arg("backoff-ms", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["no-retry"]) {
        if parse_bool_arg("no-retry", &raw) {
            config.fetch.retries = 0;
        }
    }

    if let Some(raw) = take_override(extra_params, &["atomic-class", "atomic-group-class"]) {
        config.classify.atomic_group_class = raw;
    }
    if let Some(raw) = take_override(extra_params, &["heading-id"]) {
        config.style.heading_id = raw;
    }
    if let Some(raw) = take_override(extra_params, &["subheading-class"]) {
        config.style.subheading_class = raw;
    }

    if let Some(raw) = take_override(extra_params, &["output-dir"]) {
        config.output.dir = PathBuf::from(raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_number_arg<T: std::str::FromStr>(flag: &str, raw: &str) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        eprintln!("Invalid number '{raw}' for --extra-{flag}");
        std::process::exit(1);
    })
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
