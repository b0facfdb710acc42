use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "blocks-json",
    "blocks-outline",
    "model-json",
    "model-outline",
];

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

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("webdocx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export a rendered HTML view as an editable DOCX document")
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
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(container_arg())
                .arg(base_url_arg()),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "webdocx", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "webdocx", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "webdocx", &outdir)?;

    Ok(())
}
