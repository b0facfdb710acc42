//! Inspection transforms
//!
//! Each transform is a stage + format combination (e.g., "blocks-json", "model-outline").
//!
//! ## Stages
//!
//! 1. **Classification** - HTML container → block descriptors
//!    - `blocks-json`: Blocks as JSON
//!    - `blocks-outline`: One line per block, tables expanded per row
//!
//! 2. **Assembly** - Blocks → content model (fetches images)
//!    - `model-json`: Content model as JSON, image bytes summarized as a count
//!    - `model-outline`: One line per element with resolved styles and spans

use webdocx_export::blocks::outline;
use webdocx_export::Exporter;

/// All available inspect transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "blocks-json",
    "blocks-outline",
    "model-json",
    "model-outline",
];

pub const DEFAULT_TRANSFORM: &str = "blocks-outline";

/// Execute a named transform on the container `container` of an HTML page.
///
/// Returns the rendered output, or an error message.
pub async fn execute_transform(
    exporter: &Exporter,
    html: &str,
    container: &str,
    transform_name: &str,
) -> Result<String, String> {
    let unknown = || format!("Unknown transform: {transform_name}");
    let (stage, format) = transform_name.split_once('-').ok_or_else(unknown)?;
    if !matches!(format, "json" | "outline") {
        return Err(unknown());
    }

    match stage {
        "blocks" => {
            let blocks = exporter
                .classify(html, container)
                .map_err(|e| e.to_string())?;
            if format == "json" {
                json_output(serde_json::to_string_pretty(&blocks))
            } else {
                Ok(outline(&blocks))
            }
        }
        "model" => {
            let model = exporter
                .build_model(html, container)
                .await
                .map_err(|e| e.to_string())?;
            if format == "json" {
                json_output(serde_json::to_string_pretty(&model))
            } else {
                Ok(model.outline())
            }
        }
        _ => Err(unknown()),
    }
}

fn json_output(rendered: serde_json::Result<String>) -> Result<String, String> {
    rendered
        .map(|json| format!("{json}\n"))
        .map_err(|e| format!("JSON serialization failed: {e}"))
}
