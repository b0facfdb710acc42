//! Document encoders
//!
//! An encoder turns a finished [`ContentModel`] into the bytes of an output file. It
//! makes no formatting decisions of its own: styles, spans and sizes arrive resolved.

mod docx;
pub mod grid;

pub use docx::DocxEncoder;

use crate::error::{ExportError, Result};
use crate::model::{ContentElement, ContentModel};

/// Serializes a content model into a document container.
///
/// # Examples
///
/// ```ignore
/// struct PlainText;
///
/// impl DocumentEncoder for PlainText {
///     fn name(&self) -> &str {
///         "text"
///     }
///
///     fn extension(&self) -> &str {
///         "txt"
///     }
///
///     fn encode(&self, model: &ContentModel) -> Result<Vec<u8>> {
///         Ok(model.outline().into_bytes())
///     }
/// }
/// ```
pub trait DocumentEncoder: Send + Sync {
    /// The name of this encoder (e.g., "docx")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extension of the produced document, without the leading dot
    fn extension(&self) -> &str;

    fn encode(&self, model: &ContentModel) -> Result<Vec<u8>>;
}

/// Reject models no encoder can represent.
///
/// Models built by the assembler always pass; this guards hand-built ones.
pub fn validate(model: &ContentModel) -> Result<()> {
    for element in &model.elements {
        match element {
            ContentElement::Table(table) => {
                if table.rows.is_empty() {
                    return Err(ExportError::Encoding("table without rows".to_string()));
                }
                for cell in table.rows.iter().flat_map(|row| row.cells.iter()) {
                    if cell.row_span == 0 || cell.col_span == 0 {
                        return Err(ExportError::Encoding(format!(
                            "invalid span {}x{} on cell '{}'",
                            cell.row_span, cell.col_span, cell.text
                        )));
                    }
                }
            }
            ContentElement::Image(image) => {
                if image.bytes.is_empty() {
                    return Err(ExportError::Encoding(format!(
                        "image '{}' has no data",
                        image.source_ref
                    )));
                }
            }
            ContentElement::Paragraph(_) => {}
        }
    }
    Ok(())
}
