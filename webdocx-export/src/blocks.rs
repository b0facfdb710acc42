//! Classified content units produced by the tree flattener.

use serde::Serialize;
use std::fmt::Write;

/// One content unit extracted from the markup tree, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockDescriptor {
    Table(TableBlock),
    Image(ImageBlock),
    Text(TextBlock),
}

/// A whole table, collapsed into one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub rows: Vec<RowDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDescriptor {
    pub cells: Vec<CellDescriptor>,
}

/// A table cell. Spans are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellDescriptor {
    pub text: String,
    pub row_span: u32,
    pub col_span: u32,
}

impl CellDescriptor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn with_spans(mut self, row_span: u32, col_span: u32) -> Self {
        self.row_span = row_span.max(1);
        self.col_span = col_span.max(1);
        self
    }
}

/// An image to embed.
///
/// `width`/`height` are the export size in pixels. A zero dimension means the markup
/// environment could not report a rendered size; assembly then falls back to the
/// intrinsic size of the fetched image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub source_ref: String,
    pub width: u32,
    pub height: u32,
}

impl ImageBlock {
    pub fn has_known_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A run of text from a leaf element or an atomic group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub tag: String,
    pub text: String,
    pub id: Option<String>,
    pub class_list: String,
}

impl BlockDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockDescriptor::Table(_) => "table",
            BlockDescriptor::Image(_) => "image",
            BlockDescriptor::Text(_) => "text",
        }
    }
}

/// Render blocks as a compact, line-oriented outline.
///
/// ```text
/// text H1#head-line "Report"
/// image 640x480 chart.png
/// table 2 rows
///   | 1 | 2 (colspan=2) |
/// ```
pub fn outline(blocks: &[BlockDescriptor]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            BlockDescriptor::Text(text) => {
                let _ = write!(out, "text {}", text.tag);
                if let Some(id) = &text.id {
                    let _ = write!(out, "#{id}");
                }
                for class in text.class_list.split_whitespace() {
                    let _ = write!(out, ".{class}");
                }
                let _ = writeln!(out, " {:?}", text.text);
            }
            BlockDescriptor::Image(image) => {
                let _ = writeln!(
                    out,
                    "image {}x{} {}",
                    image.width, image.height, image.source_ref
                );
            }
            BlockDescriptor::Table(table) => {
                let _ = writeln!(out, "table {} rows", table.rows.len());
                for row in &table.rows {
                    let cells: Vec<String> = row.cells.iter().map(cell_label).collect();
                    let _ = writeln!(out, "  | {} |", cells.join(" | "));
                }
            }
        }
    }
    out
}

fn cell_label(cell: &CellDescriptor) -> String {
    let mut label = cell.text.clone();
    if cell.row_span > 1 {
        let _ = write!(label, " (rowspan={})", cell.row_span);
    }
    if cell.col_span > 1 {
        let _ = write!(label, " (colspan={})", cell.col_span);
    }
    label
}
