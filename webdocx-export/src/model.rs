//! Document content model
//!
//! The style-resolved, ordered list of block elements handed to a
//! [`DocumentEncoder`](crate::encode::DocumentEncoder). Every formatting decision has
//! already been made here; encoders only translate.

use crate::blocks::TextBlock;
use crate::options::StyleRules;
use serde::{Serialize, Serializer};
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentModel {
    pub elements: Vec<ContentElement>,
}

impl ContentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: ContentElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, ContentElement::Image(_)))
            .count()
    }

    /// Plain-text outline, one line per element (tables add one line per row).
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                ContentElement::Paragraph(para) => {
                    let label = match para.style {
                        TextStyle::Heading => "heading",
                        TextStyle::Subheading => "subheading",
                        TextStyle::Body => "paragraph",
                    };
                    let _ = writeln!(out, "{label} {:?}", para.text);
                }
                ContentElement::Table(table) => {
                    let _ = writeln!(
                        out,
                        "table {}% {} rows",
                        table.width_percent,
                        table.rows.len()
                    );
                    for row in &table.rows {
                        let cells: Vec<String> = row
                            .cells
                            .iter()
                            .map(|c| format!("{} [{}x{}]", c.text, c.row_span, c.col_span))
                            .collect();
                        let _ = writeln!(out, "  | {} |", cells.join(" | "));
                    }
                }
                ContentElement::Image(image) => {
                    let _ = writeln!(
                        out,
                        "image {}x{} {} ({} bytes)",
                        image.width,
                        image.height,
                        image.source_ref,
                        image.bytes.len()
                    );
                }
            }
        }
        out
    }
}

/// A block-level element of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentElement {
    Paragraph(StyledParagraph),
    Table(TableElement),
    Image(ImageElement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Heading,
    Subheading,
    Body,
}

impl TextStyle {
    /// Pick the style for a text block.
    ///
    /// The heading marker is matched exactly against the `id`; the subheading marker is
    /// matched anywhere in the class list.
    pub fn select(block: &TextBlock, rules: &StyleRules) -> Self {
        if block.id.as_deref() == Some(rules.heading_id.as_str()) {
            TextStyle::Heading
        } else if !rules.subheading_class.is_empty()
            && block.class_list.contains(&rules.subheading_class)
        {
            TextStyle::Subheading
        } else {
            TextStyle::Body
        }
    }

    pub fn format(self, rules: &StyleRules) -> ParagraphFormat {
        match self {
            TextStyle::Heading => ParagraphFormat {
                font_size: Some(rules.heading_font_size),
                bold: true,
                alignment: Alignment::Center,
                spacing_after: rules.spacing_after,
                first_line_indent: None,
            },
            TextStyle::Subheading => ParagraphFormat {
                font_size: Some(rules.subheading_font_size),
                bold: true,
                alignment: Alignment::Start,
                spacing_after: rules.spacing_after,
                first_line_indent: None,
            },
            TextStyle::Body => ParagraphFormat {
                font_size: None,
                bold: false,
                alignment: Alignment::Start,
                spacing_after: rules.spacing_after,
                first_line_indent: Some(rules.first_line_indent),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Resolved paragraph formatting. Font sizes are half-points, spacing twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParagraphFormat {
    /// `None` keeps the document default size
    pub font_size: Option<usize>,
    pub bold: bool,
    pub alignment: Alignment,
    pub spacing_after: u32,
    pub first_line_indent: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledParagraph {
    pub style: TextStyle,
    pub text: String,
    pub format: ParagraphFormat,
}

impl StyledParagraph {
    pub fn from_block(block: &TextBlock, rules: &StyleRules) -> Self {
        let style = TextStyle::select(block, rules);
        Self {
            style,
            text: block.text.clone(),
            format: style.format(rules),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableElement {
    /// Share of the available page width
    pub width_percent: u32,
    pub rows: Vec<TableRowElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRowElement {
    pub cells: Vec<TableCellElement>,
    /// Keep the row on one page
    pub cant_split: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCellElement {
    pub text: String,
    pub row_span: u32,
    pub col_span: u32,
    pub alignment: Alignment,
    pub vertical_align: VerticalAlign,
}

/// A centered paragraph holding one embedded picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageElement {
    pub source_ref: String,
    /// Encoded picture (PNG or JPEG)
    #[serde(serialize_with = "serialize_byte_count")]
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub alignment: Alignment,
}

#[allow(clippy::ptr_arg)]
fn serialize_byte_count<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(bytes.len() as u64)
}
