//! Tree classifier and flattener
//!
//!     Walks a markup subtree and turns it into an ordered list of [`BlockDescriptor`]s.
//!     Each visited node is classified by the first matching rule:
//!
//!     1. A table collapses into one [`TableBlock`]. Only its rows and their cells are read,
//!        nested structure inside a cell contributes text only.
//!     2. A node with element children either matches the atomic-group class marker and
//!        becomes one [`TextBlock`] with the whole subtree's text, or is transparent and its
//!        children are visited in order.
//!     3. A childless image becomes an [`ImageBlock`], sized by [`ClassifyOptions::image_size`].
//!     4. Any other childless node becomes a [`TextBlock`], even when its text is empty.
//!
//!     The output order is therefore the pre-order visitation order of the tree with table
//!     and atomic-group subtrees collapsed.
//!
//!     Classification is a pure function of the tree: the accumulator lives for one call
//!     only, so repeated or interleaved calls cannot see each other's results. It never
//!     fails; unreadable structure degrades to the most permissive classification (text)
//!     and is logged.

use crate::blocks::{
    BlockDescriptor, CellDescriptor, ImageBlock, RowDescriptor, TableBlock, TextBlock,
};
use crate::markup::MarkupNode;
use crate::options::ClassifyOptions;
use log::{debug, warn};

/// HTML limits on span attributes
const MAX_COL_SPAN: u32 = 1000;
const MAX_ROW_SPAN: u32 = 65534;

const ROW_GROUP_TAGS: &[&str] = &["thead", "tbody", "tfoot"];

/// Flatten the subtree rooted at `root` into classified blocks.
pub fn classify<N: MarkupNode>(root: &N, options: &ClassifyOptions) -> Vec<BlockDescriptor> {
    let mut blocks = Vec::new();
    visit(root, options, &mut blocks);
    debug!("classified {} blocks", blocks.len());
    blocks
}

fn visit<N: MarkupNode>(node: &N, options: &ClassifyOptions, out: &mut Vec<BlockDescriptor>) {
    if node.is_tag("table") {
        out.push(BlockDescriptor::Table(table_block(node)));
        return;
    }

    let children = node.children();
    if !children.is_empty() {
        if is_atomic_group(node, options) {
            out.push(BlockDescriptor::Text(atomic_block(node)));
        } else {
            for child in &children {
                visit(child, options, out);
            }
        }
        return;
    }

    if node.is_tag("img") {
        match image_block(node, options) {
            Some(image) => out.push(BlockDescriptor::Image(image)),
            None => {
                warn!("image without a source, exporting as text");
                out.push(BlockDescriptor::Text(text_block(node)));
            }
        }
        return;
    }

    out.push(BlockDescriptor::Text(text_block(node)));
}

fn is_atomic_group<N: MarkupNode>(node: &N, options: &ClassifyOptions) -> bool {
    !options.atomic_group_class.is_empty()
        && node.class_list().contains(&options.atomic_group_class)
}

fn text_block<N: MarkupNode>(node: &N) -> TextBlock {
    TextBlock {
        tag: node.tag_name(),
        text: node.rendered_text(),
        id: node.id(),
        class_list: node.class_list(),
    }
}

/// A whole atomic group as one text run. Groups carry no `id`, so they never become the heading.
fn atomic_block<N: MarkupNode>(node: &N) -> TextBlock {
    TextBlock {
        id: None,
        ..text_block(node)
    }
}

fn image_block<N: MarkupNode>(node: &N, options: &ClassifyOptions) -> Option<ImageBlock> {
    let source_ref = node.source().filter(|src| !src.trim().is_empty())?;
    let (natural_width, natural_height) = node.natural_size();
    let (width, height) = options.image_size(natural_width, natural_height);
    Some(ImageBlock {
        source_ref: source_ref.trim().to_string(),
        width,
        height,
    })
}

fn table_block<N: MarkupNode>(table: &N) -> TableBlock {
    let mut rows = Vec::new();
    for child in table.children() {
        if ROW_GROUP_TAGS.iter().any(|tag| child.is_tag(tag)) {
            for row in child.children() {
                push_row(&row, &mut rows);
            }
        } else {
            push_row(&child, &mut rows);
        }
    }
    TableBlock { rows }
}

fn push_row<N: MarkupNode>(row: &N, rows: &mut Vec<RowDescriptor>) {
    if !row.is_tag("tr") {
        debug!("skipping non-row table child <{}>", row.tag_name());
        return;
    }

    let mut cells = Vec::new();
    for cell in row.children() {
        if cell.is_tag("td") || cell.is_tag("th") {
            cells.push(cell_descriptor(&cell));
        } else {
            warn!("ignoring unreadable <{}> inside a table row", cell.tag_name());
        }
    }

    if cells.is_empty() {
        debug!("skipping table row without cells");
    } else {
        rows.push(RowDescriptor { cells });
    }
}

fn cell_descriptor<N: MarkupNode>(cell: &N) -> CellDescriptor {
    CellDescriptor {
        text: cell.rendered_text(),
        row_span: parse_span(cell.attribute("rowspan").as_deref()).min(MAX_ROW_SPAN),
        col_span: parse_span(cell.attribute("colspan").as_deref()).min(MAX_COL_SPAN),
    }
}

/// Parse a span attribute. Absent, empty, non-numeric and zero values all mean 1.
pub fn parse_span(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|span| *span >= 1)
        .unwrap_or(1)
}
