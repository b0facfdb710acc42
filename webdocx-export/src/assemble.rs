//! Document assembler
//!
//!     Turns the classified block list into a [`ContentModel`] in two phases:
//!
//!     1. Scatter/gather: every image fetch starts immediately and the results are
//!        joined back by position, so completion order never affects output order.
//!     2. One synchronous pass over the now fully resolved blocks builds the model,
//!        applying the style rules to text and the table layout rules to tables.
//!
//!     Any failed fetch fails the whole assembly; the model is never built with holes.
//!     Fetches run concurrently on the calling task, no threads are spawned.

use crate::blocks::{BlockDescriptor, ImageBlock, TableBlock};
use crate::error::{ExportError, Result};
use crate::fetch::{fetch_with_policy, prepare_image, ResourceFetcher};
use crate::model::{
    Alignment, ContentElement, ContentModel, ImageElement, StyledParagraph, TableCellElement,
    TableElement, TableRowElement, VerticalAlign,
};
use crate::options::{ExportOptions, StyleRules};
use futures::future::try_join_all;
use log::debug;
use tokio_util::sync::CancellationToken;

/// Resolve images and build the content model for `blocks`.
pub async fn assemble(
    blocks: &[BlockDescriptor],
    fetcher: &dyn ResourceFetcher,
    options: &ExportOptions,
    cancel: &CancellationToken,
) -> Result<ContentModel> {
    let slots = try_join_all(blocks.iter().map(|block| async move {
        match block {
            BlockDescriptor::Image(image) => resolve_image(image, fetcher, options).await.map(Some),
            _ => Ok(None),
        }
    }));

    let mut resolved = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ExportError::Cancelled),
        gathered = slots => gathered?,
    };

    let mut model = ContentModel::new();
    for (block, slot) in blocks.iter().zip(resolved.iter_mut()) {
        match block {
            BlockDescriptor::Text(text) => {
                model.push(ContentElement::Paragraph(StyledParagraph::from_block(
                    text,
                    &options.style,
                )));
            }
            BlockDescriptor::Table(table) => match table_element(table, &options.style) {
                Some(element) => model.push(ContentElement::Table(element)),
                None => debug!("dropping table without rows"),
            },
            BlockDescriptor::Image(_) => {
                if let Some(image) = slot.take() {
                    model.push(ContentElement::Image(image));
                }
            }
        }
    }

    debug!(
        "assembled {} elements ({} images)",
        model.len(),
        model.image_count()
    );
    Ok(model)
}

async fn resolve_image(
    block: &ImageBlock,
    fetcher: &dyn ResourceFetcher,
    options: &ExportOptions,
) -> Result<ImageElement> {
    let fetch_error = |source| ExportError::ResourceFetch {
        source_ref: block.source_ref.clone(),
        source,
    };

    let bytes = fetch_with_policy(fetcher, &block.source_ref, &options.fetch)
        .await
        .map_err(fetch_error)?;
    let prepared = prepare_image(bytes).map_err(fetch_error)?;

    let (width, height) = if block.has_known_size() {
        (block.width, block.height)
    } else {
        options
            .classify
            .image_size(prepared.width, prepared.height)
    };

    Ok(ImageElement {
        source_ref: block.source_ref.clone(),
        bytes: prepared.bytes,
        width,
        height,
        alignment: Alignment::Center,
    })
}

/// Build a table element; rows without cells are dropped, as is a table left empty.
pub fn table_element(table: &TableBlock, rules: &StyleRules) -> Option<TableElement> {
    let rows: Vec<TableRowElement> = table
        .rows
        .iter()
        .filter(|row| !row.cells.is_empty())
        .map(|row| TableRowElement {
            cells: row
                .cells
                .iter()
                .map(|cell| TableCellElement {
                    text: cell.text.clone(),
                    row_span: cell.row_span.max(1),
                    col_span: cell.col_span.max(1),
                    alignment: Alignment::Center,
                    vertical_align: VerticalAlign::Center,
                })
                .collect(),
            cant_split: true,
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(TableElement {
        width_percent: rules.table_width_percent,
        rows,
    })
}
