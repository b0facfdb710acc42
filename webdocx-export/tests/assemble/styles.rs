use webdocx_export::assemble::assemble;
use webdocx_export::blocks::{BlockDescriptor, CellDescriptor, RowDescriptor, TableBlock, TextBlock};
use webdocx_export::model::{Alignment, ContentElement, TextStyle, VerticalAlign};
use webdocx_export::{CancellationToken, ExportOptions};

use crate::common::ScriptedFetcher;

fn text(id: Option<&str>, class_list: &str, text: &str) -> BlockDescriptor {
    BlockDescriptor::Text(TextBlock {
        tag: "P".to_string(),
        text: text.to_string(),
        id: id.map(str::to_string),
        class_list: class_list.to_string(),
    })
}

async fn build(blocks: &[BlockDescriptor]) -> Vec<ContentElement> {
    assemble(
        blocks,
        &ScriptedFetcher::new(),
        &ExportOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap()
    .elements
}

#[tokio::test]
async fn style_selection() {
    let elements = build(&[
        text(Some("head-line"), "", "Title"),
        text(Some("head-line-2"), "", "Almost"),
        text(None, "big sub-title", "Section"),
        text(None, "", "Body"),
    ])
    .await;

    let styles: Vec<_> = elements
        .iter()
        .map(|e| match e {
            ContentElement::Paragraph(p) => p.style,
            other => panic!("expected paragraph, got {other:?}"),
        })
        .collect();
    assert_eq!(
        styles,
        vec![
            TextStyle::Heading,
            TextStyle::Body,
            TextStyle::Subheading,
            TextStyle::Body
        ]
    );

    let ContentElement::Paragraph(body) = &elements[3] else {
        unreachable!()
    };
    assert_eq!(body.format.first_line_indent, Some(500));
    for element in &elements {
        if let ContentElement::Paragraph(p) = element {
            assert_eq!(p.format.spacing_after, 200);
        }
    }
}

#[tokio::test]
async fn tables_are_centered_and_unsplittable() {
    let table = TableBlock {
        rows: vec![
            RowDescriptor { cells: vec![] },
            RowDescriptor {
                cells: vec![CellDescriptor::new("a").with_spans(2, 1), CellDescriptor::new("b")],
            },
        ],
    };

    let elements = build(&[BlockDescriptor::Table(table)]).await;

    let ContentElement::Table(table) = &elements[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.width_percent, 100);
    assert_eq!(table.rows.len(), 1);
    assert!(table.rows[0].cant_split);
    assert!(table.rows[0]
        .cells
        .iter()
        .all(|c| c.alignment == Alignment::Center && c.vertical_align == VerticalAlign::Center));
    assert_eq!(table.rows[0].cells[0].row_span, 2);
}

#[tokio::test]
async fn table_without_rows_is_dropped() {
    let elements = build(&[
        BlockDescriptor::Table(TableBlock {
            rows: vec![RowDescriptor { cells: vec![] }],
        }),
        text(None, "", "after"),
    ])
    .await;
    assert_eq!(elements.len(), 1);
}
