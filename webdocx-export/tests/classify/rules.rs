use webdocx_export::blocks::{outline, BlockDescriptor, CellDescriptor};
use webdocx_export::{classify_html, ClassifyOptions, ExportError};

use crate::common::{page, report_page, tiny_png_data_uri};

fn classify(body: &str) -> Vec<BlockDescriptor> {
    classify_html(&page(body), "export", &ClassifyOptions::default()).unwrap()
}

#[test]
fn report_page_flattens_in_document_order() {
    let blocks = classify_html(&report_page(), "export", &ClassifyOptions::default()).unwrap();

    insta::assert_snapshot!(outline(&blocks), @r#"
    text H1#head-line "Report"
    text P "Body text."
    table 2 rows
      | 1 | 2 |
      | 3 | 4 |
    "#);
}

#[test]
fn nested_containers_interleave_with_siblings() {
    let blocks = classify(
        r#"<p>a</p>
           <div><p>b</p><section><p>c</p></section></div>
           <p>d</p>"#,
    );

    let texts: Vec<_> = blocks
        .iter()
        .map(|b| match b {
            BlockDescriptor::Text(t) => t.text.as_str(),
            _ => "?",
        })
        .collect();
    assert_eq!(texts, vec!["a", "b", "c", "d"]);
}

#[test]
fn atomic_group_is_one_text_block() {
    let blocks = classify(
        r#"<div class="row span-arr"><span>Total:</span> <b>42</b><p>units</p></div><p>after</p>"#,
    );

    assert_eq!(blocks.len(), 2);
    match &blocks[0] {
        BlockDescriptor::Text(text) => {
            assert_eq!(text.tag, "DIV");
            assert_eq!(text.text, "Total: 42\nunits");
            assert_eq!(text.class_list, "row span-arr");
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn empty_leaf_is_kept() {
    let blocks = classify(r#"<p></p><hr><p>x</p>"#);
    assert_eq!(blocks.len(), 3);
    assert!(matches!(&blocks[0], BlockDescriptor::Text(t) if t.text.is_empty() && t.tag == "P"));
    assert!(matches!(&blocks[1], BlockDescriptor::Text(t) if t.tag == "HR"));
}

#[test]
fn empty_rows_are_skipped() {
    let blocks = classify(
        r#"<table>
             <thead><tr><th>h1</th><th>h2</th></tr></thead>
             <tbody><tr></tr><tr><td>1</td><td>2</td></tr></tbody>
           </table>"#,
    );

    let BlockDescriptor::Table(table) = &blocks[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells[0], CellDescriptor::new("h1"));
    assert_eq!(table.rows[1].cells[1], CellDescriptor::new("2"));
}

#[test]
fn block_children_of_a_cell_keep_their_lines() {
    let blocks = classify(
        r#"<table><tr>
             <td><div>line one</div><div>line two</div></td>
             <td><p>Name</p><p>Value</p></td>
             <td>a<br>b <i>c</i></td>
           </tr></table>"#,
    );

    let BlockDescriptor::Table(table) = &blocks[0] else {
        panic!("expected a table");
    };
    let texts: Vec<_> = table.rows[0].cells.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["line one\nline two", "Name\nValue", "a\nb c"]);
}

#[test]
fn spans_are_read_and_normalized() {
    let blocks = classify(
        r#"<table><tr>
             <td rowspan="2">a</td><td colspan="3">b</td><td colspan="x">c</td><td rowspan="0">d</td>
           </tr></table>"#,
    );

    let BlockDescriptor::Table(table) = &blocks[0] else {
        panic!("expected a table");
    };
    let spans: Vec<_> = table.rows[0]
        .cells
        .iter()
        .map(|c| (c.row_span, c.col_span))
        .collect();
    assert_eq!(spans, vec![(2, 1), (1, 3), (1, 1), (1, 1)]);
}

#[test]
fn table_content_is_not_classified_separately() {
    let blocks = classify(r#"<table><tr><td><p>x</p><img src="a.png"></td></tr></table>"#);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), "table");
}

#[test]
fn images_carry_source_and_size() {
    let src = tiny_png_data_uri();
    let blocks = classify(&format!(
        r#"<img src="{src}" width="320" height="200"><img src="wide.png" width="1200" height="90"><img src="plain.png">"#
    ));

    let sizes: Vec<_> = blocks
        .iter()
        .map(|b| match b {
            BlockDescriptor::Image(img) => (img.width, img.height),
            other => panic!("expected image, got {other:?}"),
        })
        .collect();
    assert_eq!(sizes, vec![(320, 200), (700, 350), (0, 0)]);
}

#[test]
fn image_without_source_degrades_to_text() {
    let blocks = classify(r#"<img alt="missing">"#);
    assert_eq!(blocks[0].kind(), "text");
}

#[test]
fn custom_atomic_marker() {
    let options = ClassifyOptions {
        atomic_group_class: "keep".to_string(),
        ..ClassifyOptions::default()
    };
    let html = page(r#"<div class="keep"><p>a</p><p>b</p></div><div class="span-arr"><p>c</p></div>"#);

    let blocks = classify_html(&html, "export", &options).unwrap();
    assert_eq!(blocks.len(), 2);
}

#[test]
fn missing_container() {
    let err = classify_html(&page("<p>x</p>"), "nope", &ClassifyOptions::default()).unwrap_err();
    assert!(matches!(err, ExportError::ContainerNotFound(_)));
}

#[test]
fn classification_is_repeatable() {
    let html = report_page();
    let options = ClassifyOptions::default();
    let first = classify_html(&html, "export", &options).unwrap();
    let second = classify_html(&html, "export", &options).unwrap();
    assert_eq!(first, second);
}
