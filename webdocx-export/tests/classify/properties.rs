use proptest::prelude::*;
use webdocx_export::blocks::BlockDescriptor;
use webdocx_export::classify::parse_span;
use webdocx_export::{classify_html, ClassifyOptions};

use crate::common::page;

/// Wrap `text` in `depth` transparent containers.
fn nested_paragraph(depth: usize, text: &str) -> String {
    format!(
        "{}<p>{text}</p>{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    )
}

proptest! {
    #[test]
    fn order_matches_preorder(items in prop::collection::vec((0usize..4, "[a-z]{1,8}"), 1..12)) {
        let body: String = items
            .iter()
            .map(|(depth, text)| nested_paragraph(*depth, text))
            .collect();

        let blocks = classify_html(&page(&body), "export", &ClassifyOptions::default()).unwrap();

        let texts: Vec<String> = blocks
            .into_iter()
            .map(|b| match b {
                BlockDescriptor::Text(t) => t.text,
                other => panic!("unexpected block {other:?}"),
            })
            .collect();
        let expected: Vec<String> = items.into_iter().map(|(_, text)| text).collect();
        prop_assert_eq!(texts, expected);
    }

    #[test]
    fn spans_are_always_positive(raw in proptest::option::of("\\PC{0,8}")) {
        prop_assert!(parse_span(raw.as_deref()) >= 1);
    }

    #[test]
    fn numeric_spans_survive(span in 1u32..1000) {
        prop_assert_eq!(parse_span(Some(&span.to_string())), span);
    }

    #[test]
    fn image_size_policy(width in 1u32..3000, height in 1u32..3000) {
        let body = format!(r#"<img src="a.png" width="{width}" height="{height}">"#);
        let blocks = classify_html(&page(&body), "export", &ClassifyOptions::default()).unwrap();

        let BlockDescriptor::Image(image) = &blocks[0] else {
            panic!("expected an image");
        };
        if width > 900 {
            prop_assert_eq!((image.width, image.height), (700, 350));
        } else {
            prop_assert_eq!((image.width, image.height), (width, height));
        }
    }
}

#[test]
fn image_size_boundary() {
    let options = ClassifyOptions::default();
    assert_eq!(options.image_size(900, 600), (900, 600));
    assert_eq!(options.image_size(901, 600), (700, 350));
}
