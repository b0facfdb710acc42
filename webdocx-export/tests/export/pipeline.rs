use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use webdocx_export::model::{ContentElement, TextStyle};
use webdocx_export::{ExportError, ExportOptions, Exporter, SourceFetcher};

use crate::common::{page, report_page, tiny_png, tiny_png_data_uri, ScriptedFetcher};

fn package_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn package_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[tokio::test]
async fn report_scenario_model() {
    let temp = tempdir().unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path());

    let model = exporter.build_model(&report_page(), "export").await.unwrap();

    insta::assert_snapshot!(model.outline(), @r#"
    heading "Report"
    paragraph "Body text."
    table 100% 2 rows
      | 1 [1x1] | 2 [1x1] |
      | 3 [1x1] | 4 [1x1] |
    "#);

    let ContentElement::Paragraph(heading) = &model.elements[0] else {
        panic!("expected heading");
    };
    assert_eq!(heading.style, TextStyle::Heading);
    assert!(heading.format.bold);
}

#[tokio::test]
async fn atomic_group_with_heading_id_stays_body() {
    let temp = tempdir().unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path());
    let html = page(r#"<div id="head-line" class="span-arr"><span>A</span><span>B</span></div>"#);

    let model = exporter.build_model(&html, "export").await.unwrap();

    let ContentElement::Paragraph(paragraph) = &model.elements[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(paragraph.text, "AB");
    assert_eq!(paragraph.style, TextStyle::Body);
}

#[tokio::test]
async fn report_scenario_document() {
    let temp = tempdir().unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path());

    let report = exporter
        .export_document(&report_page(), "export", "report")
        .await
        .unwrap();

    assert_eq!(report.path, temp.path().join("report.docx"));
    assert_eq!((report.blocks, report.elements, report.images), (3, 3, 0));

    let bytes = std::fs::read(&report.path).unwrap();
    assert_eq!(bytes.len(), report.bytes);
    let xml = package_entry(&bytes, "word/document.xml");
    for needle in ["Report", "Body text.", "w:tbl", "w:cantSplit"] {
        assert!(xml.contains(needle), "missing {needle}");
    }
    let first = xml.find(">1<").unwrap();
    let fourth = xml.find(">4<").unwrap();
    assert!(first < fourth);
}

#[tokio::test]
async fn repeated_exports_are_identical() {
    let temp = tempdir().unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path());
    let html = report_page();

    let first = exporter.build_model(&html, "export").await.unwrap();
    let second = exporter.build_model(&html, "export").await.unwrap();
    assert_eq!(first, second);

    let a = exporter.export_document(&html, "export", "a").await.unwrap();
    let b = exporter.export_document(&html, "export", "b").await.unwrap();
    assert_eq!(
        (a.blocks, a.elements, a.images),
        (b.blocks, b.elements, b.images)
    );
    assert_eq!(
        package_entry(&std::fs::read(a.path).unwrap(), "word/document.xml"),
        package_entry(&std::fs::read(b.path).unwrap(), "word/document.xml")
    );
}

#[tokio::test]
async fn images_from_data_uris_and_files() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("dot.png"), tiny_png()).unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path().join("out"))
        .with_fetcher(Arc::new(SourceFetcher::new().with_base_dir(temp.path())));

    let html = page(&format!(
        r#"<p class="sub-title">Charts</p><img src="{}" width="40" height="30"><img src="dot.png">"#,
        tiny_png_data_uri()
    ));

    let model = exporter.build_model(&html, "export").await.unwrap();
    let sizes: Vec<_> = model
        .elements
        .iter()
        .filter_map(|e| match e {
            ContentElement::Image(img) => Some((img.width, img.height)),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![(40, 30), (1, 1)]);

    let report = exporter
        .export_document(&html, "export", "charts.docx")
        .await
        .unwrap();
    assert_eq!(report.images, 2);
    assert!(report.path.ends_with("out/charts.docx"));

    let bytes = std::fs::read(&report.path).unwrap();
    assert!(package_names(&bytes)
        .iter()
        .any(|name| name.starts_with("word/media/")));
}

#[tokio::test]
async fn failed_image_saves_nothing() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let exporter = Exporter::with_defaults(ExportOptions::default(), &out)
        .with_fetcher(Arc::new(SourceFetcher::new().with_base_dir(temp.path())));

    let err = exporter
        .export_document(&page(r#"<img src="missing.png">"#), "export", "x")
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::ResourceFetch { ref source_ref, .. } if source_ref == "missing.png"));
    assert!(!out.exists());
}

#[tokio::test]
async fn undecodable_image_is_a_fetch_error() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("bad.png"), b"not an image").unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path())
        .with_fetcher(Arc::new(SourceFetcher::new().with_base_dir(temp.path())));

    let err = exporter
        .build_model(&page(r#"<img src="bad.png">"#), "export")
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::ResourceFetch { .. }));
}

#[tokio::test(start_paused = true)]
async fn spawned_export_can_be_cancelled() {
    let temp = tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().serve("slow.png", Duration::from_secs(5));
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path())
        .with_fetcher(Arc::new(fetcher.clone()));

    let handle = exporter.spawn(
        page(r#"<p>x</p><img src="slow.png">"#),
        "export".to_string(),
        "cancelled".to_string(),
    );
    handle.cancel();

    assert!(matches!(handle.wait().await, Err(ExportError::Cancelled)));
    assert!(!temp.path().join("cancelled.docx").exists());
    assert!(fetcher.completed().is_empty());
}

#[tokio::test]
async fn spawned_export_completes() {
    let temp = tempdir().unwrap();
    let exporter = Exporter::with_defaults(ExportOptions::default(), temp.path());

    let report = exporter
        .spawn(report_page(), "export".to_string(), "bg".to_string())
        .wait()
        .await
        .unwrap();
    assert!(report.path.exists());
}
