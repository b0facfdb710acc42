use std::time::Duration;

use webdocx_export::assemble::assemble;
use webdocx_export::blocks::{BlockDescriptor, ImageBlock, TextBlock};
use webdocx_export::model::ContentElement;
use webdocx_export::{CancellationToken, ExportError, ExportOptions, FetchError};

use crate::common::ScriptedFetcher;

fn text(text: &str) -> BlockDescriptor {
    BlockDescriptor::Text(TextBlock {
        tag: "P".to_string(),
        text: text.to_string(),
        id: None,
        class_list: String::new(),
    })
}

fn image(source_ref: &str) -> BlockDescriptor {
    BlockDescriptor::Image(ImageBlock {
        source_ref: source_ref.to_string(),
        width: 10,
        height: 10,
    })
}

fn labels(elements: &[ContentElement]) -> Vec<String> {
    elements
        .iter()
        .map(|e| match e {
            ContentElement::Paragraph(p) => p.text.clone(),
            ContentElement::Image(i) => i.source_ref.clone(),
            ContentElement::Table(_) => "table".to_string(),
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn images_keep_input_order_when_fetches_finish_out_of_order() {
    let fetcher = ScriptedFetcher::new()
        .serve("a.png", Duration::from_millis(300))
        .serve("b.png", Duration::from_millis(10));
    let blocks = vec![text("intro"), image("a.png"), image("b.png")];

    let model = assemble(
        &blocks,
        &fetcher,
        &ExportOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(fetcher.completed(), vec!["b.png", "a.png"]);
    assert_eq!(labels(&model.elements), vec!["intro", "a.png", "b.png"]);
}

#[tokio::test(start_paused = true)]
async fn fetches_run_concurrently() {
    let fetcher = ScriptedFetcher::new()
        .serve("a.png", Duration::from_secs(1))
        .serve("b.png", Duration::from_secs(1))
        .serve("c.png", Duration::from_secs(1));
    let blocks = vec![image("a.png"), image("b.png"), image("c.png")];

    let started = tokio::time::Instant::now();
    assemble(
        &blocks,
        &fetcher,
        &ExportOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_aborts_assembly() {
    let fetcher = ScriptedFetcher::new().serve("a.png", Duration::from_millis(5));
    let blocks = vec![image("a.png"), text("between"), image("gone.png")];

    let err = assemble(
        &blocks,
        &fetcher,
        &ExportOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    match err {
        ExportError::ResourceFetch { source_ref, source } => {
            assert_eq!(source_ref, "gone.png");
            assert!(matches!(source, FetchError::Io(_)));
        }
        other => panic!("expected a fetch error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_fetch_times_out() {
    let fetcher = ScriptedFetcher::new().serve("slow.png", Duration::from_secs(3600));
    let mut options = ExportOptions::default();
    options.fetch.retries = 0;

    let err = assemble(&[image("slow.png")], &fetcher, &options, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExportError::ResourceFetch {
            source: FetchError::Timeout(_),
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_pending_fetches() {
    let fetcher = ScriptedFetcher::new().serve("slow.png", Duration::from_secs(5));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let err = assemble(
        &[text("x"), image("slow.png")],
        &fetcher,
        &ExportOptions::default(),
        &cancel,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ExportError::Cancelled));
    assert!(fetcher.completed().is_empty());
}
