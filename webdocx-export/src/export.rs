//! Export entry point
//!
//!     [`Exporter`] wires the pipeline together:
//!
//!         html ──parse──▶ tree ──classify──▶ blocks ──assemble──▶ model ──encode──▶ bytes ──save──▶ file
//!
//!     Every call starts from fresh state. Parsing and classification are synchronous and
//!     the parsed tree is dropped before the first suspension point, so the export future
//!     is `Send` and can run on any runtime thread.

use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::assemble::assemble;
use crate::blocks::BlockDescriptor;
use crate::classify::classify;
use crate::encode::{DocumentEncoder, DocxEncoder};
use crate::error::{ExportError, Result};
use crate::fetch::{ResourceFetcher, SourceFetcher};
use crate::markup::HtmlDocument;
use crate::model::ContentModel;
use crate::options::{ClassifyOptions, ExportOptions};
use crate::save::{output_file_name, DirectorySaver, Saver};

/// Parse `html` and classify the subtree under the first element with class `container`.
pub fn classify_html(
    html: &str,
    container: &str,
    options: &ClassifyOptions,
) -> Result<Vec<BlockDescriptor>> {
    let document = HtmlDocument::parse(html)?;
    let root = document.container(container)?;
    Ok(classify(&root, options))
}

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub blocks: usize,
    pub elements: usize,
    pub images: usize,
    pub bytes: usize,
}

/// The export pipeline with its collaborators.
#[derive(Clone)]
pub struct Exporter {
    options: ExportOptions,
    fetcher: Arc<dyn ResourceFetcher>,
    encoder: Arc<dyn DocumentEncoder>,
    saver: Arc<dyn Saver>,
}

impl Exporter {
    pub fn new(
        options: ExportOptions,
        fetcher: Arc<dyn ResourceFetcher>,
        encoder: Arc<dyn DocumentEncoder>,
        saver: Arc<dyn Saver>,
    ) -> Self {
        Self {
            options,
            fetcher,
            encoder,
            saver,
        }
    }

    /// Stock pipeline: scheme-dispatching fetcher, DOCX encoder, files under `output_dir`.
    pub fn with_defaults(options: ExportOptions, output_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            options,
            Arc::new(SourceFetcher::new()),
            Arc::new(DocxEncoder::new()),
            Arc::new(DirectorySaver::new(output_dir)),
        )
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn classify(&self, html: &str, container: &str) -> Result<Vec<BlockDescriptor>> {
        classify_html(html, container, &self.options.classify)
    }

    /// Run the pipeline up to the content model.
    pub async fn build_model(&self, html: &str, container: &str) -> Result<ContentModel> {
        let blocks = self.classify(html, container)?;
        self.assemble(&blocks, &CancellationToken::new()).await
    }

    async fn assemble(
        &self,
        blocks: &[BlockDescriptor],
        cancel: &CancellationToken,
    ) -> Result<ContentModel> {
        assemble(blocks, self.fetcher.as_ref(), &self.options, cancel).await
    }

    /// Export the container as `<file_name>.<ext>`.
    pub async fn export_document(
        &self,
        html: &str,
        container: &str,
        file_name: &str,
    ) -> Result<ExportReport> {
        self.export_with_cancel(html, container, file_name, &CancellationToken::new())
            .await
    }

    /// Like [`Exporter::export_document`], aborting with [`ExportError::Cancelled`] once
    /// `cancel` fires. Nothing is saved for a cancelled or failed export.
    pub async fn export_with_cancel(
        &self,
        html: &str,
        container: &str,
        file_name: &str,
        cancel: &CancellationToken,
    ) -> Result<ExportReport> {
        let blocks = self.classify(html, container)?;
        let model = self.assemble(&blocks, cancel).await?;

        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        let bytes = self.encoder.encode(&model)?;
        let name = output_file_name(file_name, self.encoder.extension());
        let path = self.saver.save(&bytes, &name)?;

        let report = ExportReport {
            path,
            blocks: blocks.len(),
            elements: model.len(),
            images: model.image_count(),
            bytes: bytes.len(),
        };
        info!(
            "exported {} ({} blocks, {} elements, {} images, {} bytes)",
            report.path.display(),
            report.blocks,
            report.elements,
            report.images,
            report.bytes
        );
        Ok(report)
    }

    /// Run an export in the background on the current runtime.
    pub fn spawn(&self, html: String, container: String, file_name: String) -> ExportHandle {
        let exporter = self.clone();
        let token = CancellationToken::new();
        let cancel = token.clone();
        let task = tokio::spawn(async move {
            exporter
                .export_with_cancel(&html, &container, &file_name, &cancel)
                .await
        });
        ExportHandle { token, task }
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("options", &self.options)
            .field("encoder", &self.encoder.name())
            .finish_non_exhaustive()
    }
}

/// An export running in the background.
#[derive(Debug)]
pub struct ExportHandle {
    token: CancellationToken,
    task: JoinHandle<Result<ExportReport>>,
}

impl ExportHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub async fn wait(self) -> Result<ExportReport> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ExportError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
