//! Scheme dispatch for source references

use super::{DataUriFetcher, FileFetcher, ResourceFetcher};
use crate::error::FetchError;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// Where a source reference points after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    Data(String),
    File(String),
    Http(Url),
}

/// The default fetcher: data URIs, local files and (with the `http` feature) web URLs.
///
/// Relative references resolve against `base_url` when one is set, otherwise against
/// the file fetcher's base directory.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    base_url: Option<Url>,
    data: DataUriFetcher,
    file: FileFetcher,
    #[cfg(feature = "http")]
    http: super::HttpFetcher,
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.file = FileFetcher::new(base_dir);
        self
    }

    pub fn resolve(&self, source_ref: &str) -> Result<ResolvedSource, FetchError> {
        if source_ref.starts_with("data:") {
            return Ok(ResolvedSource::Data(source_ref.to_string()));
        }

        match Url::parse(source_ref) {
            Ok(url) => classify_url(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(source_ref)
                    .map_err(|e| FetchError::UnsupportedScheme(format!("{source_ref}: {e}")))
                    .and_then(classify_url),
                None => Ok(ResolvedSource::File(source_ref.to_string())),
            },
            Err(e) => Err(FetchError::UnsupportedScheme(format!("{source_ref}: {e}"))),
        }
    }
}

fn classify_url(url: Url) -> Result<ResolvedSource, FetchError> {
    match url.scheme() {
        "http" | "https" => Ok(ResolvedSource::Http(url)),
        "file" => Ok(ResolvedSource::File(url.to_string())),
        "data" => Ok(ResolvedSource::Data(url.to_string())),
        other => Err(FetchError::UnsupportedScheme(format!("{other}: {url}"))),
    }
}

#[async_trait]
impl ResourceFetcher for SourceFetcher {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError> {
        match self.resolve(source_ref)? {
            ResolvedSource::Data(uri) => self.data.fetch(&uri).await,
            ResolvedSource::File(path) => self.file.fetch(&path).await,
            #[cfg(feature = "http")]
            ResolvedSource::Http(url) => self.http.fetch(url.as_str()).await,
            #[cfg(not(feature = "http"))]
            ResolvedSource::Http(url) => Err(FetchError::UnsupportedScheme(format!(
                "{url} (built without the `http` feature)"
            ))),
        }
    }
}
