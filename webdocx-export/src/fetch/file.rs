//! Local file references

use super::ResourceFetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

/// Reads `file:` URLs and plain paths, the latter relative to `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: PathBuf,
}

impl FileFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, source_ref: &str) -> Result<PathBuf, FetchError> {
        if source_ref.starts_with("file:") {
            let url = Url::parse(source_ref)
                .map_err(|e| FetchError::UnsupportedScheme(format!("{source_ref}: {e}")))?;
            return url
                .to_file_path()
                .map_err(|_| FetchError::UnsupportedScheme(source_ref.to_string()));
        }
        let path = Path::new(source_ref);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.base_dir.join(path))
        }
    }
}

#[async_trait]
impl ResourceFetcher for FileFetcher {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(source_ref)?;
        Ok(tokio::fs::read(&path).await?)
    }
}
