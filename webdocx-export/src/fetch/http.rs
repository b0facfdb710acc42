//! `http(s)` references through `reqwest`

use super::ResourceFetcher;
use crate::error::FetchError;
use async_trait::async_trait;

const USER_AGENT: &str = concat!("webdocx/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self::new(client)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(source_ref)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
