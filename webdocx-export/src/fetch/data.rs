//! `data:` URI decoding

use super::ResourceFetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use base64::Engine;
use percent_encoding::percent_decode_str;

/// Decodes inline `data:[<media type>][;base64],<payload>` references.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriFetcher;

impl DataUriFetcher {
    pub fn decode(uri: &str) -> Result<Vec<u8>, FetchError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| FetchError::InvalidDataUri("missing 'data:' prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| FetchError::InvalidDataUri("missing ',' separator".to_string()))?;

        if header.ends_with(";base64") {
            let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
            let compact = percent_decode_str(&compact).decode_utf8_lossy();
            base64::engine::general_purpose::STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| FetchError::InvalidDataUri(format!("bad base64 payload: {e}")))
        } else {
            Ok(percent_decode_str(payload).collect())
        }
    }
}

#[async_trait]
impl ResourceFetcher for DataUriFetcher {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError> {
        Self::decode(source_ref)
    }
}
