//! Image byte fetching
//!
//!     Assembly resolves every image reference to bytes through a [`ResourceFetcher`].
//!     [`SourceFetcher`] is the stock implementation: it dispatches on the reference's
//!     scheme to the data-URI, file and HTTP fetchers in this module.
//!
//!     Fetchers perform one attempt. Timeouts and retries are layered on top by
//!     [`fetch_with_policy`] so every fetcher gets the same [`FetchPolicy`] treatment.

mod data;
mod file;
#[cfg(feature = "http")]
mod http;
mod picture;
mod source;

pub use self::data::DataUriFetcher;
pub use self::file::FileFetcher;
#[cfg(feature = "http")]
pub use self::http::HttpFetcher;
pub use self::picture::{prepare_image, PreparedImage};
pub use self::source::SourceFetcher;

use crate::error::FetchError;
use crate::options::FetchPolicy;
use async_trait::async_trait;
use log::{debug, warn};

/// Resolves a source reference (URL, path or data URI) to raw bytes.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<F: ResourceFetcher + ?Sized> ResourceFetcher for std::sync::Arc<F> {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(source_ref).await
    }
}

/// Fetch with a per-attempt timeout and bounded exponential-backoff retries.
///
/// Only transient failures (timeouts, HTTP errors) are retried.
pub async fn fetch_with_policy(
    fetcher: &dyn ResourceFetcher,
    source_ref: &str,
    policy: &FetchPolicy,
) -> Result<Vec<u8>, FetchError> {
    let mut attempt = 0;
    let mut delay = policy.backoff;

    loop {
        debug!("fetching '{source_ref}' (attempt {})", attempt + 1);
        let result = match tokio::time::timeout(policy.timeout, fetcher.fetch(source_ref)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(policy.timeout.as_millis() as u64)),
        };

        match result {
            Ok(bytes) => return Ok(bytes),
            Err(err) if err.is_transient() && attempt < policy.retries => {
                attempt += 1;
                warn!(
                    "fetching '{source_ref}' failed: {err}; retry {attempt}/{} in {delay:?}",
                    policy.retries
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(policy.max_backoff);
            }
            Err(err) => return Err(err),
        }
    }
}
