//! Error types for export operations

use std::io;
use thiserror::Error;

/// Errors that can abort an export.
///
/// Classification itself never produces these for well-formed markup: unreadable
/// structure degrades to a text block instead. Fetch, encode and save failures are
/// fatal to the current export and no file is written.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No element carries the requested container class
    #[error("no element with class '{0}' found in document")]
    ContainerNotFound(String),

    /// Markup that cannot be read at all (e.g. an unparsable document)
    #[error("malformed markup tree: {0}")]
    MalformedTree(String),

    /// An image could not be fetched, timed out, or did not decode
    #[error("failed to fetch resource '{source_ref}': {source}")]
    ResourceFetch {
        source_ref: String,
        #[source]
        source: FetchError,
    },

    /// The encoder rejected the content model
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The export was cancelled while fetches were in flight
    #[error("export cancelled")]
    Cancelled,
}

/// Failure of a single resource fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("unsupported source reference: {0}")]
    UnsupportedScheme(String),

    #[error("not a decodable image: {0}")]
    UndecodableImage(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
