//! Error types for field sources.

use corpus_core::CatalogError;
use thiserror::Error;

/// Errors that can occur while loading field definitions.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Request could not be sent or its body read.
    #[error("Request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Registry answered with a non-success status.
    #[error("Registry returned status {status} for '{url}'")]
    Status { url: String, status: u16 },

    /// Package manifest is not valid JSON.
    #[error("Invalid package manifest from '{url}': {source}")]
    Manifest {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Field definitions failed to parse.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The package has no field definitions for the data stream.
    #[error("No fields found for {0}")]
    NoFields(String),

    /// Loading did not finish in time.
    #[error("Timed out after {secs}s loading fields for {key}")]
    Timeout { key: String, secs: u64 },

    /// The cache was shut down while waiting for a fetch slot.
    #[error("Field cache is closed")]
    Closed,
}
