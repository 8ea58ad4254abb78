//! Error types for corpus population.

use corpus_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur while writing a corpus.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// IO error, including short writes to the sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record generation error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Missing or contradictory size target.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}
