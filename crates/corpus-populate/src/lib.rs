//! Corpus writer for the corpus-gen tool.
//!
//! This crate drives a compiled [`corpus_generator::EmissionPipeline`] into a
//! file or any other [`std::io::Write`] sink, producing newline-delimited
//! records up to an event count or an approximate byte size.
//!
//! # Example
//!
//! ```ignore
//! use corpus_populate::{CorpusDriver, Target};
//!
//! let mut driver = CorpusDriver::new(pipeline, state);
//! let metrics = driver.populate("corpus.ndjson", Target::Events(1000))?;
//! println!("Generated {} events in {:?}", metrics.events_written, metrics.total_duration);
//! ```

pub mod args;
pub mod error;
pub mod populator;

pub use args::{parse_size, FieldSourceArgs, GenerateArgs, TemplateSyntax, DEFAULT_REGISTRY_URL};
pub use error::PopulateError;
pub use populator::{BulkEnvelope, CorpusDriver, PopulateMetrics, Target, DEFAULT_BUFFER_SIZE};
