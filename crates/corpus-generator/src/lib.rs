//! Record generator for the corpus-gen tool.
//!
//! This crate turns a template, a field catalog and a config overlay into a
//! stream of records. Everything that can fail on bad configuration fails in
//! [`EmissionPipeline::compile`], before the first record is written.
//!
//! # Architecture
//!
//! ```text
//! template bytes ──► TemplateEngine ──► TemplateLayout
//!                                            │
//! FieldCatalog + ConfigOverlay ──► FieldBinder
//!                                            │
//!                                            ▼
//!                                ┌───────────────────────┐
//!                                │   EmissionPipeline    │
//!                                │  literal, GenerationFn│
//!                                │  literal, GenerationFn│
//!                                │  ...  trailing literal│
//!                                └───────────┬───────────┘
//!                                            │ emit(&mut GenerationState)
//!                                            ▼
//!                                       record bytes
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use corpus_core::{ConfigOverlay, FieldCatalog};
//! use corpus_generator::{
//!     EmissionPipeline, FieldBinder, GenerationState, PlaceholderEngine, TemplateEngine,
//! };
//!
//! let catalog = FieldCatalog::from_yaml(r#"
//! - name: event.kind
//!   type: keyword
//!   value: metric
//! "#).unwrap();
//! let overlay = ConfigOverlay::default();
//!
//! let layout = PlaceholderEngine.parse(br#"{"kind":{{.event.kind}}}"#).unwrap();
//! let mut state = GenerationState::seeded(42, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
//! let binder = FieldBinder::new(&catalog, &overlay);
//! let mut pipeline = EmissionPipeline::compile(&layout, &binder, &mut state).unwrap();
//!
//! let mut out = Vec::new();
//! pipeline.emit(&mut state, &mut out).unwrap();
//! assert_eq!(out, br#"{"kind":"metric"}"#);
//! ```

pub mod binder;
pub mod error;
pub mod generators;
pub mod pipeline;
pub mod state;
pub mod template;

pub use binder::{FieldBinder, GenerationFn, DEFAULT_DYNAMIC_KEYS};
pub use error::GeneratorError;
pub use pipeline::EmissionPipeline;
pub use state::GenerationState;
pub use template::{
    default_template, FunctionCallEngine, PlaceholderEngine, TemplateEngine, TemplateLayout,
    TemplateReference,
};
