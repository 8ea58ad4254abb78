//! Core types for the corpus generator.
//!
//! This crate provides the foundational types shared by every other crate in
//! the workspace:
//!
//! - [`Field`] / [`FieldType`] - a single field descriptor from a package schema
//! - [`FieldCatalog`] - normalized, deduplicated list of field descriptors
//! - [`ConfigOverlay`] - per-field generation overrides loaded from YAML
//! - [`Value`] - a generated value and its serialized representation
//!
//! # Architecture
//!
//! ```text
//! corpus-core (this crate)
//!    │
//!    ├─── corpus-generator  (template parsing, field binding, emission)
//!    ├─── corpus-populate   (corpus driver, sinks, run metrics)
//!    └─── field-source      (HTTP registry client + catalog cache)
//! ```
//!
//! # Example
//!
//! ```rust
//! use corpus_core::{ConfigOverlay, FieldCatalog};
//!
//! let catalog = FieldCatalog::from_yaml(r#"
//! - name: host
//!   type: group
//!   fields:
//!     - name: name
//!       type: keyword
//!       example: web-01
//! "#).unwrap();
//! assert!(catalog.get("host.name").is_some());
//!
//! let overlay = ConfigOverlay::from_yaml(r#"
//! fields:
//!   - name: host.name
//!     cardinality: 0.01
//! "#).unwrap();
//! assert!(overlay.get("host.name").is_some());
//! ```

pub mod catalog;
pub mod duration;
pub mod field;
pub mod overlay;
pub mod value;

// Re-exports for convenience
pub use catalog::{CatalogError, FieldCatalog};
pub use duration::{parse_duration, DurationError};
pub use field::{Field, FieldType};
pub use overlay::{Cardinality, ConfigOverlay, ConfigOverride, FieldRange, OverlayError};
pub use value::Value;
