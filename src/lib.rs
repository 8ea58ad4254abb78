//! corpus-gen library
//!
//! Generates large, schema-conformant event corpora for testing ingest
//! pipelines. Field definitions come from a local `fields.yml` file or an
//! integration package registry; a YAML config overlay tunes how each field
//! is generated; a template decides the shape of each record.
//!
//! # Crates
//!
//! - `corpus_core` - field descriptors, catalog, config overlay, values
//! - `corpus_generator` - template engines, field binder, emission pipeline
//! - `corpus_populate` - corpus driver, bulk envelopes, CLI arguments
//! - `field_source` - package registry client and catalog cache
//!
//! # CLI Usage
//!
//! ```bash
//! # 10k records from a local fields file, reproducible
//! corpus-gen generate --fields fields.yml --events 10000 --seed 42 -o corpus.ndjson
//!
//! # ~500MB of bulk-framed records from the package registry
//! corpus-gen generate --integration nginx --data-stream access --package-version 1.2.0 \
//!   --config overlay.yml --size 500MB --bulk -o nginx.ndjson
//! ```

pub mod generate;
