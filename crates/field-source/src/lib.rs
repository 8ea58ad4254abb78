//! Field definition loading for the corpus-gen tool.
//!
//! Field catalogs come from an integration package registry over HTTP. The
//! [`RegistryClient`] resolves a package manifest and downloads the data
//! stream's `fields/*.yml` files; [`CachedFieldSource`] keeps the parsed
//! catalogs so concurrent callers asking for the same package share one
//! download.
//!
//! # Example
//!
//! ```ignore
//! use field_source::{CachedFieldSource, PackageKey, RegistryClient};
//! use std::time::Duration;
//!
//! let client = RegistryClient::new("https://epr.elastic.co", Duration::from_secs(30))?;
//! let cache = CachedFieldSource::new(client);
//! let catalog = cache.get(&PackageKey::new("nginx", "access", "1.2.0")).await?;
//! println!("{} fields", catalog.len());
//! ```

pub mod cache;
pub mod error;
pub mod registry;

pub use cache::{CachedFieldSource, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use error::SourceError;
pub use registry::{FieldSource, PackageKey, RegistryClient};
