//! Read-mostly cache of field catalogs.
//!
//! Hits take a shared read lock. Misses for the same key are collapsed onto
//! one fetch, and at most `max_concurrent_fetches` fetches run at once.
//! Only complete catalogs are stored; a failed or timed-out fetch leaves
//! the cache unchanged.

use crate::error::SourceError;
use crate::registry::{FieldSource, PackageKey};
use corpus_core::FieldCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, Semaphore};

/// Default number of concurrent fetches on the miss path.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Default bound on one fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Field source fronted by an in-memory cache.
pub struct CachedFieldSource<S> {
    inner: S,
    entries: RwLock<HashMap<PackageKey, Arc<FieldCatalog>>>,
    in_flight: Mutex<HashMap<PackageKey, Arc<Mutex<()>>>>,
    permits: Semaphore,
    fetch_timeout: Duration,
}

impl<S: FieldSource> CachedFieldSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_limits(inner, DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_limits(inner: S, max_concurrent_fetches: usize, fetch_timeout: Duration) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            permits: Semaphore::new(max_concurrent_fetches.max(1)),
            fetch_timeout,
        }
    }

    /// Cached catalog for `key`, fetching it on a miss.
    pub async fn get(&self, key: &PackageKey) -> Result<Arc<FieldCatalog>, SourceError> {
        if let Some(catalog) = self.cached(key).await {
            return Ok(catalog);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.entry(key.clone()).or_default().clone()
        };
        let _fetching = key_lock.lock().await;

        // Another task may have filled the entry while we waited
        if let Some(catalog) = self.cached(key).await {
            return Ok(catalog);
        }

        let _permit = self.permits.acquire().await.map_err(|_| SourceError::Closed)?;
        tracing::debug!("Field cache miss for {key}");

        let result = tokio::time::timeout(self.fetch_timeout, self.inner.load(key)).await;
        let catalog = match result {
            Ok(Ok(catalog)) => Arc::new(catalog),
            Ok(Err(e)) => {
                self.in_flight.lock().await.remove(key);
                return Err(e);
            }
            Err(_) => {
                self.in_flight.lock().await.remove(key);
                return Err(SourceError::Timeout {
                    key: key.to_string(),
                    secs: self.fetch_timeout.as_secs(),
                });
            }
        };

        self.entries
            .write()
            .await
            .insert(key.clone(), Arc::clone(&catalog));
        self.in_flight.lock().await.remove(key);
        Ok(catalog)
    }

    async fn cached(&self, key: &PackageKey) -> Option<Arc<FieldCatalog>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
