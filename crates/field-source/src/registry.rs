//! HTTP client for the integration package registry.
//!
//! Field definitions are discovered from the package manifest:
//!
//! ```text
//! GET {base}/package/{integration}/{version}/
//!   └─ assets: ["/package/nginx/1.2.0/data_stream/access/fields/base-fields.yml", ...]
//!
//! GET {base}{asset}      for every data_stream/{stream}/fields/*.yml asset
//! ```

use crate::error::SourceError;
use async_trait::async_trait;
use corpus_core::FieldCatalog;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Identifies the field definitions of one data stream of one package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageKey {
    pub integration: String,
    pub data_stream: String,
    pub version: String,
}

impl PackageKey {
    pub fn new(
        integration: impl Into<String>,
        data_stream: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            integration: integration.into(),
            data_stream: data_stream.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}@{}",
            self.integration, self.data_stream, self.version
        )
    }
}

/// A source of field catalogs.
#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn load(&self, key: &PackageKey) -> Result<FieldCatalog, SourceError>;
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    assets: Vec<String>,
}

/// Package registry client.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a client whose requests each time out after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        tracing::debug!("Fetching {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Asset paths of the data stream's field definition files.
    pub async fn field_assets(&self, key: &PackageKey) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/package/{}/{}/",
            self.base_url, key.integration, key.version
        );
        let body = self.get_text(&url).await?;
        let manifest: PackageManifest =
            serde_json::from_str(&body).map_err(|source| SourceError::Manifest { url, source })?;

        let prefix = format!("data_stream/{}/fields/", key.data_stream);
        Ok(manifest
            .assets
            .into_iter()
            .filter(|asset| is_fields_asset(asset, &prefix))
            .collect())
    }

    /// Raw YAML fragments keyed by asset path.
    pub async fn fetch_fragments(
        &self,
        key: &PackageKey,
    ) -> Result<BTreeMap<String, String>, SourceError> {
        let mut fragments = BTreeMap::new();
        for asset in self.field_assets(key).await? {
            let url = format!("{}{}", self.base_url, asset);
            let content = self.get_text(&url).await?;
            fragments.insert(asset, content);
        }
        Ok(fragments)
    }
}

/// Matches `.../data_stream/<stream>/fields/<file>.yml`, not nested deeper.
fn is_fields_asset(asset: &str, prefix: &str) -> bool {
    let Some(pos) = asset.find(prefix) else {
        return false;
    };
    let file = &asset[pos + prefix.len()..];
    !file.is_empty() && !file.contains('/') && file.ends_with(".yml")
}

#[async_trait]
impl FieldSource for RegistryClient {
    async fn load(&self, key: &PackageKey) -> Result<FieldCatalog, SourceError> {
        let fragments = self.fetch_fragments(key).await?;
        let catalog = FieldCatalog::from_fragments(&fragments)?;
        if catalog.is_empty() {
            return Err(SourceError::NoFields(key.to_string()));
        }

        tracing::info!(
            "Loaded {} fields for {} from {} files",
            catalog.len(),
            key,
            fragments.len()
        );
        Ok(catalog)
    }
}
