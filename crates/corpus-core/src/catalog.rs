//! Field catalog: the normalized, deduplicated set of field descriptors.
//!
//! Package field definitions arrive as several YAML fragments (one per
//! source file), each a list of possibly nested `group` entries:
//!
//! ```yaml
//! - name: aws.dynamodb
//!   type: group
//!   fields:
//!     - name: metrics.ConsumedReadCapacityUnits.avg
//!       type: double
//!       example: 12.5
//! - name: data_stream.type
//!   type: constant_keyword
//!   value: metrics
//! ```
//!
//! Groups are flattened into dotted names, fragments are merged, and the
//! result is normalized (sorted by name, redundant wildcards dropped) and
//! deduplicated (same-name fields keep the lexicographically greater
//! `example`/`value`).

use crate::field::{Field, FieldType, WILDCARD_SUFFIX};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Error reading a field definition file
    #[error("Failed to read field definitions: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse field definitions in '{source_name}': {error}")]
    YamlError {
        source_name: String,
        error: serde_yaml::Error,
    },

    /// No fields after loading
    #[error("No fields found in field definitions")]
    Empty,
}

/// Field entry as written in a package `fields.yml`.
#[derive(Debug, Deserialize)]
struct RawFieldDefinition {
    name: String,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    object_type: Option<String>,
    #[serde(default)]
    example: Option<YamlValue>,
    #[serde(default)]
    value: Option<YamlValue>,
    #[serde(default)]
    fields: Vec<RawFieldDefinition>,
}

/// Normalized, deduplicated list of field descriptors.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<Field>,

    /// Name lookup into `fields`
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Build a catalog from raw fields, normalizing and deduplicating them.
    pub fn new(fields: Vec<Field>) -> Self {
        let fields = normalize(dedup(fields));
        let index = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name.clone(), idx))
            .collect();
        Self { fields, index }
    }

    /// Merge YAML fragments keyed by source file name.
    ///
    /// Fragments are merged in key order so the result does not depend on
    /// the order in which they were fetched.
    pub fn from_fragments(fragments: &BTreeMap<String, String>) -> Result<Self, CatalogError> {
        let mut fields = Vec::new();
        for (source_name, content) in fragments {
            let parsed = parse_fields_yaml(content).map_err(|error| CatalogError::YamlError {
                source_name: source_name.clone(),
                error,
            })?;
            tracing::debug!("Loaded {} fields from '{source_name}'", parsed.len());
            fields.extend(parsed);
        }
        Ok(Self::new(fields))
    }

    /// Parse a single YAML fragment.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fields = parse_fields_yaml(yaml).map_err(|error| CatalogError::YamlError {
            source_name: "<inline>".to_string(),
            error,
        })?;
        Ok(Self::new(fields))
    }

    /// Load field definitions from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let fields = parse_fields_yaml(&content).map_err(|error| CatalogError::YamlError {
            source_name: path.display().to_string(),
            error,
        })?;
        Ok(Self::new(fields))
    }

    /// Fail with [`CatalogError::Empty`] when there is nothing to generate.
    pub fn ensure_not_empty(self) -> Result<Self, CatalogError> {
        if self.fields.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(self)
    }

    /// Look up a field by name.
    ///
    /// A name without the wildcard suffix also resolves an open object
    /// (`labels` finds `labels.*`).
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index
            .get(name)
            .or_else(|| self.index.get(&format!("{name}{WILDCARD_SUFFIX}")))
            .and_then(|&idx| self.fields.get(idx))
    }

    /// All fields, sorted by name.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse a `fields.yml` document into flattened field descriptors.
pub fn parse_fields_yaml(yaml: &str) -> Result<Vec<Field>, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<RawFieldDefinition> = serde_yaml::from_str(yaml)?;
    let mut fields = Vec::new();
    for definition in raw {
        flatten(None, definition, &mut fields);
    }
    Ok(fields)
}

fn flatten(prefix: Option<&str>, definition: RawFieldDefinition, out: &mut Vec<Field>) {
    let name = match prefix {
        Some(prefix) => format!("{prefix}.{}", definition.name),
        None => definition.name,
    };

    let is_group = definition.field_type.as_deref() == Some("group");
    if is_group || !definition.fields.is_empty() {
        for child in definition.fields {
            flatten(Some(&name), child, out);
        }
        return;
    }

    let field_type = definition
        .field_type
        .as_deref()
        .map(FieldType::parse)
        .unwrap_or(FieldType::Keyword);

    out.push(Field {
        name,
        field_type,
        object_type: definition.object_type.as_deref().map(FieldType::parse),
        example: definition.example.as_ref().and_then(scalar_to_string),
        value: definition.value.as_ref().and_then(scalar_to_string),
    });
}

fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Tagged(tagged) => scalar_to_string(&tagged.value),
        YamlValue::Null | YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

/// Merge same-name fields, preferring the lexicographically greater
/// example and value.
fn dedup(mut fields: Vec<Field>) -> Vec<Field> {
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let mut merged: Vec<Field> = Vec::with_capacity(fields.len());
    for field in fields {
        match merged.last_mut() {
            Some(last) if last.name == field.name => {
                last.example = std::cmp::max(last.example.take(), field.example);
                last.value = std::cmp::max(last.value.take(), field.value);
                if last.object_type.is_none() {
                    last.object_type = field.object_type;
                }
            }
            _ => merged.push(field),
        }
    }
    merged
}

/// Drop `a.*` wildcards already covered by a concrete `a.<key>` field.
///
/// Expects input sorted by name.
fn normalize(fields: Vec<Field>) -> Vec<Field> {
    let concrete: Vec<&str> = fields
        .iter()
        .filter(|f| !f.is_wildcard())
        .map(|f| f.name.as_str())
        .collect();

    let redundant: Vec<bool> = fields
        .iter()
        .map(|field| {
            if !field.is_wildcard() {
                return false;
            }
            // "a.*" -> "a."
            let prefix = &field.name[..field.name.len() - 1];
            let start = concrete.partition_point(|name| *name < prefix);
            concrete
                .get(start)
                .is_some_and(|name| name.starts_with(prefix))
        })
        .collect();

    fields
        .into_iter()
        .zip(redundant)
        .filter_map(|(field, redundant)| {
            if redundant {
                tracing::debug!("Dropping wildcard field '{}' covered by concrete fields", field.name);
                None
            } else {
                Some(field)
            }
        })
        .collect()
}
