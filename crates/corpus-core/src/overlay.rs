//! Configuration overlay: per-field generation overrides.
//!
//! # YAML Format
//!
//! ```yaml
//! fields:
//!   - name: host.name
//!     cardinality: 0.01                              # fraction in (0,1]
//!   - name: service.id
//!     cardinality: {numerator: 1, denominator: 250}
//!   - name: legacy.field
//!     cardinality: 50                                # legacy per-mille scalar
//!   - name: metric.value
//!     fuzziness: 0.1
//!     range: {min: 1, max: 100}
//!   - name: "@timestamp"
//!     period: "-1s"
//!   - name: event.created
//!     range: {from: "2024-01-01T00:00:00Z", to: "2024-01-02T00:00:00Z"}
//!   - name: labels.*
//!     object_keys: [env, team]
//!   - name: log.level
//!     enum: [info, warn, error]
//!   - name: data_stream.type
//!     value: logs
//! ```
//!
//! Every entry is validated while it is deserialized, so an overlay that
//! loads successfully only holds satisfiable overrides.

use crate::duration::parse_duration;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Error type for overlay operations.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// Error reading the overlay file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML, including invalid overrides
    #[error("Failed to parse config: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Target number of distinct values for a field across a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cardinality {
    /// Fraction of the total planned events, in (0,1]
    Ratio(f64),

    /// Legacy scalar: distinct values per thousand events
    PerMille(u64),
}

impl Cardinality {
    /// Number of consecutive events sharing one value.
    ///
    /// For a ratio `c` and `total_events` planned events the window is
    /// `ceil(total_events * c)`; the legacy per-mille scalar `k` uses a fixed
    /// window of `ceil(1000 / k)`. Never less than 1.
    pub fn window(&self, total_events: u64) -> u64 {
        match *self {
            Cardinality::Ratio(ratio) => {
                // Absorb float noise such as 100 * 0.07 = 7.000000000000001
                let window = (total_events as f64 * ratio - 1e-9).ceil();
                if window < 1.0 {
                    1
                } else {
                    window as u64
                }
            }
            Cardinality::PerMille(per_mille) => 1000u64.div_ceil(per_mille).max(1),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCardinality {
    PerMille(u64),
    Fraction(f64),
    Ratio { numerator: u64, denominator: u64 },
}

impl TryFrom<RawCardinality> for Cardinality {
    type Error = String;

    fn try_from(raw: RawCardinality) -> Result<Self, Self::Error> {
        match raw {
            RawCardinality::PerMille(0) => Err("cardinality must be greater than 0".to_string()),
            RawCardinality::PerMille(per_mille) => Ok(Cardinality::PerMille(per_mille)),
            RawCardinality::Fraction(ratio) => {
                if ratio > 0.0 && ratio <= 1.0 {
                    Ok(Cardinality::Ratio(ratio))
                } else {
                    Err(format!("cardinality ratio {ratio} must be in (0,1]"))
                }
            }
            RawCardinality::Ratio { denominator: 0, .. } => {
                Err("cardinality denominator must not be 0".to_string())
            }
            RawCardinality::Ratio {
                numerator,
                denominator,
            } => {
                let ratio = numerator as f64 / denominator as f64;
                if ratio > 0.0 && ratio <= 1.0 {
                    Ok(Cardinality::Ratio(ratio))
                } else {
                    Err(format!(
                        "cardinality {numerator}/{denominator} must be in (0,1]"
                    ))
                }
            }
        }
    }
}

/// Validated value range of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRange {
    /// Inclusive numeric bounds
    Numeric { min: f64, max: f64 },

    /// Interpolation bounds for dates; `from > to` counts backward
    Time {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRange {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    from: Option<DateTime<Utc>>,
    #[serde(default)]
    to: Option<DateTime<Utc>>,
}

impl RawRange {
    fn validate(self, name: &str) -> Result<FieldRange, String> {
        let has_numeric = self.min.is_some() || self.max.is_some();
        let has_time = self.from.is_some() || self.to.is_some();

        match (has_numeric, has_time) {
            (true, true) => Err(format!(
                "field '{name}': range mixes numeric (min/max) and time (from/to) bounds"
            )),
            (false, false) => Err(format!("field '{name}': range has no bounds")),
            (true, false) => {
                let min = self.min.unwrap_or(0.0);
                let max = self.max.unwrap_or(f64::from(i32::MAX));
                if !min.is_finite() || !max.is_finite() {
                    return Err(format!("field '{name}': range bounds must be finite"));
                }
                if min > max {
                    return Err(format!(
                        "field '{name}': invalid range, min {min} is greater than max {max}"
                    ));
                }
                if !(max - min).is_finite() {
                    return Err(format!(
                        "field '{name}': range from {min} to {max} is too wide to sample"
                    ));
                }
                Ok(FieldRange::Numeric { min, max })
            }
            (false, true) => match (self.from, self.to) {
                (Some(from), Some(to)) => Ok(FieldRange::Time { from, to }),
                _ => Err(format!(
                    "field '{name}': time range needs both 'from' and 'to'"
                )),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigOverride {
    name: String,
    #[serde(default)]
    value: Option<YamlValue>,
    #[serde(default)]
    cardinality: Option<RawCardinality>,
    #[serde(default)]
    fuzziness: Option<f64>,
    #[serde(default)]
    range: Option<RawRange>,
    #[serde(default)]
    object_keys: Option<Vec<String>>,
    #[serde(default, rename = "enum")]
    enum_values: Option<Vec<String>>,
    #[serde(default)]
    period: Option<String>,
}

/// Generation overrides for one field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawConfigOverride")]
pub struct ConfigOverride {
    /// Field name (or `root.*` pattern) this override applies to
    pub name: String,

    /// Static value, wins over everything else
    pub value: Option<YamlValue>,

    pub cardinality: Option<Cardinality>,

    /// Bounded random-walk ratio for numeric fields, in (0,1]
    pub fuzziness: Option<f64>,

    pub range: Option<FieldRange>,

    /// Explicit sub-keys for object fields
    pub object_keys: Vec<String>,

    /// Allowed values, drawn uniformly
    pub enum_values: Option<Vec<String>>,

    /// Fixed per-event step for date fields
    pub period: Option<Duration>,
}

impl ConfigOverride {
    /// An override with no settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            cardinality: None,
            fuzziness: None,
            range: None,
            object_keys: Vec::new(),
            enum_values: None,
            period: None,
        }
    }

    pub fn numeric_range(&self) -> Option<(f64, f64)> {
        match self.range {
            Some(FieldRange::Numeric { min, max }) => Some((min, max)),
            _ => None,
        }
    }

    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self.range {
            Some(FieldRange::Time { from, to }) => Some((from, to)),
            _ => None,
        }
    }
}

impl TryFrom<RawConfigOverride> for ConfigOverride {
    type Error = String;

    fn try_from(raw: RawConfigOverride) -> Result<Self, Self::Error> {
        let name = raw.name;

        let cardinality = raw
            .cardinality
            .map(Cardinality::try_from)
            .transpose()
            .map_err(|e| format!("field '{name}': {e}"))?;

        if let Some(fuzziness) = raw.fuzziness {
            if !(fuzziness > 0.0 && fuzziness <= 1.0) {
                return Err(format!(
                    "field '{name}': fuzziness {fuzziness} must be in (0,1]"
                ));
            }
        }

        let range = raw.range.map(|r| r.validate(&name)).transpose()?;

        if let Some(values) = &raw.enum_values {
            if values.is_empty() {
                return Err(format!("field '{name}': enum must not be empty"));
            }
        }

        let period = raw
            .period
            .as_deref()
            .map(parse_duration)
            .transpose()
            .map_err(|e| format!("field '{name}': {e}"))?;

        Ok(ConfigOverride {
            name,
            value: raw.value,
            cardinality,
            fuzziness: raw.fuzziness,
            range,
            object_keys: raw.object_keys.unwrap_or_default(),
            enum_values: raw.enum_values,
            period,
        })
    }
}

/// Lookup from field name to generation overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverlay {
    #[serde(default)]
    fields: Vec<ConfigOverride>,

    /// Name lookup into `fields` (not serialized)
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ConfigOverlay {
    /// Build an overlay from overrides. Later entries win on duplicate names.
    pub fn new(fields: Vec<ConfigOverride>) -> Self {
        let mut overlay = Self {
            fields,
            index: HashMap::new(),
        };
        overlay.build_index();
        overlay
    }

    fn build_index(&mut self) {
        self.index = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.name.clone(), idx))
            .collect();
    }

    /// Parse an overlay from YAML. An empty document is an empty overlay.
    pub fn from_yaml(yaml: &str) -> Result<Self, OverlayError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut overlay: ConfigOverlay = serde_yaml::from_str(yaml)?;
        overlay.build_index();
        Ok(overlay)
    }

    /// Load an overlay from disk. A missing file is an empty overlay.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OverlayError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Config file '{}' not found, using empty overlay",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up the override for an exact field name.
    pub fn get(&self, name: &str) -> Option<&ConfigOverride> {
        self.index.get(name).and_then(|&idx| self.fields.get(idx))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
