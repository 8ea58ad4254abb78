//! Field descriptors.
//!
//! A [`Field`] is one named, typed leaf (or open object) entry of the schema
//! that drives generation. Names are dot-separated paths; a trailing `.*`
//! segment marks an open object whose sub-keys are generated dynamically.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Suffix marking an open object field (`labels.*`).
pub const WILDCARD_SUFFIX: &str = ".*";

/// Field type as declared in a package field definition.
///
/// # YAML Format
///
/// Types are plain strings:
/// ```yaml
/// type: keyword
/// type: scaled_float
/// ```
///
/// Any string outside the known set is kept as [`FieldType::Text`] and
/// generated as free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Boolean,
    Keyword,
    ConstantKeyword,
    Date,
    Ip,
    Double,
    Float,
    HalfFloat,
    ScaledFloat,
    Integer,
    Long,
    UnsignedLong,
    Object,
    Nested,
    Flattened,
    GeoPoint,
    /// Fallback for unrecognized types, keeps the declared name
    Text(String),
}

impl FieldType {
    /// Parse a declared type name. Never fails: unknown names become `Text`.
    pub fn parse(name: &str) -> Self {
        match name {
            "boolean" => Self::Boolean,
            "keyword" => Self::Keyword,
            "constant_keyword" => Self::ConstantKeyword,
            "date" => Self::Date,
            "ip" => Self::Ip,
            "double" => Self::Double,
            "float" => Self::Float,
            "half_float" => Self::HalfFloat,
            "scaled_float" => Self::ScaledFloat,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "unsigned_long" => Self::UnsignedLong,
            "object" => Self::Object,
            "nested" => Self::Nested,
            "flattened" => Self::Flattened,
            "geo_point" => Self::GeoPoint,
            other => Self::Text(other.to_string()),
        }
    }

    /// The declared type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Boolean => "boolean",
            Self::Keyword => "keyword",
            Self::ConstantKeyword => "constant_keyword",
            Self::Date => "date",
            Self::Ip => "ip",
            Self::Double => "double",
            Self::Float => "float",
            Self::HalfFloat => "half_float",
            Self::ScaledFloat => "scaled_float",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned_long",
            Self::Object => "object",
            Self::Nested => "nested",
            Self::Flattened => "flattened",
            Self::GeoPoint => "geo_point",
            Self::Text(name) => name,
        }
    }

    /// Object-like types defer to an object type for their sub-values.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object | Self::Nested | Self::Flattened)
    }

    /// Integer-valued numeric types.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::UnsignedLong)
    }

    /// Floating point numeric types.
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            Self::Double | Self::Float | Self::HalfFloat | Self::ScaledFloat
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// A single field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Dot-separated field path
    pub name: String,

    /// Declared field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Type of generated sub-values for object-like fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<FieldType>,

    /// Example value from the field definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    /// Static value from the field definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Field {
    /// Create a new field with no example or static value.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            object_type: None,
            example: None,
            value: None,
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_object_type(mut self, object_type: FieldType) -> Self {
        self.object_type = Some(object_type);
        self
    }

    /// Whether the path ends with a `.*` segment.
    pub fn is_wildcard(&self) -> bool {
        self.name.ends_with(WILDCARD_SUFFIX)
    }

    /// Whether values of this field are objects with generated sub-keys.
    pub fn is_open_object(&self) -> bool {
        self.is_wildcard() || self.field_type.is_object()
    }

    /// The path without a trailing `.*` segment.
    pub fn root_name(&self) -> &str {
        self.name
            .strip_suffix(WILDCARD_SUFFIX)
            .unwrap_or(self.name.as_str())
    }

    /// The type used for sub-values of an open object.
    ///
    /// Object-like types defer to `object_type` (default `keyword`); a
    /// wildcard path with a leaf type uses that type for its sub-values.
    pub fn effective_sub_type(&self) -> FieldType {
        if self.field_type.is_object() {
            self.object_type.clone().unwrap_or(FieldType::Keyword)
        } else {
            self.field_type.clone()
        }
    }
}
