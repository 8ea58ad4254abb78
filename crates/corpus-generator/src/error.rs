//! Error type for template compilation, field binding and emission.

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Template references a field missing from the catalog
    #[error("Template references unknown field: {0}")]
    UnknownField(String),

    /// No generation strategy can satisfy the field's type and overrides
    #[error("No generation strategy for field '{field}': {reason}")]
    Unsatisfiable { field: String, reason: String },

    /// Template syntax error (function-call templates only)
    #[error("Template syntax error at byte {offset}: {message}")]
    TemplateSyntax { offset: usize, message: String },

    /// Date arithmetic left the representable range
    #[error("Date value for field '{0}' is out of range")]
    DateOutOfRange(String),

    /// Value serialization failed mid-record
    #[error("Failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Configuration errors are raised before any output is produced.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownField(_) | Self::Unsatisfiable { .. } | Self::TemplateSyntax { .. }
        )
    }
}
