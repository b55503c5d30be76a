//! Error types for the form field interpreter
//!
//! Only boundary failures are errors here. A field that fails its rules is
//! reported as a [`FieldError`](crate::validation::FieldError) value, and
//! degraded schema data (bad option lists, unknown field types, broken
//! patterns) is recovered locally and never reaches this type.

use thiserror::Error;

use crate::value::ValueShape;

/// Main error type for interpreter operations
#[derive(Error, Debug)]
pub enum FormError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Schema-related error
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A client value whose variant cannot be coerced into the field's shape
    #[error("Field '{field}' expects a {expected} value, got {found}")]
    ShapeMismatch {
        field: String,
        expected: ValueShape,
        found: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FormError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        FormError::InvalidInput(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        FormError::ParseError(msg.into())
    }

    /// Create a schema error
    pub fn schema_error(msg: impl Into<String>) -> Self {
        FormError::SchemaError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FormError::InvalidInput(_)
                | FormError::ParseError(_)
                | FormError::SchemaError(_)
                | FormError::ShapeMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::ParseError(format!("JSON error: {}", err))
    }
}

/// Result type alias for interpreter operations
pub type Result<T> = std::result::Result<T, FormError>;
