//! Error types for the formfield CLI
//!
//! Provides structured error types for file access, document parsing and
//! failures reported by the interpreter core.

use formfield_core::FormError;
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Document parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Form definition could not be used
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error raised by the interpreter core
    #[error(transparent)]
    Form(#[from] FormError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CliError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        CliError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        CliError::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        match self {
            CliError::InvalidInput(_)
            | CliError::FileError(_)
            | CliError::ParseError(_)
            | CliError::SchemaError(_) => true,
            CliError::Form(e) => e.is_user_error(),
            CliError::SerializationError(_) | CliError::InternalError(_) => false,
        }
    }

    /// Whether the error concerns the form definition
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            CliError::SchemaError(_) | CliError::Form(FormError::SchemaError(_))
        )
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::FileError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(CliError::invalid_input("x").is_user_error());
        assert!(CliError::file_error("x").is_user_error());
        assert!(CliError::Form(FormError::parse_error("bad")).is_user_error());
        assert!(!CliError::InternalError("x".to_string()).is_user_error());
        assert!(!CliError::SerializationError("x".to_string()).is_user_error());
    }

    #[test]
    fn test_schema_error_detection() {
        assert!(CliError::SchemaError("x".to_string()).is_schema_error());
        assert!(CliError::Form(FormError::schema_error("x")).is_schema_error());
        assert!(!CliError::parse_error("x").is_schema_error());
    }

    #[test]
    fn test_form_error_is_transparent() {
        let err = CliError::from(FormError::invalid_input("missing id"));
        assert_eq!(err.to_string(), "Invalid input: missing id");
    }
}
