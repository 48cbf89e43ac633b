//! Message validation errors with field paths

use std::fmt;
use thiserror::Error;

/// Validation error with field path for precise error reporting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Path to the offending field (e.g., "messages[0].tool_call_id")
    pub field_path: String,
    /// The validation error kind
    pub kind: ValidationErrorKind,
    /// Optional additional context
    pub context: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed at '{}': {}", self.field_path, self.kind)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

/// Specific message validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error("required field is missing")]
    RequiredFieldMissing,

    #[error("unknown content part kind '{kind}'")]
    UnknownContentPartKind { kind: String },

    #[error("dangling tool result: no prior tool call with id '{id}'")]
    DanglingToolResult { id: String },

    #[error("duplicate tool call id '{id}'")]
    DuplicateToolCallId { id: String },

    #[error("invalid tool call arguments: {message}")]
    InvalidToolArguments { message: String },

    #[error("invalid data URL: {message}")]
    InvalidDataUrl { message: String },

    #[error("field not allowed here: {message}")]
    MisplacedField { message: String },

    #[error("partial flag only allowed on the last message and on assistant role")]
    MisplacedPartial,

    #[error("tool call arguments are null on a complete message")]
    NullArguments,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field_path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field_path: field_path.into(),
            kind,
            context: None,
        }
    }

    /// Add context to the validation error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Helper to create a required field error
    pub fn required(field_path: impl Into<String>) -> Self {
        Self::new(field_path, ValidationErrorKind::RequiredFieldMissing)
    }

    /// Helper to create a misplaced field error
    pub fn misplaced(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            field_path,
            ValidationErrorKind::MisplacedField {
                message: message.into(),
            },
        )
    }

    /// Helper to create an invalid arguments error
    pub fn invalid_arguments(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            field_path,
            ValidationErrorKind::InvalidToolArguments {
                message: message.into(),
            },
        )
    }

    /// Prefix the field path with a parent path
    pub fn nested(mut self, parent: &str) -> Self {
        self.field_path = format!("{}.{}", parent, self.field_path);
        self
    }
}
