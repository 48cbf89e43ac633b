//! Conversion error types

use super::ProviderKind;
use crate::protocol::ValidationError;
use thiserror::Error;

/// Result type for encoder operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors an encoder can report for its provider slot
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The message violates an invariant; names the offending field
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The provider has no representation for a feature the message uses
    #[error("{provider} does not support {feature}")]
    UnsupportedFeature {
        provider: ProviderKind,
        feature: String,
    },

    /// An encoder invariant was broken; always a defect
    #[error("Internal encoding error: {0}")]
    InternalEncoding(String),
}

impl ConvertError {
    /// Helper to create an unsupported feature error
    pub fn unsupported(provider: ProviderKind, feature: impl Into<String>) -> Self {
        ConvertError::UnsupportedFeature {
            provider,
            feature: feature.into(),
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Validation(_) => "validation_error",
            ConvertError::UnsupportedFeature { .. } => "unsupported_feature",
            ConvertError::InternalEncoding(_) => "internal_encoding_error",
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::InternalEncoding(err.to_string())
    }
}
