//! Configuration errors
//!
//! Loading fails on I/O, parsing or interpolation; a parsed file fails on the
//! first [`SettingError`], which names the offending key by its dotted path.

use crate::providers::ProviderKind;
use thiserror::Error;

/// Error raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in '{path}' at line {}, column {}: {message}",
            .line.unwrap_or(0), .column.unwrap_or(0))]
    Parse {
        path: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error(transparent)]
    Setting(#[from] SettingError),

    #[error("Environment variable '{var}' is not set")]
    MissingEnvVar { var: String },

    #[error("Bad built-in pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A rejected configuration value
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid setting '{field_path}': {kind}")]
pub struct SettingError {
    /// Dotted path of the key, e.g. `providers.kimi.top_p`
    pub field_path: String,
    pub kind: SettingErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingErrorKind {
    #[error("value must not be empty")]
    Empty,

    #[error("unsupported config version '{found}'")]
    UnsupportedVersion { found: String },

    #[error("not an http(s) URL: {message}")]
    InvalidBaseUrl { message: String },

    #[error("{actual} is outside {allowed}")]
    OutOfRange { allowed: &'static str, actual: f64 },

    #[error("not used by {provider}")]
    NotApplicable { provider: ProviderKind },

    #[error("unknown reasoning effort '{value}' (expected one of: {allowed})")]
    UnknownEffort { value: String, allowed: String },

    #[error("'{name}' is not a valid header name")]
    InvalidHeaderName { name: String },

    #[error("placeholder '${{{var}}}' was not interpolated")]
    UnresolvedPlaceholder { var: String },
}

impl SettingError {
    pub fn new(field_path: impl Into<String>, kind: SettingErrorKind) -> Self {
        Self {
            field_path: field_path.into(),
            kind,
        }
    }

    pub fn empty(field_path: impl Into<String>) -> Self {
        Self::new(field_path, SettingErrorKind::Empty)
    }

    pub fn out_of_range(field_path: impl Into<String>, allowed: &'static str, actual: f64) -> Self {
        Self::new(field_path, SettingErrorKind::OutOfRange { allowed, actual })
    }

    pub fn not_applicable(field_path: impl Into<String>, provider: ProviderKind) -> Self {
        Self::new(field_path, SettingErrorKind::NotApplicable { provider })
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_key() {
        let err = SettingError::out_of_range("providers.kimi.top_p", "(0, 1]", 1.5);
        assert_eq!(
            err.to_string(),
            "Invalid setting 'providers.kimi.top_p': 1.5 is outside (0, 1]"
        );

        let err = SettingError::not_applicable("providers.kimi.prompt_caching", ProviderKind::Kimi);
        assert_eq!(
            err.to_string(),
            "Invalid setting 'providers.kimi.prompt_caching': not used by kimi"
        );
    }

    #[test]
    fn test_placeholder_message() {
        let kind = SettingErrorKind::UnresolvedPlaceholder {
            var: "KIMI_API_KEY".to_string(),
        };
        assert_eq!(kind.to_string(), "placeholder '${KIMI_API_KEY}' was not interpolated");
    }
}
