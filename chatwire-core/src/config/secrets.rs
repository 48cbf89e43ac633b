//! Credentials in configuration
//!
//! API keys are held in [`SecretString`], whose `Debug` and `Display` never
//! print the value. Encoders read it once, when they build the auth header.

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// An API key or other credential
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last four characters only, for telling keys apart in logs
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < 12 {
            return REDACTED.to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One-line summary of a value with credentials masked
pub trait LogSummary {
    fn log_summary(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_never_shows_value() {
        let secret = SecretString::new("sk-1234567890abcdef");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(secret.masked(), "****cdef");
        assert_eq!(secret.expose(), "sk-1234567890abcdef");
    }

    #[test]
    fn test_short_keys_fully_masked() {
        assert_eq!(SecretString::new("abc").masked(), "[REDACTED]");
        assert_eq!(SecretString::new("").masked(), "[REDACTED]");
        assert_eq!(SecretString::new("ключ-ключ-ключ").masked(), "****ключ");
    }

    #[test]
    fn test_deserializes_from_plain_string() {
        let secret: SecretString = serde_json::from_str("\"moonshot-key\"").unwrap();
        assert_eq!(secret.expose(), "moonshot-key");
    }
}
