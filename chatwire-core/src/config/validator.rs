//! Cross-field configuration checks
//!
//! Range and format checks live on the schema types. The validator adds the
//! rules that depend on which provider a block belongs to.

use super::env::env_var_pattern;
use super::error::{ConfigError, SettingError, SettingErrorKind};
use super::schema::{ConverterConfig, ProviderSettings};
use super::secrets::SecretString;
use crate::providers::ProviderKind;
use regex::Regex;

/// Effort levels the OpenAI-style APIs accept
const OPENAI_EFFORTS: [&str; 4] = ["minimal", "low", "medium", "high"];

/// Effort levels mapped to Gemini thinking budgets
const GOOGLE_EFFORTS: [&str; 4] = ["off", "low", "medium", "high"];

/// Rules that depend on which provider a settings block belongs to
pub struct ConfigValidator {
    placeholder: Regex,
    /// RFC 9110 token
    header_name: Regex,
}

impl ConfigValidator {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            placeholder: env_var_pattern()?,
            header_name: Regex::new(r"^[!#$%&'*+.^_`|~0-9A-Za-z-]+$")?,
        })
    }

    /// Run the schema checks, then the provider-specific ones
    pub fn validate(&self, config: &ConverterConfig) -> Result<(), SettingError> {
        config.validate()?;

        for (kind, settings) in config.providers.iter() {
            let path = format!("providers.{}", kind);
            check_provider_options(kind, settings, &path)?;
            self.check_headers(settings, &path)?;
            self.check_placeholders(settings, &path)?;
        }

        Ok(())
    }

    fn check_headers(&self, settings: &ProviderSettings, path: &str) -> Result<(), SettingError> {
        match settings.headers.keys().find(|name| !self.is_valid_header_name(name)) {
            Some(name) => Err(SettingError::new(
                format!("{}.headers.{}", path, name),
                SettingErrorKind::InvalidHeaderName { name: name.clone() },
            )),
            None => Ok(()),
        }
    }

    fn check_placeholders(&self, settings: &ProviderSettings, path: &str) -> Result<(), SettingError> {
        let fields = [
            ("api_key", settings.api_key.as_ref().map(SecretString::expose)),
            ("base_url", settings.base_url.as_deref()),
            ("model", settings.model.as_deref()),
        ];
        for (field, value) in fields {
            if let Some(cap) = value.and_then(|value| self.placeholder.captures(value)) {
                return Err(SettingError::new(
                    format!("{}.{}", path, field),
                    SettingErrorKind::UnresolvedPlaceholder {
                        var: cap[1].to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    pub fn is_valid_header_name(&self, name: &str) -> bool {
        self.header_name.is_match(name)
    }
}

/// Options that only one provider reads, and per-provider effort levels
fn check_provider_options(
    kind: ProviderKind,
    settings: &ProviderSettings,
    path: &str,
) -> Result<(), SettingError> {
    if settings.reasoning_key.is_some() && kind != ProviderKind::OpenaiLegacy {
        return Err(SettingError::not_applicable(format!("{}.reasoning_key", path), kind));
    }

    if settings.prompt_caching.is_some() && kind != ProviderKind::Anthropic {
        return Err(SettingError::not_applicable(format!("{}.prompt_caching", path), kind));
    }

    let Some(effort) = &settings.reasoning_effort else {
        return Ok(());
    };
    let field = format!("{}.reasoning_effort", path);
    let allowed: &[&str] = match kind {
        ProviderKind::Anthropic => return Err(SettingError::not_applicable(field, kind)),
        ProviderKind::GoogleGenai => &GOOGLE_EFFORTS,
        _ => &OPENAI_EFFORTS,
    };
    if allowed.contains(&effort.as_str()) {
        Ok(())
    } else {
        Err(SettingError::new(
            field,
            SettingErrorKind::UnknownEffort {
                value: effort.clone(),
                allowed: allowed.join(", "),
            },
        ))
    }
}
