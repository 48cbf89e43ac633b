//! Configuration file layout

use super::error::{SettingError, SettingErrorKind};
use super::secrets::{LogSummary, SecretString};
use crate::providers::ProviderKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Supported schema version
pub const CONFIG_VERSION: &str = "0.1";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    /// Schema version (required - no default)
    pub version: String,

    /// Per-provider settings; absent providers use their defaults
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            providers: ProvidersConfig::default(),
        }
    }
}

/// One optional settings block per provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_genai: Option<ProviderSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kimi: Option<ProviderSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_legacy: Option<ProviderSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_responses: Option<ProviderSettings>,
}

impl ProvidersConfig {
    /// Settings block for a provider, if configured
    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderSettings> {
        match kind {
            ProviderKind::Anthropic => self.anthropic.as_ref(),
            ProviderKind::GoogleGenai => self.google_genai.as_ref(),
            ProviderKind::Kimi => self.kimi.as_ref(),
            ProviderKind::OpenaiLegacy => self.openai_legacy.as_ref(),
            ProviderKind::OpenaiResponses => self.openai_responses.as_ref(),
        }
    }

    /// Configured blocks with their provider, in provider order
    pub fn iter(&self) -> impl Iterator<Item = (ProviderKind, &ProviderSettings)> {
        ProviderKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|settings| (kind, settings)))
    }
}

/// Settings for one provider encoder
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// API base URL, without the endpoint path
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model identifier placed in the request
    #[serde(default)]
    pub model: Option<String>,

    /// API key (supports environment variable interpolation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub top_p: Option<f64>,

    /// Extra headers appended to every request, in order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    /// Vendor body field that carries reasoning text (openai_legacy)
    #[serde(default)]
    pub reasoning_key: Option<String>,

    /// Requested reasoning effort level
    #[serde(default)]
    pub reasoning_effort: Option<String>,

    /// Mark cache breakpoints on the prompt (anthropic)
    #[serde(default)]
    pub prompt_caching: Option<bool>,
}

impl ConverterConfig {
    /// Check the version and every configured provider block
    pub fn validate(&self) -> Result<(), SettingError> {
        if self.version != CONFIG_VERSION {
            return Err(SettingError::new(
                "version",
                SettingErrorKind::UnsupportedVersion {
                    found: self.version.clone(),
                },
            ));
        }

        for (kind, settings) in self.providers.iter() {
            settings.validate(&format!("providers.{}", kind))?;
        }

        Ok(())
    }
}

impl ProviderSettings {
    /// Value ranges and formats that hold for every provider
    pub fn validate(&self, path: &str) -> Result<(), SettingError> {
        if let Some(base_url) = &self.base_url {
            check_base_url(base_url)
                .map_err(|kind| SettingError::new(format!("{}.base_url", path), kind))?;
        }

        let non_empty = [("model", &self.model), ("reasoning_key", &self.reasoning_key)];
        for (field, value) in non_empty {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(SettingError::empty(format!("{}.{}", path, field)));
            }
        }

        if self.max_tokens == Some(0) {
            return Err(SettingError::out_of_range(
                format!("{}.max_tokens", path),
                "[1, u32::MAX]",
                0.0,
            ));
        }

        if let Some(temperature) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(SettingError::out_of_range(
                format!("{}.temperature", path),
                "[0, 2]",
                temperature,
            ));
        }

        if let Some(top_p) = self.top_p.filter(|p| !(*p > 0.0 && *p <= 1.0)) {
            return Err(SettingError::out_of_range(
                format!("{}.top_p", path),
                "(0, 1]",
                top_p,
            ));
        }

        Ok(())
    }
}

fn check_base_url(base_url: &str) -> Result<(), SettingErrorKind> {
    let url = url::Url::parse(base_url).map_err(|e| SettingErrorKind::InvalidBaseUrl {
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SettingErrorKind::InvalidBaseUrl {
            message: format!("scheme '{}'", other),
        }),
    }
}

impl LogSummary for ProviderSettings {
    fn log_summary(&self) -> String {
        format!(
            "model={} base_url={} api_key={} headers={}",
            self.model.as_deref().unwrap_or("<default>"),
            self.base_url.as_deref().unwrap_or("<default>"),
            self.api_key
                .as_ref()
                .map(SecretString::masked)
                .unwrap_or_else(|| "<none>".to_string()),
            self.headers.len()
        )
    }
}
