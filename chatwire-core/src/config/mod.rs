//! Configuration module
//!
//! Read-only provider settings: base URLs, models, credentials and sampling
//! defaults. Files are YAML or JSON, `${VAR}` placeholders are filled from the
//! environment before parsing, and the result is validated before use.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use error::{ConfigError, ConfigResult, SettingError, SettingErrorKind};
pub use schema::{ConverterConfig, ProviderSettings, ProvidersConfig, CONFIG_VERSION};
pub use secrets::{LogSummary, SecretString};
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<ConverterConfig> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path)?;

    let config: ConverterConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    finish(path, config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<ConverterConfig> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path)?;

    let config: ConverterConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    finish(path, config)
}

fn read_interpolated(path: &Path) -> ConfigResult<String> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let vars = env::referenced_env_vars(&content)?;
    if !vars.is_empty() {
        debug!("Interpolating environment variables: {}", vars.join(", "));
    }
    env::interpolate_env_vars(&content)
}

fn finish(path: &Path, config: ConverterConfig) -> ConfigResult<ConverterConfig> {
    ConfigValidator::new()?.validate(&config)?;

    for (kind, settings) in config.providers.iter() {
        debug!("Provider {}: {}", kind, settings.log_summary());
    }
    info!(
        "Loaded configuration from {} ({} provider block(s))",
        path.display(),
        config.providers.iter().count()
    );
    Ok(config)
}
