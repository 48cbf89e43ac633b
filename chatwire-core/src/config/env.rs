//! Environment variable interpolation for configuration

use super::error::ConfigError;
use regex::Regex;
use std::env;

const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

/// Compiled `${VAR}` placeholder pattern
pub fn env_var_pattern() -> Result<Regex, ConfigError> {
    Ok(Regex::new(ENV_VAR_PATTERN)?)
}

/// Interpolate environment variables in a configuration string
///
/// Every `${VAR}` placeholder must resolve; the first missing variable is
/// reported.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let pattern = env_var_pattern()?;
    let mut missing = None;

    let result = pattern.replace_all(content, |cap: &regex::Captures<'_>| {
        match env::var(&cap[1]) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| cap[1].to_string());
                String::new()
            }
        }
    });

    if let Some(var) = missing {
        return Err(ConfigError::MissingEnvVar { var });
    }

    Ok(result.into_owned())
}

/// Names of the variables referenced by `text`
pub fn referenced_env_vars(text: &str) -> Result<Vec<String>, ConfigError> {
    Ok(env_var_pattern()?
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_env_vars() {
        env::set_var("CHATWIRE_TEST_VAR", "test_value");

        let content = "api_key: ${CHATWIRE_TEST_VAR}";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "api_key: test_value");

        env::remove_var("CHATWIRE_TEST_VAR");
    }

    #[test]
    fn test_missing_env_var() {
        let content = "api_key: ${CHATWIRE_MISSING_VAR}";
        let result = interpolate_env_vars(content);

        match result {
            Err(ConfigError::MissingEnvVar { var }) => assert_eq!(var, "CHATWIRE_MISSING_VAR"),
            other => panic!("Expected MissingEnvVar error, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_env_vars() {
        env::set_var("CHATWIRE_VAR1", "value1");
        env::set_var("CHATWIRE_VAR2", "value2");

        let content = "key1: ${CHATWIRE_VAR1}, key2: ${CHATWIRE_VAR2}";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "key1: value1, key2: value2");

        env::remove_var("CHATWIRE_VAR1");
        env::remove_var("CHATWIRE_VAR2");
    }

    #[test]
    fn test_referenced_env_vars() {
        let vars = referenced_env_vars("a: ${KIMI_API_KEY}, b: ${BASE_URL}, c: $PLAIN").unwrap();
        assert_eq!(vars, vec!["KIMI_API_KEY".to_string(), "BASE_URL".to_string()]);
    }
}
