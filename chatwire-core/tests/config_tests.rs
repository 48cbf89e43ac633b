//! Integration tests for configuration loading and validation

use chatwire_core::config::{load_from_json, load_from_yaml, ConfigError, SettingErrorKind};
use chatwire_core::providers::{Encoder, ProviderKind};
use chatwire_core::Converter;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test config file
fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_valid_yaml_config() {
    std::env::set_var("CHATWIRE_TEST_ANTHROPIC_KEY", "sk-ant-from-env");

    let yaml = r#"
version: "0.1"
providers:
  anthropic:
    api_key: ${CHATWIRE_TEST_ANTHROPIC_KEY}
    model: claude-sonnet-4
    max_tokens: 2048
    prompt_caching: false
  openai_legacy:
    base_url: https://proxy.example.com/v1
    reasoning_key: reasoning_content
"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.yaml", yaml);
    let config = load_from_yaml(path).unwrap();

    assert_eq!(config.version, "0.1");
    let anthropic = config.providers.get(ProviderKind::Anthropic).unwrap();
    assert_eq!(
        anthropic.api_key.as_ref().map(|key| key.expose()),
        Some("sk-ant-from-env")
    );
    assert_eq!(anthropic.prompt_caching, Some(false));
    assert!(config.providers.get(ProviderKind::Kimi).is_none());

    let converter = Converter::from_config(&config).unwrap();
    let legacy = converter.encoder(ProviderKind::OpenaiLegacy).unwrap();
    assert_eq!(legacy.endpoint(), "https://proxy.example.com/v1/chat/completions");
    let anthropic = converter.encoder(ProviderKind::Anthropic).unwrap();
    assert_eq!(anthropic.settings().model, "claude-sonnet-4");
    assert_eq!(anthropic.settings().api_key(), Some("sk-ant-from-env"));

    std::env::remove_var("CHATWIRE_TEST_ANTHROPIC_KEY");
}

#[test]
fn test_load_valid_json_config() {
    let json = r#"{
        "version": "0.1",
        "providers": {
            "google_genai": {"model": "gemini-2.5-flash", "reasoning_effort": "high"},
            "kimi": {"temperature": 0.8, "headers": {"X-Trace-Id": "abc"}}
        }
    }"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.json", json);
    let config = load_from_json(path).unwrap();

    let kimi = config.providers.kimi.as_ref().unwrap();
    assert_eq!(kimi.temperature, Some(0.8));
    assert_eq!(kimi.headers.get("X-Trace-Id").map(String::as_str), Some("abc"));
    assert_eq!(
        config.providers.google_genai.as_ref().unwrap().reasoning_effort.as_deref(),
        Some("high")
    );
}

#[test]
fn test_missing_file() {
    let result = load_from_yaml("/nonexistent/chatwire.yaml");
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_missing_env_var() {
    let yaml = r#"
version: "0.1"
providers:
  kimi:
    api_key: ${CHATWIRE_DEFINITELY_UNSET_VAR}
"#;
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.yaml", yaml);

    match load_from_yaml(path) {
        Err(ConfigError::MissingEnvVar { var }) => assert_eq!(var, "CHATWIRE_DEFINITELY_UNSET_VAR"),
        other => panic!("expected MissingEnvVar, got {other:?}"),
    }
}

#[test]
fn test_parse_error_reports_location() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.json", "{\"version\": \"0.1\",\n  \"providers\": [}");

    match load_from_json(path) {
        Err(ConfigError::Parse { line, .. }) => assert_eq!(line, Some(2)),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn test_unknown_provider_rejected() {
    let yaml = r#"
version: "0.1"
providers:
  mistral:
    model: large
"#;
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.yaml", yaml);
    assert!(matches!(load_from_yaml(path), Err(ConfigError::Parse { .. })));
}

#[test]
fn test_wrong_version() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.yaml", "version: \"2.0\"\n");

    match load_from_yaml(path) {
        Err(ConfigError::Setting(e)) => {
            assert_eq!(e.field_path, "version");
            assert!(matches!(e.kind, SettingErrorKind::UnsupportedVersion { .. }));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_validation_errors_name_the_field() {
    let cases = [
        ("anthropic:\n    temperature: 2.5", "providers.anthropic.temperature"),
        ("kimi:\n    max_tokens: 0", "providers.kimi.max_tokens"),
        ("openai_responses:\n    base_url: not a url", "providers.openai_responses.base_url"),
        ("google_genai:\n    prompt_caching: true", "providers.google_genai.prompt_caching"),
        ("anthropic:\n    reasoning_effort: high", "providers.anthropic.reasoning_effort"),
        ("kimi:\n    headers:\n      \"bad header\": x", "providers.kimi.headers.bad header"),
    ];

    let dir = TempDir::new().unwrap();
    for (i, (block, field)) in cases.iter().enumerate() {
        let yaml = format!("version: \"0.1\"\nproviders:\n  {}\n", block);
        let path = create_test_file(&dir, &format!("case{}.yaml", i), &yaml);
        match load_from_yaml(path) {
            Err(ConfigError::Setting(e)) => assert_eq!(&e.field_path, field),
            other => panic!("case {i}: expected validation error at {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_secret_is_redacted_in_debug() {
    let yaml = r#"
version: "0.1"
providers:
  openai_legacy:
    api_key: sk-super-secret-value
"#;
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "config.yaml", yaml);
    let config = load_from_yaml(path).unwrap();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("sk-super-secret-value"));
    assert!(debug.contains("[REDACTED]"));
}
