//! Configuration loading and validation tests

use imago_core::capabilities::Constraint;
use imago_core::config::{
    load_from_json, load_from_yaml, ConfigError, ProviderKind, ValidationErrorKind,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_YAML: &str = r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: sk-zhipu-test
    base_url: https://open.bigmodel.cn/api/paas/v4
    models:
      - id: cogview-4
        supported_parameters: [size, n, quality]
        defaults:
          n: 1
        overrides:
          size:
            one_of:
              values: ["768x768", "1024x1024", "1440x720"]
  - id: stability
    kind: stability
    api_key: sk-stability-test
    base_url: https://api.stability.ai
    timeout_secs: 120
    enabled: false
    models:
      - id: sd3-large
        supported_parameters: [width, height, steps, cfg, seed, negative_prompt]
"#;

#[test]
fn test_load_valid_yaml() {
    let file = write_temp(VALID_YAML);
    let config = load_from_yaml(file.path()).unwrap();

    assert_eq!(config.version, "1");
    assert_eq!(config.providers.len(), 2);

    let zhipu = &config.providers[0];
    assert_eq!(zhipu.id, "zhipu");
    assert_eq!(zhipu.kind, ProviderKind::OpenaiCompat);
    assert!(zhipu.enabled);
    assert_eq!(zhipu.models.len(), 1);

    let cogview = &zhipu.models[0];
    assert_eq!(cogview.id, "cogview-4");
    assert_eq!(cogview.defaults["n"], serde_json::json!(1));
    assert!(matches!(
        cogview.overrides.get("size"),
        Some(Constraint::OneOf { values }) if values.len() == 3
    ));

    let stability = &config.providers[1];
    assert_eq!(stability.kind, ProviderKind::Stability);
    assert!(!stability.enabled);
    assert_eq!(stability.timeout_secs, Some(120));
}

#[test]
fn test_env_var_interpolation() {
    std::env::set_var("IMAGO_TEST_CONFIG_KEY", "sk-from-env");
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: ${IMAGO_TEST_CONFIG_KEY}
    base_url: https://open.bigmodel.cn/api/paas/v4
"#,
    );

    let config = load_from_yaml(file.path()).unwrap();
    assert_eq!(
        config.providers[0].api_key.expose_secret(),
        "sk-from-env"
    );
    std::env::remove_var("IMAGO_TEST_CONFIG_KEY");
}

#[test]
fn test_missing_env_var_is_an_error() {
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: ${IMAGO_TEST_DEFINITELY_UNSET}
    base_url: https://example.com
"#,
    );

    let err = load_from_yaml(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::EnvVarNotFound { ref var } if var == "IMAGO_TEST_DEFINITELY_UNSET"
    ));
}

#[test]
fn test_unsupported_version_rejected() {
    let file = write_temp("version: \"2\"\nproviders: []\n");
    let err = load_from_yaml(file.path()).unwrap_err();

    match err {
        ConfigError::ValidationError(e) => {
            assert_eq!(e.field_path, "version");
            assert!(matches!(e.kind, ValidationErrorKind::InvalidValue { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_duplicate_provider_id_rejected() {
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: key-a
    base_url: https://a.example.com
  - id: zhipu
    kind: openai-compat
    api_key: key-b
    base_url: https://b.example.com
"#,
    );

    let err = load_from_yaml(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationError(e) => {
            assert_eq!(e.field_path, "providers[1].id");
            assert!(matches!(e.kind, ValidationErrorKind::DuplicateValue { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_duplicate_model_id_across_providers_rejected() {
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: key-a
    base_url: https://a.example.com
    models:
      - id: shared-model
  - id: other
    kind: openai-compat
    api_key: key-b
    base_url: https://b.example.com
    models:
      - id: shared-model
"#,
    );

    let err = load_from_yaml(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationError(e) => {
            assert!(e.field_path.starts_with("providers[1].models[0]"));
            assert!(matches!(e.kind, ValidationErrorKind::DuplicateValue { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_invalid_base_url_rejected() {
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: key-a
    base_url: "not a url"
"#,
    );

    let err = load_from_yaml(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationError(e) => {
            assert_eq!(e.field_path, "providers[0].base_url");
            assert!(matches!(e.kind, ValidationErrorKind::InvalidUrl { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_non_standard_parameter_rejected() {
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: key-a
    base_url: https://a.example.com
    models:
      - id: cogview-4
        supported_parameters: [size, watermark]
"#,
    );

    let err = load_from_yaml(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationError(e) => {
            assert!(matches!(
                e.kind,
                ValidationErrorKind::UnknownParameter { ref name } if name == "watermark"
            ));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_default_for_unsupported_parameter_rejected() {
    let file = write_temp(
        r#"
version: "1"
providers:
  - id: zhipu
    kind: openai-compat
    api_key: key-a
    base_url: https://a.example.com
    models:
      - id: cogview-4
        supported_parameters: [size]
        defaults:
          n: 1
"#,
    );

    let err = load_from_yaml(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationError(e) => {
            assert_eq!(e.field_path, "providers[0].models[0].defaults.n");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_top_level_field_is_parse_error() {
    let file = write_temp("version: \"1\"\nrouting: {}\n");
    let err = load_from_yaml(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_load_from_json() {
    let file = write_temp(
        r#"{
  "version": "1",
  "providers": [
    {
      "id": "zhipu",
      "kind": "openai-compat",
      "api_key": "sk-json-test",
      "base_url": "https://open.bigmodel.cn/api/paas/v4",
      "models": [{"id": "cogview-4", "supported_parameters": ["size"]}]
    }
  ]
}"#,
    );

    let config = load_from_json(file.path()).unwrap();
    assert_eq!(config.providers[0].api_key.expose_secret(), "sk-json-test");
    assert_eq!(config.providers[0].models[0].id, "cogview-4");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_from_yaml("/nonexistent/imago.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::IoError { .. }));
}

#[test]
fn test_api_keys_are_redacted_in_debug_output() {
    let file = write_temp(VALID_YAML);
    let config = load_from_yaml(file.path()).unwrap();

    let debug = format!("{:?}", config);
    assert!(!debug.contains("sk-zhipu-test"));
    assert!(!debug.contains("sk-stability-test"));
    assert!(debug.contains("[REDACTED]"));
}
