use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "QM_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.detection_config_path.is_none());
    assert!(cfg.watermark_service_url.is_none());
    assert_eq!(
        cfg.vision_api_url,
        "https://api.openai.com/v1/chat/completions"
    );
    assert!(cfg.vision_api_key.is_none());
    assert_eq!(cfg.vision_model, "gpt-4o-mini");
    assert_eq!(cfg.vision_request_timeout_secs, 60);
    assert_eq!(cfg.vision_user_agent, "quality-manager/0.1 (listing-quality)");
    assert_eq!(cfg.vision_max_retries, 2);
    assert_eq!(cfg.vision_retry_backoff_base_ms, 1000);
    assert_eq!(cfg.vision_inter_request_delay_ms, 0);
}

#[test]
fn build_app_config_fails_with_unknown_env() {
    let mut map = HashMap::new();
    map.insert("QM_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "QM_ENV"),
        "expected InvalidEnvVar(QM_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_detection_config_path() {
    let mut map = HashMap::new();
    map.insert("QM_DETECTION_CONFIG_PATH", "./config/detection.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.detection_config_path.as_deref(),
        Some(std::path::Path::new("./config/detection.yaml"))
    );
}

#[test]
fn build_app_config_treats_blank_values_as_unset() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "  ");
    map.insert("QM_WATERMARK_SERVICE_URL", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.vision_api_key.is_none());
    assert!(cfg.watermark_service_url.is_none());
}

#[test]
fn build_app_config_reads_vision_overrides() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "sk-test");
    map.insert("QM_VISION_MODEL", "gpt-4o");
    map.insert("QM_WATERMARK_SERVICE_URL", "http://localhost:3000/api/check-watermark");
    map.insert("QM_VISION_MAX_RETRIES", "5");
    map.insert("QM_VISION_INTER_REQUEST_DELAY_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.vision_api_key.as_deref(), Some("sk-test"));
    assert_eq!(cfg.vision_model, "gpt-4o");
    assert_eq!(
        cfg.watermark_service_url.as_deref(),
        Some("http://localhost:3000/api/check-watermark")
    );
    assert_eq!(cfg.vision_max_retries, 5);
    assert_eq!(cfg.vision_inter_request_delay_ms, 250);
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("QM_VISION_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "QM_VISION_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(QM_VISION_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_max_retries() {
    let mut map = HashMap::new();
    map.insert("QM_VISION_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "QM_VISION_MAX_RETRIES"),
        "expected InvalidEnvVar(QM_VISION_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "sk-very-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("sk-very-secret"));
    assert!(rendered.contains("[redacted]"));
}
