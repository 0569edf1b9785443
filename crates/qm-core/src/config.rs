use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("QM_ENV", "development"))?;
    let log_level = or_default("QM_LOG_LEVEL", "info");
    let detection_config_path = optional("QM_DETECTION_CONFIG_PATH").map(PathBuf::from);

    let watermark_service_url = optional("QM_WATERMARK_SERVICE_URL");
    let vision_api_url = or_default(
        "QM_VISION_API_URL",
        "https://api.openai.com/v1/chat/completions",
    );
    let vision_api_key = optional("OPENAI_API_KEY");
    let vision_model = or_default("QM_VISION_MODEL", "gpt-4o-mini");
    let vision_request_timeout_secs = parse_u64("QM_VISION_REQUEST_TIMEOUT_SECS", "60")?;
    let vision_user_agent = or_default(
        "QM_VISION_USER_AGENT",
        "quality-manager/0.1 (listing-quality)",
    );
    let vision_max_retries = parse_u32("QM_VISION_MAX_RETRIES", "2")?;
    let vision_retry_backoff_base_ms = parse_u64("QM_VISION_RETRY_BACKOFF_BASE_MS", "1000")?;
    let vision_inter_request_delay_ms = parse_u64("QM_VISION_INTER_REQUEST_DELAY_MS", "0")?;

    Ok(AppConfig {
        env,
        log_level,
        detection_config_path,
        watermark_service_url,
        vision_api_url,
        vision_api_key,
        vision_model,
        vision_request_timeout_secs,
        vision_user_agent,
        vision_max_retries,
        vision_retry_backoff_base_ms,
        vision_inter_request_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "QM_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
