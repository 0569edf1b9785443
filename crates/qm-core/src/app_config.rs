use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// YAML file with detection settings; built-in defaults when unset.
    pub detection_config_path: Option<PathBuf>,
    /// When set, image checks go through this watermark service instead of
    /// calling the vision model directly.
    pub watermark_service_url: Option<String>,
    pub vision_api_url: String,
    pub vision_api_key: Option<String>,
    pub vision_model: String,
    pub vision_request_timeout_secs: u64,
    pub vision_user_agent: String,
    pub vision_max_retries: u32,
    pub vision_retry_backoff_base_ms: u64,
    pub vision_inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("detection_config_path", &self.detection_config_path)
            .field("watermark_service_url", &self.watermark_service_url)
            .field("vision_api_url", &self.vision_api_url)
            .field(
                "vision_api_key",
                &self.vision_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("vision_model", &self.vision_model)
            .field(
                "vision_request_timeout_secs",
                &self.vision_request_timeout_secs,
            )
            .field("vision_user_agent", &self.vision_user_agent)
            .field("vision_max_retries", &self.vision_max_retries)
            .field(
                "vision_retry_backoff_base_ms",
                &self.vision_retry_backoff_base_ms,
            )
            .field(
                "vision_inter_request_delay_ms",
                &self.vision_inter_request_delay_ms,
            )
            .finish()
    }
}
