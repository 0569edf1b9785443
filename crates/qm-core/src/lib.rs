//! Shared domain types and configuration for Quality Manager.
//!
//! Every other crate in the workspace depends on this one for the product and
//! issue model, the immutable detection settings handed to an analysis run,
//! and the environment-driven [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod detection;
pub mod issues;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use detection::{load_detection_config, DetectionConfig, DEFAULT_PHONE_REGEX};
pub use issues::{Finding, FindingKind, IssueRecord};
pub use products::ProductRecord;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read detection config at {path}: {source}")]
    DetectionFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse detection config: {0}")]
    DetectionFileParse(#[source] serde_yaml::Error),

    #[error("invalid detection config: {0}")]
    Validation(String),
}
