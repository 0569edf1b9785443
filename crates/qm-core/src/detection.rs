use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default phone pattern: ten-digit US numbers with optional dash, dot or
/// space separators, an optional parenthesized area code and an optional
/// `+CC` country code. Word boundaries keep it from matching inside longer
/// digit runs such as SKUs.
pub const DEFAULT_PHONE_REGEX: &str =
    r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)\s?|\b\d{3}[\s.-]?)\d{3}[\s.-]?\d{4}\b";

/// Immutable settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Compiled case-insensitively by the phone detector.
    #[serde(default = "default_phone_regex")]
    pub phone_regex: String,
    /// Newline-separated custom patterns; blank lines are ignored.
    #[serde(default)]
    pub custom_regex_patterns: String,
    #[serde(default = "default_true")]
    pub image_scanning_enabled: bool,
}

fn default_phone_regex() -> String {
    DEFAULT_PHONE_REGEX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            phone_regex: default_phone_regex(),
            custom_regex_patterns: String::new(),
            image_scanning_enabled: true,
        }
    }
}

impl DetectionConfig {
    #[must_use]
    pub fn with_custom_patterns(mut self, patterns: impl Into<String>) -> Self {
        self.custom_regex_patterns = patterns.into();
        self
    }

    #[must_use]
    pub fn with_image_scanning(mut self, enabled: bool) -> Self {
        self.image_scanning_enabled = enabled;
        self
    }

    /// Non-blank custom pattern lines, trimmed, paired with their 1-based index.
    pub fn custom_pattern_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.custom_regex_patterns
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| (i + 1, line))
    }
}

/// Load and validate detection settings from a YAML file.
///
/// Missing keys fall back to [`DetectionConfig::default`].
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_detection_config(path: &Path) -> Result<DetectionConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DetectionFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: DetectionConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::DetectionFileParse)?;

    validate_detection_config(&config)?;

    Ok(config)
}

fn validate_detection_config(config: &DetectionConfig) -> Result<(), ConfigError> {
    if config.phone_regex.trim().is_empty() {
        return Err(ConfigError::Validation(
            "phone_regex must be non-empty".to_string(),
        ));
    }
    Ok(())
}
