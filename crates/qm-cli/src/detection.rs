use std::path::Path;

use qm_core::{AppConfig, DetectionConfig};

/// Picks the detection settings for a run: `--detection-config` first, then
/// `QM_DETECTION_CONFIG_PATH`, then built-in defaults.
pub(crate) fn resolve_detection_config(
    flag: Option<&Path>,
    config: &AppConfig,
) -> anyhow::Result<DetectionConfig> {
    match flag.or(config.detection_config_path.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading detection config");
            Ok(qm_core::load_detection_config(path)?)
        }
        None => Ok(DetectionConfig::default()),
    }
}
