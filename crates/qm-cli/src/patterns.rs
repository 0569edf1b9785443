use std::path::Path;

use qm_core::AppConfig;
use qm_detect::{compile_custom_patterns, DetectError, DetectorSet};

use crate::detection::resolve_detection_config;

/// Compiles the configured patterns and reports which ones are usable.
pub(crate) fn run_patterns(config: &AppConfig, flag: Option<&Path>) -> anyhow::Result<()> {
    let detection = resolve_detection_config(flag, config)?;

    match DetectorSet::from_config(&detection) {
        Ok(_) => println!("phone pattern: ok"),
        Err(e) => println!("phone pattern: {e}"),
    }
    println!(
        "image scanning: {}",
        if detection.image_scanning_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let (compiled, skipped) = compile_custom_patterns(&detection);
    if compiled.is_empty() && skipped.is_empty() {
        println!("no custom patterns configured");
        return Ok(());
    }

    for pattern in &compiled {
        println!("#{} ok       {}", pattern.index, pattern.regex.as_str());
    }
    for error in &skipped {
        if let DetectError::InvalidPattern { index, pattern, .. } = error {
            println!("#{index} invalid  {pattern}");
        }
    }
    println!(
        "{} of {} custom patterns usable",
        compiled.len(),
        compiled.len() + skipped.len()
    );

    Ok(())
}
