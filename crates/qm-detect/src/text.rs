//! Text detectors: vendor name, phone number, and user-supplied patterns.
//!
//! Patterns are compiled once per run by [`DetectorSet::from_config`]; the
//! per-product [`DetectorSet::detect`] call never fails.

use qm_core::{DetectionConfig, Finding, FindingKind, ProductRecord};
use regex::{Regex, RegexBuilder};

use crate::error::DetectError;

/// A compiled custom pattern with its 1-based position in the configuration.
#[derive(Debug, Clone)]
pub struct CustomPattern {
    pub index: usize,
    pub regex: Regex,
}

/// Every text detector for one run, compiled up front.
#[derive(Debug)]
pub struct DetectorSet {
    phone: Regex,
    custom: Vec<CustomPattern>,
    skipped: Vec<DetectError>,
}

impl DetectorSet {
    /// Compile the phone pattern and every custom pattern.
    ///
    /// Custom patterns that fail to compile are logged and skipped; they are
    /// available afterwards through [`DetectorSet::skipped_patterns`].
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidPhonePattern`] if the phone pattern does
    /// not compile.
    pub fn from_config(config: &DetectionConfig) -> Result<Self, DetectError> {
        let phone = case_insensitive(&config.phone_regex).map_err(|source| {
            DetectError::InvalidPhonePattern {
                pattern: config.phone_regex.clone(),
                source,
            }
        })?;
        let (custom, skipped) = compile_custom_patterns(config);
        Ok(Self {
            phone,
            custom,
            skipped,
        })
    }

    /// Custom patterns that were rejected at configuration time.
    #[must_use]
    pub fn skipped_patterns(&self) -> &[DetectError] {
        &self.skipped
    }

    #[must_use]
    pub fn custom_patterns(&self) -> &[CustomPattern] {
        &self.custom
    }

    /// Run every text detector over `product`.
    ///
    /// Findings are ordered vendor, phone, then custom patterns by index.
    /// A blank description yields no findings and runs no regex.
    #[must_use]
    pub fn detect(&self, product: &ProductRecord) -> Vec<Finding> {
        if !product.has_description() {
            return Vec::new();
        }

        let mut findings = Vec::new();
        findings.extend(detect_vendor(product));
        findings.extend(detect_phone(&self.phone, product));
        findings.extend(
            self.custom
                .iter()
                .filter_map(|pattern| detect_custom(pattern, product)),
        );
        findings
    }
}

/// Vendor detector: the product's own vendor name appearing in its description.
///
/// Literal, case-insensitive substring match; no regex involved.
#[must_use]
pub fn detect_vendor(product: &ProductRecord) -> Option<Finding> {
    if !product.has_description() {
        return None;
    }
    let vendor = product.vendor_name()?;
    if !product
        .description
        .to_lowercase()
        .contains(&vendor.to_lowercase())
    {
        return None;
    }
    Some(
        Finding::new(
            FindingKind::VendorInfo,
            format!("Description contains vendor name: {vendor}"),
        )
        .with_matched_text(vendor),
    )
}

/// Phone detector: first match of `phone` in the description.
#[must_use]
pub fn detect_phone(phone: &Regex, product: &ProductRecord) -> Option<Finding> {
    if !product.has_description() {
        return None;
    }
    let matched = phone.find(&product.description)?.as_str();
    Some(
        Finding::new(
            FindingKind::PhoneNumber,
            format!("Description contains phone number: {matched}"),
        )
        .with_matched_text(matched),
    )
}

fn detect_custom(pattern: &CustomPattern, product: &ProductRecord) -> Option<Finding> {
    let matched = pattern.regex.find(&product.description)?.as_str();
    Some(
        Finding::new(
            FindingKind::Other,
            format!("Description matches custom pattern #{}", pattern.index),
        )
        .with_matched_text(matched),
    )
}

/// Compile the newline-separated custom patterns from `config`.
///
/// Returns the patterns that compiled and an [`DetectError::InvalidPattern`]
/// for each one that did not. Indexes count non-blank lines from 1, so a
/// rejected pattern does not shift the numbering of the ones after it.
#[must_use]
pub fn compile_custom_patterns(
    config: &DetectionConfig,
) -> (Vec<CustomPattern>, Vec<DetectError>) {
    let mut compiled = Vec::new();
    let mut skipped = Vec::new();

    for (index, line) in config.custom_pattern_lines() {
        match case_insensitive(line) {
            Ok(regex) => compiled.push(CustomPattern { index, regex }),
            Err(source) => {
                tracing::warn!(
                    index,
                    pattern = line,
                    error = %source,
                    "invalid custom pattern, skipping"
                );
                skipped.push(DetectError::InvalidPattern {
                    index,
                    pattern: line.to_string(),
                    source,
                });
            }
        }
    }

    (compiled, skipped)
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
