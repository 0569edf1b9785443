use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One product listing row, as produced by the row parser.
///
/// The fields the detectors care about are typed; every other column rides
/// along untouched in [`ProductRecord::extra`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Merge key for issues. Unique within a batch and stable for a run.
    pub id: String,
    pub name: String,
    /// Free text scanned by the text detectors. May be empty.
    pub description: String,
    pub image_url: Option<String>,
    /// Known seller/vendor name, used as a literal needle by the vendor detector.
    pub vendor: Option<String>,
    /// Pass-through columns keyed by their original header.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ProductRecord {
    /// Creates a record with only an id and a name; every other field empty.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            image_url: None,
            vendor: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Returns `true` when the description has any non-whitespace content.
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Returns the trimmed image URL, or `None` when it is absent or blank.
    #[must_use]
    pub fn checkable_image_url(&self) -> Option<&str> {
        non_blank(self.image_url.as_deref())
    }

    /// Returns the trimmed vendor name, or `None` when it is absent or blank.
    #[must_use]
    pub fn vendor_name(&self) -> Option<&str> {
        non_blank(self.vendor.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_description_false_for_empty() {
        let product = ProductRecord::new("p1", "Chair");
        assert!(!product.has_description());
    }

    #[test]
    fn has_description_false_for_whitespace_only() {
        let product = ProductRecord::new("p1", "Chair").with_description("  \t ");
        assert!(!product.has_description());
    }

    #[test]
    fn has_description_true_for_text() {
        let product = ProductRecord::new("p1", "Chair").with_description("Oak chair");
        assert!(product.has_description());
    }

    #[test]
    fn checkable_image_url_none_when_absent() {
        let product = ProductRecord::new("p1", "Chair");
        assert!(product.checkable_image_url().is_none());
    }

    #[test]
    fn checkable_image_url_none_when_blank() {
        let product = ProductRecord::new("p1", "Chair").with_image_url("   ");
        assert!(product.checkable_image_url().is_none());
    }

    #[test]
    fn checkable_image_url_is_trimmed() {
        let product = ProductRecord::new("p1", "Chair").with_image_url(" http://x/img.jpg ");
        assert_eq!(product.checkable_image_url(), Some("http://x/img.jpg"));
    }

    #[test]
    fn vendor_name_none_when_blank() {
        let product = ProductRecord::new("p1", "Chair").with_vendor("");
        assert!(product.vendor_name().is_none());
    }

    #[test]
    fn extra_defaults_to_empty_when_missing_from_json() {
        let json = r#"{"id":"p1","name":"Chair","description":"","image_url":null,"vendor":null}"#;
        let product: ProductRecord = serde_json::from_str(json).expect("deserialization failed");
        assert!(product.extra.is_empty());
    }
}
