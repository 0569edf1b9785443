use serde::{Deserialize, Serialize};

use crate::products::ProductRecord;

/// Category of listing-quality problem a detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    VendorInfo,
    PhoneNumber,
    Watermark,
    Other,
}

impl FindingKind {
    pub const ALL: [FindingKind; 4] = [
        FindingKind::VendorInfo,
        FindingKind::PhoneNumber,
        FindingKind::Watermark,
        FindingKind::Other,
    ];
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingKind::VendorInfo => write!(f, "vendor_info"),
            FindingKind::PhoneNumber => write!(f, "phone_number"),
            FindingKind::Watermark => write!(f, "watermark"),
            FindingKind::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for FindingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor_info" => Ok(FindingKind::VendorInfo),
            "phone_number" => Ok(FindingKind::PhoneNumber),
            "watermark" => Ok(FindingKind::Watermark),
            "other" => Ok(FindingKind::Other),
            other => Err(format!("unknown finding kind: {other}")),
        }
    }
}

/// One detector's evidence that a specific problem exists for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    /// The substring or value that triggered the finding.
    pub matched_text: Option<String>,
    /// Audit trail, e.g. the raw vision-model answer for a watermark.
    pub details: Option<String>,
}

impl Finding {
    #[must_use]
    pub fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            matched_text: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_matched_text(mut self, matched: impl Into<String>) -> Self {
        self.matched_text = Some(matched.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Per-product aggregate of every finding discovered during one run.
///
/// `id` is the product id; a product has at most one record. Findings are
/// append-only while the run is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: String,
    pub product_name: String,
    pub findings: Vec<Finding>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub resolved: bool,
}

impl IssueRecord {
    /// Opens a record for `product` seeded with `findings`.
    #[must_use]
    pub fn open(product: &ProductRecord, findings: Vec<Finding>) -> Self {
        Self {
            id: product.id.clone(),
            product_name: product.name.clone(),
            findings,
            image_url: product.image_url.clone(),
            resolved: false,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.id
    }

    /// Number of findings of the given kind on this record.
    #[must_use]
    pub fn count_of(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    #[must_use]
    pub fn has_kind(&self, kind: FindingKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }
}
