use qm_core::{Finding, FindingKind, ProductRecord};
use serde::{Deserialize, Serialize};

/// Message attached to every watermark finding.
pub const WATERMARK_MESSAGE: &str = "Potential watermark detected in product image";

/// One image to check, with the product context the service wants for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCheckRequest<'a> {
    pub image_url: &'a str,
    pub product_id: &'a str,
    pub product_name: &'a str,
}

impl<'a> ImageCheckRequest<'a> {
    /// Builds a request for `product`, or `None` when it has no usable image URL.
    #[must_use]
    pub fn from_product(product: &'a ProductRecord) -> Option<Self> {
        Some(Self {
            image_url: product.checkable_image_url()?,
            product_id: &product.id,
            product_name: &product.name,
        })
    }
}

/// The checker's decision for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkVerdict {
    pub has_watermark: bool,
    /// Unparsed model answer, kept for the audit trail.
    pub raw_response: String,
}

impl WatermarkVerdict {
    /// Interprets a free-text model answer: any "yes" means a watermark.
    #[must_use]
    pub fn from_model_answer(answer: &str) -> Self {
        Self {
            has_watermark: answer.to_lowercase().contains("yes"),
            raw_response: answer.to_string(),
        }
    }

    /// Converts a positive verdict into a watermark [`Finding`].
    #[must_use]
    pub fn into_finding(self) -> Option<Finding> {
        self.has_watermark.then(|| {
            Finding::new(FindingKind::Watermark, WATERMARK_MESSAGE).with_details(self.raw_response)
        })
    }
}

/// Body posted to a watermark-detection service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceRequest<'a> {
    pub image_url: &'a str,
    pub product_id: &'a str,
    pub product_name: &'a str,
}

impl<'a> From<&ImageCheckRequest<'a>> for ServiceRequest<'a> {
    fn from(request: &ImageCheckRequest<'a>) -> Self {
        Self {
            image_url: request.image_url,
            product_id: request.product_id,
            product_name: request.product_name,
        }
    }
}

/// Service reply. Older deployments name the raw answer `originalResponse`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceResponse {
    pub has_watermark: bool,
    #[serde(default, alias = "originalResponse")]
    pub raw_model_response: Option<String>,
}

impl From<ServiceResponse> for WatermarkVerdict {
    fn from(response: ServiceResponse) -> Self {
        Self {
            has_watermark: response.has_watermark,
            raw_response: response.raw_model_response.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat completions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrlPart<'a> },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrlPart<'a> {
    pub url: &'a str,
    pub detail: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
