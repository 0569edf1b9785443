//! Direct client for an OpenAI-compatible chat-completions endpoint.

use qm_core::Finding;
use reqwest::{Client, Url};

use crate::checker::{ClientOptions, ImageChecker};
use crate::error::VisionError;
use crate::http::{build_client, parse_endpoint, post_json};
use crate::retry::retry_with_backoff;
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageCheckRequest, ImageUrlPart,
    WatermarkVerdict,
};

/// Instruction sent alongside every image. The answer is read as a yes/no.
pub const WATERMARK_PROMPT: &str = "Examine this product image and decide whether it carries a \
watermark that is not part of the product itself: semi-transparent text, company names, website \
URLs, or photographer credits laid over the picture. A signature written on the product is not a \
watermark. Answer with the single word 'yes' if you see a watermark or 'no' if the image is clean.";

pub struct VisionModelClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl VisionModelClient {
    /// Creates a client for the chat-completions `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::InvalidEndpoint`] if `endpoint` does not parse,
    /// or [`VisionError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        model: &str,
        options: &ClientOptions,
    ) -> Result<Self, VisionError> {
        Ok(Self {
            client: build_client(options.timeout_secs, &options.user_agent)?,
            endpoint: parse_endpoint(endpoint)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Asks the model whether the image carries a watermark.
    ///
    /// A `null` message content is read as an empty (negative) answer.
    ///
    /// # Errors
    ///
    /// - [`VisionError::RateLimited`] / [`VisionError::UnexpectedStatus`] for non-2xx replies.
    /// - [`VisionError::Http`] on network failure after all retries.
    /// - [`VisionError::Deserialize`] if the reply is not chat-completions JSON.
    /// - [`VisionError::EmptyResponse`] if the reply has no choices.
    pub async fn verdict(
        &self,
        request: &ImageCheckRequest<'_>,
    ) -> Result<WatermarkVerdict, VisionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: WATERMARK_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlPart {
                            url: request.image_url,
                            detail: "high",
                        },
                    },
                ],
            }],
        };
        let context = format!("vision model reply for product {}", request.product_id);

        let response: ChatResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                post_json(
                    &self.client,
                    &self.endpoint,
                    Some(self.api_key.as_str()),
                    &body,
                    &context,
                )
            })
            .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(VisionError::EmptyResponse { context })?;
        let answer = choice.message.content.unwrap_or_default();

        tracing::debug!(
            product_id = request.product_id,
            answer = %answer,
            "vision model answered"
        );

        Ok(WatermarkVerdict::from_model_answer(&answer))
    }
}

impl ImageChecker for VisionModelClient {
    async fn check_image(
        &self,
        request: &ImageCheckRequest<'_>,
    ) -> Result<Option<Finding>, VisionError> {
        Ok(self.verdict(request).await?.into_finding())
    }
}
