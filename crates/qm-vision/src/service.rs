//! Client for a watermark-detection service.
//!
//! The service owns the model prompt; this client only ships
//! `{imageUrl, productId, productName}` and reads back the verdict.

use qm_core::Finding;
use reqwest::{Client, Url};

use crate::checker::{ClientOptions, ImageChecker};
use crate::error::VisionError;
use crate::http::{build_client, parse_endpoint, post_json};
use crate::retry::retry_with_backoff;
use crate::types::{ImageCheckRequest, ServiceRequest, ServiceResponse, WatermarkVerdict};

pub struct WatermarkServiceClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl WatermarkServiceClient {
    /// Creates a client that posts to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::InvalidEndpoint`] if `endpoint` does not parse,
    /// or [`VisionError::Http`] if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str, options: &ClientOptions) -> Result<Self, VisionError> {
        Ok(Self {
            client: build_client(options.timeout_secs, &options.user_agent)?,
            endpoint: parse_endpoint(endpoint)?,
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Asks the service for a verdict on one image, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`VisionError::RateLimited`] / [`VisionError::UnexpectedStatus`] for non-2xx replies.
    /// - [`VisionError::Http`] on network failure after all retries.
    /// - [`VisionError::Deserialize`] if the reply is not the expected JSON.
    pub async fn verdict(
        &self,
        request: &ImageCheckRequest<'_>,
    ) -> Result<WatermarkVerdict, VisionError> {
        let body = ServiceRequest::from(request);
        let context = format!("watermark service reply for product {}", request.product_id);

        let response: ServiceResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                post_json(&self.client, &self.endpoint, None, &body, &context)
            })
            .await?;

        Ok(response.into())
    }
}

impl ImageChecker for WatermarkServiceClient {
    async fn check_image(
        &self,
        request: &ImageCheckRequest<'_>,
    ) -> Result<Option<Finding>, VisionError> {
        Ok(self.verdict(request).await?.into_finding())
    }
}
