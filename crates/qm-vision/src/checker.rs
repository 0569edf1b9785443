//! The image-detector boundary consumed by the analysis pipeline.

use std::future::Future;

use qm_core::{AppConfig, Finding};

use crate::error::VisionError;
use crate::model::VisionModelClient;
use crate::service::WatermarkServiceClient;
use crate::types::ImageCheckRequest;

/// Checks one product image for a watermark.
///
/// `Ok(Some(_))` is a watermark finding, `Ok(None)` a clean image. An `Err`
/// means the check itself failed; callers decide whether that is fatal.
pub trait ImageChecker {
    fn check_image(
        &self,
        request: &ImageCheckRequest<'_>,
    ) -> impl Future<Output = Result<Option<Finding>, VisionError>> + Send;
}

/// HTTP settings shared by both vision clients.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential back-off: `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
}

impl ClientOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.vision_request_timeout_secs,
            user_agent: config.vision_user_agent.clone(),
            max_retries: config.vision_max_retries,
            backoff_base_ms: config.vision_retry_backoff_base_ms,
        }
    }
}

/// The checker chosen from configuration.
pub enum WatermarkChecker {
    Service(WatermarkServiceClient),
    Model(VisionModelClient),
}

impl WatermarkChecker {
    /// Builds the service client when `QM_WATERMARK_SERVICE_URL` is set,
    /// otherwise a direct vision-model client.
    ///
    /// # Errors
    ///
    /// - [`VisionError::MissingApiKey`] if neither a service URL nor an API key is configured.
    /// - [`VisionError::InvalidEndpoint`] if the configured URL does not parse.
    /// - [`VisionError::Http`] if the HTTP client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, VisionError> {
        let options = ClientOptions::from_app_config(config);

        if let Some(url) = &config.watermark_service_url {
            tracing::debug!(endpoint = %url, "using watermark service for image checks");
            return Ok(Self::Service(WatermarkServiceClient::new(url, &options)?));
        }

        let api_key = config
            .vision_api_key
            .as_deref()
            .ok_or(VisionError::MissingApiKey)?;
        tracing::debug!(
            endpoint = %config.vision_api_url,
            model = %config.vision_model,
            "using vision model for image checks"
        );
        Ok(Self::Model(VisionModelClient::new(
            &config.vision_api_url,
            api_key,
            &config.vision_model,
            &options,
        )?))
    }
}

impl ImageChecker for WatermarkChecker {
    async fn check_image(
        &self,
        request: &ImageCheckRequest<'_>,
    ) -> Result<Option<Finding>, VisionError> {
        match self {
            Self::Service(client) => client.check_image(request).await,
            Self::Model(client) => client.check_image(request).await,
        }
    }
}
