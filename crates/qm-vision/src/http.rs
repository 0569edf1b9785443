//! Shared request plumbing for the vision clients.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::VisionError;

/// Retry-After fallback when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, VisionError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

pub(crate) fn parse_endpoint(url: &str) -> Result<Url, VisionError> {
    Url::parse(url).map_err(|e| VisionError::InvalidEndpoint {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// POSTs `body` as JSON and decodes a JSON reply, mapping statuses to typed errors.
pub(crate) async fn post_json<B, R>(
    client: &Client,
    url: &Url,
    bearer_token: Option<&str>,
    body: &B,
    context: &str,
) -> Result<R, VisionError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url.clone()).json(body);
    if let Some(token) = bearer_token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(VisionError::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
        return Err(VisionError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let text = response.text().await?;
    serde_json::from_str::<R>(&text).map_err(|e| VisionError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
