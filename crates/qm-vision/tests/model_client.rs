//! Integration tests for `VisionModelClient` against a mocked
//! chat-completions endpoint.

use qm_core::FindingKind;
use qm_vision::{ClientOptions, ImageCheckRequest, ImageChecker, VisionError, VisionModelClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> VisionModelClient {
    let options = ClientOptions {
        timeout_secs: 5,
        user_agent: "qm-test/0.1".to_owned(),
        max_retries: 0,
        backoff_base_ms: 0,
    };
    VisionModelClient::new(
        &format!("{}/v1/chat/completions", server.uri()),
        "test-key",
        "gpt-4o-mini",
        &options,
    )
    .expect("client construction should not fail")
}

fn request() -> ImageCheckRequest<'static> {
    ImageCheckRequest {
        image_url: "http://cdn.test/lamp.jpg",
        product_id: "p7",
        product_name: "Brass Lamp",
    }
}

fn completion(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_model_image_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("no"))))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).check_image(&request()).await;
    assert!(matches!(result, Ok(None)), "got: {result:?}");

    let received = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    let body: serde_json::Value =
        serde_json::from_slice(&received[0].body).expect("request body is JSON");
    assert_eq!(
        body["messages"][0]["content"][1]["image_url"]["url"],
        "http://cdn.test/lamp.jpg"
    );
    assert_eq!(
        body["messages"][0]["content"][1]["image_url"]["detail"],
        "high"
    );
}

#[tokio::test]
async fn yes_answer_becomes_watermark_finding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!("Yes, there is a stock-photo watermark."))),
        )
        .mount(&server)
        .await;

    let finding = test_client(&server)
        .check_image(&request())
        .await
        .expect("check should succeed")
        .expect("expected a watermark finding");
    assert_eq!(finding.kind, FindingKind::Watermark);
    assert_eq!(
        finding.details.as_deref(),
        Some("Yes, there is a stock-photo watermark.")
    );
}

#[tokio::test]
async fn null_content_is_a_clean_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!(null))))
        .mount(&server)
        .await;

    let result = test_client(&server).check_image(&request()).await;
    assert!(matches!(result, Ok(None)), "got: {result:?}");
}

#[tokio::test]
async fn no_choices_is_an_empty_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let result = test_client(&server).check_image(&request()).await;
    assert!(
        matches!(result, Err(VisionError::EmptyResponse { .. })),
        "expected EmptyResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn unauthorized_is_reported_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).check_image(&request()).await;
    assert!(
        matches!(result, Err(VisionError::UnexpectedStatus { status: 401, .. })),
        "expected UnexpectedStatus(401), got: {result:?}"
    );
}
