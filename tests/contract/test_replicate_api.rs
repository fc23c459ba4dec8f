use certeval::evaluator::replicate::{ReplicateClient, LLAMA2_70B_CHAT_VERSION};
use certeval::evaluator::{GenerationOutcome, TextGenerator};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn client(server: &Server) -> ReplicateClient {
    ReplicateClient::new("LLaMA2", LLAMA2_70B_CHAT_VERSION, 30)
        .with_base_url(&server.url())
        .with_poll_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn test_prediction_request_format() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/predictions")
        .match_header("authorization", "Bearer r8-test")
        .match_header("prefer", "wait")
        .match_body(Matcher::PartialJson(json!({
            "version": LLAMA2_70B_CHAT_VERSION,
            "input": { "prompt": "Is the product compliant?" }
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "ufawqhfynnddngldkgtslldrkq",
                "status": "succeeded",
                "output": ["Recommendation:", " TRUE", "\n\nReasoning: fine."],
                "error": null
            })
            .to_string(),
        )
        .create_async()
        .await;

    let outcome = client(&server)
        .generate("Is the product compliant?", "r8-test")
        .await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        GenerationOutcome::Text("Recommendation: TRUE\n\nReasoning: fine.".to_string())
    );
}

#[tokio::test]
async fn test_running_prediction_is_polled() {
    let mut server = Server::new_async().await;
    let poll_url = format!("{}/v1/predictions/abc123", server.url());

    let _create = server
        .mock("POST", "/v1/predictions")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "abc123",
                "status": "starting",
                "urls": { "get": poll_url, "cancel": format!("{}/cancel", poll_url) }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let poll = server
        .mock("GET", "/v1/predictions/abc123")
        .match_header("authorization", "Bearer r8-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "abc123",
                "status": "succeeded",
                "output": ["MORE INFO", " NEEDED"]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let outcome = client(&server).generate("prompt", "r8-test").await;

    poll.assert_async().await;
    assert_eq!(outcome, GenerationOutcome::Text("MORE INFO NEEDED".to_string()));
}

#[tokio::test]
async fn test_throttled_request_is_rate_limited() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/predictions")
        .with_status(429)
        .with_body(r#"{"detail": "Request was throttled."}"#)
        .create_async()
        .await;

    let outcome = client(&server).generate("prompt", "r8-test").await;

    assert_eq!(outcome, GenerationOutcome::RateLimited);
}

#[tokio::test]
async fn test_unavailable_backend_is_service_unavailable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/predictions")
        .with_status(503)
        .create_async()
        .await;

    let outcome = client(&server).generate("prompt", "r8-test").await;

    assert_eq!(outcome, GenerationOutcome::ServiceUnavailable);
}

#[tokio::test]
async fn test_rejected_token_keeps_error_text() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/predictions")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid token."}"#)
        .create_async()
        .await;

    let outcome = client(&server).generate("prompt", "bad-token").await;

    match outcome {
        GenerationOutcome::Error(detail) => {
            assert!(detail.starts_with("HTTP 401"), "detail: {}", detail);
            assert!(detail.contains("Invalid token."), "detail: {}", detail);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_prediction_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/predictions")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "xyz",
                "status": "failed",
                "output": null,
                "error": "CUDA out of memory"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let outcome = client(&server).generate("prompt", "r8-test").await;

    match outcome {
        GenerationOutcome::Error(detail) => {
            assert!(detail.starts_with("prediction failed"), "detail: {}", detail);
            assert!(detail.contains("CUDA out of memory"), "detail: {}", detail);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
