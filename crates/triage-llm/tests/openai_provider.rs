//! HTTP-level tests for the OpenAI provider against a mock server

use mockito::{Matcher, Server};
use serde_json::json;
use triage_domain::{CompletionRequest, JsonSchemaFormat, StructuredCompletion};
use triage_llm::{LlmError, OpenAiProvider};

fn request() -> CompletionRequest {
    let schema = JsonSchemaFormat {
        name: "IssueTriageMetadata".to_string(),
        strict: true,
        schema: json!({ "type": "object", "properties": {}, "additionalProperties": false }),
    };
    CompletionRequest::structured("gpt-4o-2024-08-06", "You triage issues.", "Issue text", schema)
}

#[tokio::test]
async fn test_complete_sends_structured_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-2024-08-06",
            "messages": [
                { "role": "system", "content": "You triage issues." },
                { "role": "user", "content": "Issue text" }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "IssueTriageMetadata", "strict": true }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "{\"severity\":\"Major\"}",
                        "refusal": null
                    },
                    "finish_reason": "stop"
                }]
            }"#,
        )
        .create_async()
        .await;

    let provider = OpenAiProvider::new("sk-test").unwrap().with_endpoint(server.url());
    let completion = provider.complete(&request()).await.unwrap();

    assert_eq!(completion.parsed, Some(json!({ "severity": "Major" })));
    assert_eq!(completion.refusal, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let provider = OpenAiProvider::new("sk-bad").unwrap().with_endpoint(server.url());
    let result = provider.complete(&request()).await;

    match result {
        Err(LlmError::Unauthorized(msg)) => assert!(msg.contains("Incorrect API key")),
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .create_async()
        .await;

    let provider = OpenAiProvider::new("sk-test").unwrap().with_endpoint(server.url());
    assert!(matches!(
        provider.complete(&request()).await,
        Err(LlmError::RateLimitExceeded)
    ));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let provider = OpenAiProvider::new("sk-test").unwrap().with_endpoint(server.url());
    match provider.complete(&request()).await {
        Err(LlmError::Communication(msg)) => assert!(msg.contains("upstream exploded")),
        other => panic!("Expected Communication error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    let provider = OpenAiProvider::new("sk-test")
        .unwrap()
        .with_endpoint("http://127.0.0.1:1");

    assert!(matches!(
        provider.complete(&request()).await,
        Err(LlmError::Communication(_))
    ));
}
