//! Integration tests for OpenAiTextGenerator using wiremock

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hoa_core::config::LlmConfig;
use hoa_llm::{LetterFields, LetterPrompt, LlmError, OpenAiTextGenerator, TextGenerator};

fn create_test_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-api-key".to_string()),
        base_url: base_url.to_string(),
        ..LlmConfig::default()
    }
}

fn completion(content: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_generate_letter_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 300,
            "messages": [{"role": "system"}, {"role": "user"}]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Dear Homeowner, ...".into())),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiTextGenerator::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let prompt = LetterPrompt::build(&LetterFields {
        violation_type: "Parking".to_string(),
        tone: "Neutral".to_string(),
        ..LetterFields::default()
    });

    let letter = generator.complete(&prompt.system, &prompt.user).await.unwrap();
    assert_eq!(letter, "Dear Homeowner, ...");
}

#[tokio::test]
async fn test_null_content_is_empty_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(serde_json::Value::Null)))
        .mount(&mock_server)
        .await;

    let generator = OpenAiTextGenerator::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let letter = generator.complete("system", "user").await.unwrap();
    assert!(letter.is_empty());
}

#[tokio::test]
async fn test_rate_limited_with_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "12")
                .set_body_string("slow down"),
        )
        .mount(&mock_server)
        .await;

    let generator = OpenAiTextGenerator::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let err = generator.complete("system", "user").await.unwrap_err();

    match err {
        LlmError::RateLimited {
            retry_after,
            message,
        } => {
            assert_eq!(retry_after, Some(12));
            assert_eq!(message, "slow down");
        }
        other => panic!("expected rate limit error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&mock_server)
        .await;

    let generator = OpenAiTextGenerator::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let err = generator.complete("system", "user").await.unwrap_err();
    assert!(matches!(err, LlmError::Authentication(_)));
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let generator = OpenAiTextGenerator::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let err = generator.complete("system", "user").await.unwrap_err();
    assert!(err.is_retryable());
}
