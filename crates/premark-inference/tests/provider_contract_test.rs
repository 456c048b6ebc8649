//! Contract tests for the provider backends against a mock HTTP server.
//!
//! These verify the normalized output contract: whatever shape a
//! provider replies with, callers get plain text (or a typed error),
//! and requests carry the credentials and parameters each API expects.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use premark_core::{EmbedRole, EmbeddingBackend, Error, GenerationBackend};
use premark_inference::{
    ClaudeBackend, ClaudeConfig, GeminiBackend, GeminiConfig, GoogleEmbeddingBackend,
    GoogleEmbeddingConfig, OpenAiBackend, OpenAiConfig,
};

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

fn openai_backend(server: &MockServer) -> OpenAiBackend {
    let config = OpenAiConfig {
        base_url: server.uri(),
        ..OpenAiConfig::new("sk-test")
    };
    OpenAiBackend::new(config).unwrap()
}

#[tokio::test]
async fn openai_generate_normalizes_chat_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "title: Hello\n"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = openai_backend(&server);
    let output = backend.generate("write frontmatter").await.unwrap();
    assert_eq!(output, "title: Hello\n");
}

#[tokio::test]
async fn openai_generate_sends_yaml_system_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{"role": "system"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    openai_backend(&server).generate("prompt").await.unwrap();
}

#[tokio::test]
async fn openai_generate_empty_choices_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = openai_backend(&server).generate("prompt").await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn openai_generate_http_error_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = openai_backend(&server).generate("prompt").await.unwrap_err();
    match err {
        Error::Inference(msg) => assert!(msg.contains("429")),
        other => panic!("expected Inference error, got {:?}", other),
    }
}

#[tokio::test]
async fn openai_embed_returns_first_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({"model": "text-embedding-3-large"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}],
            "model": "text-embedding-3-large",
            "usage": {"prompt_tokens": 3, "total_tokens": 3}
        })))
        .mount(&server)
        .await;

    let vector = openai_backend(&server)
        .embed("some text", EmbedRole::Document)
        .await
        .unwrap();
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gemini_generate_joins_candidate_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "title: "}, {"text": "Hello\n"}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GeminiConfig {
        base_url: server.uri(),
        ..GeminiConfig::new("g-key", "gemini-2.5-pro")
    };
    let backend = GeminiBackend::new(config).unwrap();
    let output = backend.generate("write frontmatter").await.unwrap();
    assert_eq!(output, "title: Hello\n");
}

#[tokio::test]
async fn gemini_generate_no_candidates_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let config = GeminiConfig {
        base_url: server.uri(),
        ..GeminiConfig::new("g-key", "gemini-2.5-pro")
    };
    let backend = GeminiBackend::new(config).unwrap();
    assert!(matches!(
        backend.generate("prompt").await.unwrap_err(),
        Error::Inference(_)
    ));
}

#[tokio::test]
async fn google_embed_sends_retrieval_task_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/embedding-001:embedContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(json!({"taskType": "RETRIEVAL_QUERY"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": {"values": [1.0, 0.0]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GoogleEmbeddingConfig {
        base_url: server.uri(),
        ..GoogleEmbeddingConfig::new("g-key", "models/embedding-001")
    };
    let backend = GoogleEmbeddingBackend::new(config).unwrap();
    let vector = backend.embed("a query", EmbedRole::Query).await.unwrap();
    assert_eq!(vector, vec![1.0, 0.0]);
}

#[tokio::test]
async fn google_embed_documents_use_document_task_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/embedding-001:embedContent"))
        .and(body_partial_json(json!({"taskType": "RETRIEVAL_DOCUMENT"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": {"values": [0.5]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GoogleEmbeddingConfig {
        base_url: server.uri(),
        ..GoogleEmbeddingConfig::new("g-key", "models/embedding-001")
    };
    let backend = GoogleEmbeddingBackend::new(config).unwrap();
    backend
        .embed("a document", EmbedRole::Document)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Claude
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claude_generate_concatenates_text_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "a-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20240620",
            "max_tokens": 1024,
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "text", "text": "title: "},
                {"type": "tool_use", "id": "t1", "name": "noop", "input": {}},
                {"type": "text", "text": "Hello\n"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClaudeConfig {
        base_url: server.uri(),
        ..ClaudeConfig::new("a-key", "claude-3-5-sonnet-20240620")
    };
    let backend = ClaudeBackend::new(config).unwrap();
    let output = backend.generate("write frontmatter").await.unwrap();
    assert_eq!(output, "title: Hello\n");
}

#[tokio::test]
async fn claude_generate_http_error_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let config = ClaudeConfig {
        base_url: server.uri(),
        ..ClaudeConfig::new("a-key", "claude-3-5-sonnet-20240620")
    };
    let backend = ClaudeBackend::new(config).unwrap();
    assert!(matches!(
        backend.generate("prompt").await.unwrap_err(),
        Error::Inference(_)
    ));
}
