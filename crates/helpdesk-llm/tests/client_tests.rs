use helpdesk_llm::{
    ClientFactory, CompletionClient, GeminiClient, GenerationError, GenerationParams, OpenAIClient,
    ProviderConfig,
};
use mockito::Matcher;
use std::time::Duration;

#[tokio::test]
async fn test_gemini_returns_candidate_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-test:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "generationConfig": { "maxOutputTokens": 100 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Score: 4/5"},{"text":"Evaluation: clear."}]}}]}"#,
        )
        .create_async()
        .await;

    let client = GeminiClient::new("test-key", "models/gemini-test")
        .unwrap()
        .with_base_url(server.url());

    let text = client
        .generate("evaluate", GenerationParams::new(0.3, 100))
        .await
        .unwrap();

    assert_eq!(text, "Score: 4/5\nEvaluation: clear.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_without_text_is_empty_output() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-test:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"finishReason":"SAFETY","content":{"parts":[]}}]}"#)
        .create_async()
        .await;

    let client = GeminiClient::new("test-key", "gemini-test")
        .unwrap()
        .with_base_url(server.url());

    let err = client
        .generate("anything", GenerationParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::EmptyOutput);
}

#[tokio::test]
async fn test_gemini_http_error_is_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-test:generateContent")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let client = GeminiClient::new("test-key", "gemini-test")
        .unwrap()
        .with_base_url(server.url());

    let err = client
        .generate("anything", GenerationParams::default())
        .await
        .unwrap_err();

    match err {
        GenerationError::TransportFailure(msg) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("overloaded"));
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gemini_invalid_json_is_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-test:generateContent")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = GeminiClient::new("test-key", "gemini-test")
        .unwrap()
        .with_base_url(server.url());

    let err = client
        .generate("anything", GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::TransportFailure(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = GeminiClient::new("test-key", "gemini-test")
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

    let err = client
        .generate("anything", GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::TransportFailure(_)));
}

#[tokio::test]
async fn test_openai_returns_message_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hello there"},"finish_reason":"stop"}]}"#,
        )
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key", "gpt-4o-mini")
        .unwrap()
        .with_base_url(server.url());

    let text = client
        .generate("hi", GenerationParams::new(0.7, 64))
        .await
        .unwrap();

    assert_eq!(text, "Hello there");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_factory_client_honours_base_url() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"text":"from factory"}"#)
        .create_async()
        .await;

    let config = ProviderConfig::gemini("k", "gemini-2.5-flash").with_base_url(Some(server.url()));
    let client = ClientFactory::create_client_with_timeout(config, Duration::from_secs(5)).unwrap();

    let text = client
        .generate("hi", GenerationParams::default())
        .await
        .unwrap();
    assert_eq!(text, "from factory");
}

#[test]
fn test_generation_params_builder() {
    let params = GenerationParams::default().temperature(0.2).max_tokens(12);

    assert_eq!(params.temperature, 0.2);
    assert_eq!(params.max_tokens, 12);
}
