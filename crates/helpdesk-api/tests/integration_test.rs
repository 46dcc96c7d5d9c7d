use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use helpdesk_api::{build_router, config::Config, error::TURN_FAILURE_MESSAGE, state::AppState};
use helpdesk_core::Orchestrator;
use helpdesk_llm::{CompletionClient, GenerationError, GenerationParams};
use helpdesk_persist::{ChatStore, PersistClient};

const CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    enabled = true
    origins = ["*"]

    [llm]
    provider = "gemini"
    model = "test-model"

    [storage]
    chats_file = "unused.json"
    feedback_file = "unused.json"
    database_url = "sqlite::memory:"
    blob_dir = "unused"

    [logging]
    level = "debug"
    format = "pretty"
"#;

/// Answers every prompt with the same structured text
struct CannedClient;

#[async_trait]
impl CompletionClient for CannedClient {
    async fn generate(&self, _prompt: &str, _params: GenerationParams) -> Result<String, GenerationError> {
        Ok("### Answer\nRestart the router.\n\n### Steps\n1. Unplug it.\n\n### Notes\nNone.".to_string())
    }
}

async fn setup() -> (Router, PersistClient) {
    let config: Config = toml::from_str(CONFIG).unwrap();
    let persist = PersistClient::in_memory().await.unwrap();
    let orchestrator = Orchestrator::builder()
        .client(Arc::new(CannedClient))
        .persist(persist.clone())
        .first_seed(0)
        .build()
        .unwrap();

    let state = Arc::new(AppState::new(config, persist.clone(), orchestrator));
    (build_router(state), persist)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(json_request(Method::POST, "/query", json!({ "query": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["summary"], "");
    assert_eq!(body["feedback"], "Empty query");
}

#[tokio::test]
async fn test_malformed_turn_body_gets_apology() {
    let (app, _) = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"query\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["summary"], TURN_FAILURE_MESSAGE);
    assert_eq!(body["feedback"], "");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/reresearch")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("reset my router"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["summary"], TURN_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_malformed_feedback_body_reports_error() {
    let (app, _) = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/feedback")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn test_query_creates_chat_and_logs_history() {
    let (app, persist) = setup().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/query",
            json!({ "query": "My router keeps dropping wifi", "session_id": "s1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["summary"].as_str().unwrap().contains("Restart the router"));
    let chat_id = body["chat_id"].as_str().unwrap().to_string();

    let chat = persist.chats().get_chat(&chat_id).await.unwrap().unwrap();
    assert_eq!(chat.messages.len(), 2);

    let response = app
        .oneshot(empty_request(Method::GET, "/api/history"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CACHE_CONTROL], "no-store, no-cache, must-revalidate, max-age=0");
    assert_eq!(headers[header::PRAGMA], "no-cache");

    let body = body_json(response).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["user_query"], "My router keeps dropping wifi");
}

#[tokio::test]
async fn test_resummarize_without_prior_answer() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/resummarize",
            json!({ "query": "never asked before" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["summary"], "");
    assert!(!body["feedback"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_is_recorded_on_chat() {
    let (app, persist) = setup().await;
    let chat = persist.chats().create_chat().await.unwrap();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/feedback",
            json!({
                "rating": "dislike",
                "feedback": "too long",
                "response": "a very long answer",
                "query": "q",
                "chat_id": chat.id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "success");

    let chat = persist.chats().get_chat(&chat.id).await.unwrap().unwrap();
    assert_eq!(chat.feedback.len(), 1);
    assert!(chat.feedback[0].is_dislike());
}

#[tokio::test]
async fn test_missing_chat_responses() {
    let (app, _) = setup().await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/chat/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Not found");

    let response = app
        .oneshot(empty_request(Method::DELETE, "/api/chat/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::PRAGMA], "no-cache");
    assert_eq!(body_json(response).await["deleted"], false);
}

#[tokio::test]
async fn test_new_chat_is_listed() {
    let (app, _) = setup().await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/api/chat/new"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert!(created["createdAt"].is_string());
    assert_eq!(created["messages"].as_array().unwrap().len(), 0);

    let response = app
        .oneshot(empty_request(Method::GET, "/api/chats"))
        .await
        .unwrap();
    let chats = body_json(response).await;
    assert_eq!(chats[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_upload_and_download_attachment() {
    let (app, _) = setup().await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"chat_id\"\r\n\r\n\
         chat-1\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"files\"; filename=\"notes.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         printer is offline\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded = body_json(response).await;
    let attachment = &uploaded["attachments"][0];
    assert_eq!(attachment["name"], "notes.txt");
    assert_eq!(attachment["mime"], "text/plain");
    assert_eq!(attachment["size"], 18);

    let uri = format!("/api/attachment/{}", attachment["id"].as_str().unwrap());
    let response = app.oneshot(empty_request(Method::GET, &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"notes.txt\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"printer is offline");
}

#[tokio::test]
async fn test_upload_requires_chat_id() {
    let (app, _) = setup().await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"files\"; filename=\"a.txt\"\r\n\r\n\
         hi\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;

    let response = app.oneshot(empty_request(Method::GET, "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["llm"], "gemini/test-model");
}
