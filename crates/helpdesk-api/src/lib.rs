pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::docs::ApiDoc;
use crate::middleware::{cache::no_store, logging::log_request};
use crate::routes::{attachments, chats, feedback, health, history, query};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let history_routes = Router::new()
        .route(
            "/api/history",
            get(history::get_history).delete(history::clear_history),
        )
        .route(
            "/api/history/:id",
            axum::routing::delete(history::delete_history_item),
        )
        .route_layer(from_fn(no_store));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/query", post(query::handle_query))
        .route("/resummarize", post(query::resummarize))
        .route("/reresearch", post(query::reresearch))
        .route("/feedback", post(feedback::submit_feedback))
        .route("/api/chats", get(chats::list_chats))
        .route("/api/chat/new", post(chats::new_chat))
        .route(
            "/api/chat/:chat_id",
            get(chats::get_chat).delete(chats::delete_chat.layer(from_fn(no_store))),
        )
        .route(
            "/api/upload",
            post(attachments::upload_files)
                .layer(DefaultBodyLimit::max(attachments::MAX_UPLOAD_BYTES)),
        )
        .route("/api/attachment/:id", get(attachments::get_attachment))
        .merge(history_routes);

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .layer(from_fn(log_request))
        .layer(TimeoutLayer::new(Duration::from_secs(300)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
