//! AI Widget Endpoint - the HTTP service the chat widget talks to.
//!
//! Routes:
//!
//! - `POST /api/chat` → `{ id, message, timestamp, type: "bot" }`
//! - `GET  /api/chat` → readiness payload
//! - `GET  /health`   → `{ status: "OK", timestamp }`
//!
//! Replies come from a pluggable [`Responder`]; [`EchoResponder`] is the
//! default stub.

pub mod responder;

pub use responder::{EchoResponder, Responder};

use ai_widget_core::{ChatReply, ChatRequest, HealthStatus, ReadyStatus};
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Listener settings for the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    responder: Arc<dyn Responder>,
}

impl AppState {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }
}

/// Build the router. CORS accepts any origin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/chat", get(chat_ready).post(chat))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    responder: Arc<dyn Responder>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(AppState::new(responder));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Handlers
// ============================================================================

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    tracing::debug!(context_ref = %request.api_spec_url, "Chat message received");

    match state
        .responder
        .reply(&request.message, &request.api_spec_url)
        .await
    {
        Ok(message) => Json(ChatReply {
            message,
            id: Some(Utc::now().timestamp_millis()),
            timestamp: Some(now_iso()),
            kind: Some("bot".to_string()),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Responder failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn chat_ready() -> Json<ReadyStatus> {
    Json(ReadyStatus {
        message: "Chat endpoint ready".to_string(),
        timestamp: now_iso(),
    })
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        timestamp: now_iso(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:3030");
    }

    #[test]
    fn test_now_iso_has_millis() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        // 2026-01-01T00:00:00.000Z
        assert_eq!(ts.len(), 24);
    }
}
