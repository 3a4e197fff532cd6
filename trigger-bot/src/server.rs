//! Webhook HTTP server.
//!
//! ```text
//! POST /webhook/{token}  Telegram update (404 unless token matches)
//! GET  /health           {"status":"ok","pending_replies":N}
//! GET  /set-webhook      register <BASE_URL>/webhook/<token>
//! GET  /                 banner
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dbot_core::Bot;
use guard_handlers::ReplyScheduler;
use handler_chain::HandlerChain;
use serde_json::json;
use tracing::{error, info, warn};

pub const BANNER: &str = "trigger-bot is running\n";

/// Router state; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub chain: HandlerChain,
    pub bot: Arc<dyn Bot>,
    pub scheduler: ReplyScheduler,
    pub token: Arc<str>,
    pub webhook_url: Option<Arc<str>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/{token}", post(webhook))
        .route("/health", get(health))
        .route("/set-webhook", get(set_webhook))
        .route("/", get(|| async { BANNER }))
        .with_state(state)
}

/// POST /webhook/{token}
///
/// The update is handled before answering; Telegram redelivers on non-2xx, so malformed
/// bodies and chain failures still get 200.
async fn webhook(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    if token != *state.token {
        warn!("Webhook called with wrong token");
        return StatusCode::NOT_FOUND;
    }

    if let Some(update) = dbot_telegram::parse_update(&body) {
        dbot_telegram::dispatch_update(&state.chain, update).await;
    }
    StatusCode::OK
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "pending_replies": state.scheduler.pending(),
    }))
}

/// GET /set-webhook
async fn set_webhook(State(state): State<AppState>) -> Response {
    let Some(url) = state.webhook_url.as_deref() else {
        return (StatusCode::BAD_REQUEST, "BASE_URL is not configured\n").into_response();
    };

    match state.bot.set_webhook(url).await {
        Ok(()) => {
            info!("Webhook registered");
            (StatusCode::OK, "Webhook registered\n").into_response()
        }
        Err(e) => {
            error!(error = %e, "Webhook registration failed");
            (StatusCode::BAD_GATEWAY, format!("Webhook registration failed: {}\n", e)).into_response()
        }
    }
}
