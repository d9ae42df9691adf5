//! HTTP routes for the voice webhook

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::call_flow::{handlers, ENTRY_PATH, MENU_PATH, SET_NUMBER_PATH};
use crate::AppState;

/// Configure all webhook routes. Unknown paths fall back to the entry step.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(ENTRY_PATH, post(handlers::initial))
        .route(MENU_PATH, post(handlers::menu))
        .route(SET_NUMBER_PATH, post(handlers::admin_set_number))
        .fallback(handlers::initial)
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "hotline",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
