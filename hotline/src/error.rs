use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::forward_store::StoreError;

/// Errors that fail a single webhook request.
#[derive(Debug, thiserror::Error)]
pub enum HotlineError {
    #[error("Forward store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for HotlineError {
    fn into_response(self) -> Response {
        error!("webhook request failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
