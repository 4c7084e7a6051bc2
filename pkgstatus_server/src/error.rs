//! Request-level errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("build not found: {0}")]
    BuildNotFound(String),

    #[error("server not found: {0}")]
    ServerNotFound(String),

    #[error("record store did not answer in time")]
    StoreTimeout,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::BuildNotFound(id) => {
                tracing::debug!(build_id = %id, "Build not found");
                let body = Json(json!({
                    "error": { "status": 404, "message": "Build not found", "build": id }
                }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            Error::ServerNotFound(id) => {
                tracing::debug!(server = %id, "Server not found");
                (StatusCode::NOT_FOUND, "Server not found").into_response()
            }
            Error::StoreTimeout => {
                tracing::error!("Record store timed out");
                crate::metrics::store_error("timeout");
                (StatusCode::GATEWAY_TIMEOUT, "Record store timed out").into_response()
            }
            Error::Store(err) => {
                tracing::error!("Record store error: {err}");
                crate::metrics::store_error(err.kind());
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
