//! Error types for the HTTP boundary.
//!
//! [`ApiError`] covers the failures that surface as HTTP statuses. Most
//! core failures deliberately do NOT appear here: seat moves and emotes
//! are silent no-ops at this boundary, and a failed arena entry answers
//! with a redirect rather than an error payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that map directly onto HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried no visitor identity.
    #[error("missing visitor identity")]
    MissingIdentity,

    /// The requested channel is not a registered arena.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingIdentity => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::UnknownChannel(_) => (StatusCode::NOT_FOUND, self.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
