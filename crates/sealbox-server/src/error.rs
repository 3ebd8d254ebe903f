//! API error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sealbox_core::SecretError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No secret under this identifier (never existed, already redeemed,
    /// or swept away -- deliberately indistinguishable).
    #[error("secret not found")]
    NotFound,

    /// The secret existed but its TTL had passed at redemption time.
    #[error("secret expired")]
    Expired,

    /// The request was malformed or exceeded configured limits.
    #[error("{0}")]
    BadRequest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else. The response body stays generic so crypto internals
    /// never reach a caller.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Expired => StatusCode::GONE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SecretError> for ApiError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::NotFound => Self::NotFound,
            SecretError::Expired => Self::Expired,
            // Entropy, key and cipher failures all collapse to a generic 500.
            SecretError::RandomSource(_)
            | SecretError::InvalidKey
            | SecretError::Encryption
            | SecretError::Decryption => Self::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
