//! Request handlers for the secret API.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::server::AppState;

/// Body of `POST /api/v1/secret`.
#[derive(Debug, Deserialize)]
pub struct CreateSecretRequest {
    /// Plaintext payload to store.
    pub data: String,

    /// Time-to-live in seconds. Falls back to the configured default when
    /// omitted.
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Response to a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSecretResponse {
    /// Identifier under which the secret can be redeemed exactly once.
    pub id: String,
}

/// Response to a successful redeem.
#[derive(Debug, Serialize, Deserialize)]
pub struct RedeemSecretResponse {
    /// The stored plaintext.
    pub data: String,
}

/// `POST /api/v1/secret` -- encrypt and store a payload.
pub async fn create_secret(
    State(state): State<AppState>,
    Json(req): Json<CreateSecretRequest>,
) -> Result<Json<CreateSecretResponse>, ApiError> {
    let ttl_secs = req.duration.unwrap_or(state.config.default_ttl_secs);
    if ttl_secs > state.config.max_ttl_secs {
        return Err(ApiError::BadRequest(format!(
            "duration exceeds maximum of {} seconds",
            state.config.max_ttl_secs
        )));
    }

    let id = state
        .store
        .create(req.data.as_bytes(), chrono::Duration::seconds(ttl_secs))?;

    debug!(ttl_secs, "created secret");
    Ok(Json(CreateSecretResponse { id }))
}

/// `GET /api/v1/secret/:id` -- redeem a payload, consuming it.
pub async fn redeem_secret(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RedeemSecretResponse>, ApiError> {
    let plaintext = state.store.redeem(&id)?;

    // Only UTF-8 payloads are ever deposited through this API.
    let data = String::from_utf8(plaintext.to_vec()).map_err(|_| ApiError::Internal)?;

    debug!("redeemed secret");
    Ok(Json(RedeemSecretResponse { data }))
}

/// `GET /health` -- liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
