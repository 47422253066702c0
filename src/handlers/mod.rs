// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer token verified by middleware::require_auth)

pub mod protected;
pub mod public;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::error::ApiError;

/// Unwrap a JSON body, turning axum's rejection into our error shape.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_json(format!("JSON inválido: {}", rejection.body_text())))
}
