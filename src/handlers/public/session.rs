// handlers/public/session.rs - POST /admins/login and POST /clientes/login
//
// Any malformed or incomplete body answers exactly like a wrong password.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::api::Credentials;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AdminSession, CustomerSession, ServiceError};

fn credentials(state: &AppState, body: Result<Json<Value>, JsonRejection>) -> Result<Credentials, ApiError> {
    body.ok()
        .and_then(|Json(body)| Credentials::from_body(&body))
        .ok_or_else(|| state.error(ServiceError::InvalidCredentials))
}

/// POST /admins/login
pub async fn admin_login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AdminSession> {
    let credentials = credentials(&state, body)?;
    let session = state.sessions.admin_login(credentials).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(session))
}

/// POST /clientes/login
pub async fn customer_login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<CustomerSession> {
    let credentials = credentials(&state, body)?;
    let session = state.sessions.customer_login(credentials).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(session))
}
