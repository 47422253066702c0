// handlers/protected/admins.rs - GET|POST /admins, GET /admins/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::api::{parse_new_admin, FieldViolation};
use crate::app::AppState;
use crate::database::models::AdminAccount;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /admins - password hashes are never serialized
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<AdminAccount>> {
    let admins = state.admins.list().await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(admins))
}

/// POST /admins
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AdminAccount> {
    let input = parse_new_admin(&json_body(body)?).map_err(ApiError::validation)?;
    let admin = state.admins.create(input).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::created(admin))
}

/// GET /admins/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<AdminAccount> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::validation(vec![FieldViolation::new("id", "Id deve ser um UUID válido")]))?;
    let admin = state.admins.get(id).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(admin))
}
