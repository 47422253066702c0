// handlers/protected/properties.rs - POST /imoveis, PUT|PATCH|DELETE /imoveis/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{parse_new_property, parse_property_id, parse_property_patch};
use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::Property;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /imoveis - create a listing owned by the calling admin
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Property> {
    let payload = parse_new_property(&json_body(body)?).map_err(ApiError::validation)?;
    let property = state
        .properties
        .create(payload, &principal)
        .await
        .map_err(|e| state.error(e))?;
    Ok(ApiResponse::created(property))
}

/// PUT|PATCH /imoveis/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Property> {
    let id = parse_property_id(&id).map_err(ApiError::validation)?;
    let patch = parse_property_patch(&json_body(body)?).map_err(ApiError::validation)?;
    let property = state
        .properties
        .update(id, patch, &principal)
        .await
        .map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(property))
}

/// DELETE /imoveis/:id - withdraw a listing (soft delete)
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Property> {
    let id = parse_property_id(&id).map_err(ApiError::validation)?;
    let property = state
        .properties
        .soft_delete(id, &principal)
        .await
        .map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(property))
}
