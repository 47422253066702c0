// handlers/public/properties.rs - GET /imoveis[...] handlers

use axum::extract::{Path, State};

use crate::api::parse_property_id;
use crate::app::AppState;
use crate::database::models::Property;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /imoveis - available listings, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Property>> {
    let properties = state.properties.list_available().await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(properties))
}

/// GET /imoveis/destaques - newest available listings for the home page
pub async fn featured(State(state): State<AppState>) -> ApiResult<Vec<Property>> {
    let properties = state.properties.list_featured().await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(properties))
}

/// GET /imoveis/pesquisa/:termo - rent ceiling or text search
pub async fn search(State(state): State<AppState>, Path(term): Path<String>) -> ApiResult<Vec<Property>> {
    let properties = state.properties.search(&term).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(properties))
}

/// GET /imoveis/:id - single listing, including withdrawn ones
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Property> {
    let id = parse_property_id(&id).map_err(ApiError::validation)?;
    let property = state.properties.get_by_id(id).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(property))
}
