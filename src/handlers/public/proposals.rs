// handlers/public/proposals.rs - POST /propostas, GET /propostas/:clienteId

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::api::{parse_new_proposal, FieldViolation};
use crate::app::AppState;
use crate::database::models::Proposal;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /propostas - a customer makes an offer on an available listing
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Proposal> {
    let proposal = parse_new_proposal(&json_body(body)?).map_err(ApiError::validation)?;
    let created = state.proposals.create(proposal).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::created(created))
}

/// GET /propostas/:clienteId - one customer's proposals with their listings
pub async fn by_customer(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Proposal>> {
    let customer_id = Uuid::parse_str(&id).map_err(|_| {
        ApiError::validation(vec![FieldViolation::new("clienteId", "Id do cliente deve ser um UUID válido")])
    })?;
    let proposals = state
        .proposals
        .list_for_customer(customer_id)
        .await
        .map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(proposals))
}
