// handlers/protected/proposals.rs - GET /propostas, PATCH /propostas/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::api::{parse_property_id, parse_proposal_reply};
use crate::app::AppState;
use crate::database::models::Proposal;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /propostas - every proposal with customer, listing and landlord
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Proposal>> {
    let proposals = state.proposals.list().await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(proposals))
}

/// PATCH /propostas/:id - record the landlord's answer
pub async fn reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Proposal> {
    let id = parse_property_id(&id).map_err(ApiError::validation)?;
    let reply = parse_proposal_reply(&json_body(body)?)
        .ok_or_else(|| ApiError::bad_request("Informe a resposta desta proposta"))?;
    let proposal = state.proposals.reply(id, &reply).await.map_err(|e| state.error(e))?;
    Ok(ApiResponse::success(proposal))
}
