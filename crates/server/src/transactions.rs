//! Transaction hierarchy endpoints

use api_types::{
    StatusResponse,
    transaction::{SumResponse, TransactionRequest, TransactionResponse},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use engine::{Amount, Transaction};

use crate::{ServerError, server::ServerState};

fn parse_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ServerError> {
    id.map(|Path(id)| id)
        .map_err(|_| ServerError::Generic("invalid transaction ID".to_string()))
}

fn map_transaction(tx: Transaction) -> TransactionResponse {
    TransactionResponse {
        amount: tx.amount.to_f64(),
        kind: tx.kind,
        parent_id: tx.parent_id,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ServerError> {
    let id = parse_id(id)?;
    let Json(payload) =
        payload.map_err(|_| ServerError::Generic("invalid request body".to_string()))?;

    let amount = Amount::from_f64(payload.amount)?;
    state
        .engine
        .create(id, amount, &payload.kind, payload.parent_id)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TransactionResponse>, ServerError> {
    let id = parse_id(id)?;
    let tx = state.engine.get_by_id(id).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn by_type(
    State(state): State<ServerState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<i64>>, ServerError> {
    let ids = state.engine.get_by_type(&kind).await?;
    Ok(Json(ids))
}

pub async fn sum(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SumResponse>, ServerError> {
    let id = parse_id(id)?;
    let sum = state.engine.sum_of(id).await?;
    Ok(Json(SumResponse { sum: sum.to_f64() }))
}
