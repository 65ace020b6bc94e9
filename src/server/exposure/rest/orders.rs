//! Order handlers

use crate::core::error::{RepairError, RepairResult};
use crate::core::order::{NewOrder, OrderUpdate, RepairOrder};
use crate::core::validation::ValidJson;
use crate::server::host::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub term: Option<String>,
}

/// Order ids are positive integers; anything else is a bad request
fn parse_id(raw: &str) -> RepairResult<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| RepairError::field("id", format!("'{}' is not a valid order id", raw)))
}

pub async fn list_orders(State(state): State<AppState>) -> RepairResult<Json<Vec<RepairOrder>>> {
    Ok(Json(state.service.list_orders().await?))
}

pub async fn search_orders(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> RepairResult<Json<Vec<RepairOrder>>> {
    let term = params.term.unwrap_or_default();
    Ok(Json(state.service.search(&term).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RepairResult<Json<RepairOrder>> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get_order(id).await?))
}

pub async fn create_order(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<NewOrder>,
) -> RepairResult<(StatusCode, Json<Value>)> {
    let order = state.service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": order.id }))))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(update): ValidJson<OrderUpdate>,
) -> RepairResult<Json<RepairOrder>> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.apply_update(id, update).await?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RepairResult<Json<Value>> {
    let id = parse_id(&id)?;
    let deleted = state.service.delete_order(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
