//! Raw leather lot HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::AppResult;
use crate::services::lot::{CreateLotInput, LotService};
use crate::AppState;

/// List all lots
pub async fn list_lots(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = LotService::new(state.db);
    let lots = service.list_lots().await?;
    Ok(Json(json!({ "lots": lots })))
}

/// Get a specific lot
pub async fn get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = LotService::new(state.db);
    Ok(Json(service.get_lot(lot_id).await?))
}

/// Record a lot purchase
pub async fn create_lot(
    State(state): State<AppState>,
    Json(input): Json<CreateLotInput>,
) -> AppResult<impl IntoResponse> {
    let service = LotService::new(state.db);
    let lot = service.create_lot(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Lot recorded", "lot": lot })),
    ))
}
