//! Production HTTP handlers: batches, runs, chemical usage, finished lots

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::services::batch::{
    BatchService, CreateBatchInput, RecordFinishedLotInput, RecordRunInput, RecordUsageInput,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct FinishedLotQuery {
    pub batch_id: Option<i64>,
}

/// List all batches
pub async fn list_batches(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let batches = service.list_batches().await?;
    Ok(Json(json!({ "batches": batches })))
}

/// Start a batch
pub async fn create_batch(
    State(state): State<AppState>,
    Json(input): Json<CreateBatchInput>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let batch = service.create_batch(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Batch created", "batch": batch })),
    ))
}

/// Get a batch
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    Ok(Json(service.get_batch(batch_id).await?))
}

/// List the process runs of a batch
pub async fn list_runs(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let runs = service.list_runs(batch_id).await?;
    Ok(Json(json!({ "runs": runs })))
}

/// Record a process run within a batch
pub async fn record_run(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
    Json(input): Json<RecordRunInput>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let run = service.record_run(batch_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Run recorded", "run": run })),
    ))
}

/// List the chemical usage lines of a run
pub async fn list_chemical_usage(
    State(state): State<AppState>,
    Path(run_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let usage = service.list_chemical_usage(run_id).await?;
    Ok(Json(json!({ "chemicals": usage })))
}

/// Record chemical usage within a run
pub async fn record_chemical_usage(
    State(state): State<AppState>,
    Path(run_id): Path<i64>,
    Json(input): Json<RecordUsageInput>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let usage = service.record_chemical_usage(run_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Chemical usage recorded", "usage": usage })),
    ))
}

/// List finished lots, optionally for one batch
pub async fn list_finished_lots(
    State(state): State<AppState>,
    Query(query): Query<FinishedLotQuery>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let lots = service.list_finished_lots(query.batch_id).await?;
    Ok(Json(json!({ "finished_lots": lots })))
}

/// Record a finished lot
pub async fn record_finished_lot(
    State(state): State<AppState>,
    Json(input): Json<RecordFinishedLotInput>,
) -> AppResult<impl IntoResponse> {
    let service = BatchService::new(state.db);
    let lot = service.record_finished_lot(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Finished lot recorded", "finished_lot": lot })),
    ))
}
