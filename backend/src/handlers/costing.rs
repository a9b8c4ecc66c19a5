//! Costing report handlers

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::costing::CostingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Batch costing report
pub async fn get_batch_costs(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = CostingService::new(state.db);
    let data = service.batch_costs().await?;

    if query.format.as_deref() == Some("csv") {
        let csv = CostingService::export_to_csv(&data)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"batch_costs.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Cost of one batch
pub async fn get_batch_cost(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = CostingService::new(state.db);
    Ok(Json(service.batch_cost(batch_id).await?))
}

/// Chemical cost per process run
pub async fn get_run_costs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = CostingService::new(state.db);
    Ok(Json(service.run_costs().await?))
}

/// Cost per chemical usage line
pub async fn get_usage_line_costs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = CostingService::new(state.db);
    Ok(Json(service.usage_lines().await?))
}
