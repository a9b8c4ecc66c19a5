//! Liveness and store readiness

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::schema;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub database: String,
    /// All cost views are present
    pub cost_views_ready: bool,
    pub seed_sample_data: bool,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let views: Result<i64, _> = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'view' AND name LIKE 'v\\_%' ESCAPE '\\'",
    )
    .fetch_one(&state.db)
    .await;

    let (database, cost_views_ready) = match views {
        Ok(count) => ("connected", count as usize == schema::VIEWS.len()),
        Err(err) => {
            tracing::warn!(error = %err, "Health check query failed");
            ("disconnected", false)
        }
    };

    Json(HealthResponse {
        status: if cost_views_ready { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        database: database.to_string(),
        cost_views_ready,
        seed_sample_data: state.config.database.seed_sample_data,
    })
}
