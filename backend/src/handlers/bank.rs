//! Bookkeeping handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppResult;
use crate::services::bank::{BankService, CreateRuleInput, RecordStatementInput};
use crate::AppState;

pub async fn list_statements(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statements = BankService::new(state.db).list_statements().await?;
    Ok(Json(json!({ "statements": statements })))
}

pub async fn record_statement(
    State(state): State<AppState>,
    Json(input): Json<RecordStatementInput>,
) -> AppResult<impl IntoResponse> {
    let statement = BankService::new(state.db).record_statement(input).await?;
    Ok((StatusCode::CREATED, Json(statement)))
}

pub async fn list_rules(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rules = BankService::new(state.db).list_rules().await?;
    Ok(Json(json!({ "rules": rules })))
}

pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateRuleInput>,
) -> AppResult<impl IntoResponse> {
    let rule = BankService::new(state.db).create_rule(input).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}
