//! Process, article and article flow HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::AppResult;
use crate::services::article::{AddFlowStepInput, ArticleService, CreateArticleInput};
use crate::services::process::{CreateProcessInput, ProcessService};
use crate::AppState;

/// List all processes
pub async fn list_processes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ProcessService::new(state.db);
    let processes = service.list_processes().await?;
    Ok(Json(json!({ "processes": processes })))
}

/// Define a process
pub async fn create_process(
    State(state): State<AppState>,
    Json(input): Json<CreateProcessInput>,
) -> AppResult<impl IntoResponse> {
    let service = ProcessService::new(state.db);
    let process = service.create_process(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Process added", "process": process })),
    ))
}

/// Delete a process that no flow or run references
pub async fn delete_process(
    State(state): State<AppState>,
    Path(process_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = ProcessService::new(state.db);
    service.delete_process(process_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all articles
pub async fn list_articles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(state.db);
    let articles = service.list_articles().await?;
    Ok(Json(json!({ "articles": articles })))
}

/// Create an article
pub async fn create_article(
    State(state): State<AppState>,
    Json(input): Json<CreateArticleInput>,
) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(state.db);
    let article = service.create_article(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Article added", "article": article })),
    ))
}

/// Get an article
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(state.db);
    Ok(Json(service.get_article(article_id).await?))
}

/// Delete an article and its flow
pub async fn delete_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(state.db);
    service.delete_article(article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get an article's ordered process flow together with the process list
pub async fn get_flow(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let flow = ArticleService::new(state.db.clone()).get_flow(article_id).await?;
    let processes = ProcessService::new(state.db).list_processes().await?;
    Ok(Json(json!({
        "article": flow.article,
        "steps": flow.steps,
        "processes": processes,
    })))
}

/// Add a step to an article's flow
pub async fn add_flow_step(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    Json(input): Json<AddFlowStepInput>,
) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(state.db);
    let step = service.add_flow_step(article_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Step added", "step": step })),
    ))
}

/// Remove a step from an article's flow
pub async fn remove_flow_step(
    State(state): State<AppState>,
    Path((article_id, apf_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(state.db);
    service.remove_flow_step(article_id, apf_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
