//! Vendor and chemical catalog HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppResult;
use crate::services::chemical::{ChemicalService, CreateChemicalInput};
use crate::services::vendor::{CreateVendorInput, VendorService};
use crate::AppState;

/// List all vendors
pub async fn list_vendors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = VendorService::new(state.db);
    let vendors = service.list_vendors().await?;
    Ok(Json(json!({ "vendors": vendors })))
}

/// Create a vendor
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<CreateVendorInput>,
) -> AppResult<impl IntoResponse> {
    let service = VendorService::new(state.db);
    let vendor = service.create_vendor(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Vendor added", "vendor": vendor })),
    ))
}

/// List the chemical catalog
pub async fn list_chemicals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ChemicalService::new(state.db);
    let chemicals = service.list_chemicals().await?;
    Ok(Json(json!({ "chemicals": chemicals })))
}

/// Add a chemical to the catalog
pub async fn create_chemical(
    State(state): State<AppState>,
    Json(input): Json<CreateChemicalInput>,
) -> AppResult<impl IntoResponse> {
    let service = ChemicalService::new(state.db);
    let chemical = service.create_chemical(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Chemical added", "chemical": chemical })),
    ))
}
