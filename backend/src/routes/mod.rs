//! Route definitions for the Leather Factory Tracker

use axum::{
    routing::{delete, get},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Master data
        .nest("/vendors", vendor_routes())
        .nest("/chemicals", chemical_routes())
        .nest("/processes", process_routes())
        .nest("/articles", article_routes())
        // Production records
        .nest("/lots", lot_routes())
        .nest("/batches", batch_routes())
        .route(
            "/runs/:run_id/chemicals",
            get(handlers::list_chemical_usage).post(handlers::record_chemical_usage),
        )
        .route(
            "/finished-lots",
            get(handlers::list_finished_lots).post(handlers::record_finished_lot),
        )
        // Derived costing report
        .nest("/costs", cost_routes())
        // Bookkeeping
        .nest("/bank", bank_routes())
}

fn vendor_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_vendors).post(handlers::create_vendor))
}

fn chemical_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_chemicals).post(handlers::create_chemical))
}

fn process_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_processes).post(handlers::create_process))
        .route("/:process_id", delete(handlers::delete_process))
}

/// Article and article flow routes
fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_articles).post(handlers::create_article))
        .route(
            "/:article_id",
            get(handlers::get_article).delete(handlers::delete_article),
        )
        .route(
            "/:article_id/flow",
            get(handlers::get_flow).post(handlers::add_flow_step),
        )
        .route("/:article_id/flow/:apf_id", delete(handlers::remove_flow_step))
}

fn lot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_lots).post(handlers::create_lot))
        .route("/:lot_id", get(handlers::get_lot))
}

/// Batch and process run routes
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_batches).post(handlers::create_batch))
        .route("/:batch_id", get(handlers::get_batch))
        .route(
            "/:batch_id/runs",
            get(handlers::list_runs).post(handlers::record_run),
        )
}

fn cost_routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(handlers::get_batch_costs))
        .route("/batches/:batch_id", get(handlers::get_batch_cost))
        .route("/runs", get(handlers::get_run_costs))
        .route("/lines", get(handlers::get_usage_line_costs))
}

fn bank_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/statements",
            get(handlers::list_statements).post(handlers::record_statement),
        )
        .route("/rules", get(handlers::list_rules).post(handlers::create_rule))
}
