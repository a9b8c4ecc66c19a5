//! Leather Factory Tracker - Backend Server

use std::{net::SocketAddr, sync::Arc};

use leather_factory_backend::{config, create_app, db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "lf_server=debug,leather_factory_backend=debug,tower_http=debug,sqlx=warn".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LFT_LOG_FORMAT").is_ok_and(|f| f == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting Leather Factory Tracker");
    tracing::info!("Environment: {}", config.environment);

    // Schema and reference data must be in place before serving; any failure is fatal
    tracing::info!("Opening database {}", config.database.url);
    let db_pool = db::bootstrap(&config.database).await?;
    tracing::info!("Database ready");

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
