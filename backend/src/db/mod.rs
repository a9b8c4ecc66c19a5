//! Embedded SQLite store: connection pool, schema and reference data.
//!
//! # Tables
//!
//! - master data: `vendors`, `chemicals`, `processes`, `articles`,
//!   `article_process_flow`
//! - production: `raw_leather_lots`, `batches`, `batch_process_runs`,
//!   `batch_run_chemicals`, `finished_lots`
//! - bookkeeping: `bank_statements`, `bank_rules`
//!
//! # Views
//!
//! `v_chemical_usage_cost` → `v_run_chemical_cost` → `v_batch_chemical_cost`
//! → `v_batch_total_cost`

pub mod schema;
pub mod seed;

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

pub use seed::seed;

/// Open a pool on the configured database, creating the file if needed.
///
/// Foreign key enforcement is switched on for every connection.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::Configuration(format!("invalid database url '{}': {}", config.url, e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30));

    // An in-memory database lives exactly as long as its connection
    if config.is_in_memory() {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Create every table, index and view that does not exist yet
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    for statement in schema::statements() {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::debug!(
        tables = schema::TABLES.len(),
        indexes = schema::INDEXES.len(),
        views = schema::VIEWS.len(),
        "Schema ready"
    );

    Ok(())
}

/// Pool with schema in place and, when configured, reference data loaded
pub async fn bootstrap(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let pool = create_pool(config).await?;
    init_schema(&pool).await?;

    if config.seed_sample_data {
        seed(&pool).await?;
    }

    Ok(pool)
}

/// Decode a REAL column into the domain's decimal type.
///
/// Values outside the decimal range (about ±7.9e28), NaN and infinities are
/// an error, never zero.
pub fn decimal_from_real(value: f64) -> AppResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::Internal(format!("{} is out of range for a decimal amount", value)))
}

/// Nullable variant of [`decimal_from_real`]
pub fn opt_decimal(value: Option<f64>) -> AppResult<Option<Decimal>> {
    value.map(decimal_from_real).transpose()
}

/// Encode a decimal for a REAL column
pub fn real_from_decimal(value: Decimal) -> AppResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| AppError::Internal(format!("{} cannot be stored as REAL", value)))
}

/// Nullable variant of [`real_from_decimal`]
pub fn opt_real(value: Option<Decimal>) -> AppResult<Option<f64>> {
    value.map(real_from_decimal).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_round_trip_keeps_value() {
        let amount: Decimal = "1250.75".parse().unwrap();
        let stored = real_from_decimal(amount).unwrap();
        assert_eq!(decimal_from_real(stored).unwrap(), amount);
    }

    #[test]
    fn test_real_beyond_decimal_range_is_an_error() {
        assert!(decimal_from_real(1e30).is_err());
        assert!(decimal_from_real(f64::NAN).is_err());
        assert!(opt_decimal(Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_null_stays_null() {
        assert_eq!(opt_decimal(None).unwrap(), None);
        assert_eq!(opt_real(None).unwrap(), None);
    }
}
