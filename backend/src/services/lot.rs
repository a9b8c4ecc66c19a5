//! Raw leather lot service

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{opt_decimal, opt_real};
use crate::error::{AppError, AppResult};
use shared::RawLeatherLot;

/// Lot service for purchased raw hide
#[derive(Clone)]
pub struct LotService {
    db: SqlitePool,
}

/// Database row for a lot joined with its vendor
#[derive(Debug, sqlx::FromRow)]
struct LotRow {
    lot_id: i64,
    lot_code: String,
    vendor_id: Option<i64>,
    vendor_name: Option<String>,
    purchase_date: Option<NaiveDate>,
    weight_kg: Option<f64>,
    unit_cost: Option<f64>,
    currency: String,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

impl TryFrom<LotRow> for RawLeatherLot {
    type Error = AppError;

    fn try_from(row: LotRow) -> AppResult<Self> {
        Ok(RawLeatherLot {
            lot_id: row.lot_id,
            lot_code: row.lot_code,
            vendor_id: row.vendor_id,
            vendor_name: row.vendor_name,
            purchase_date: row.purchase_date,
            weight_kg: opt_decimal(row.weight_kg)?,
            unit_cost: opt_decimal(row.unit_cost)?,
            currency: row.currency,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Input for recording a lot purchase
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLotInput {
    pub lot_code: String,
    pub vendor_id: Option<i64>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_kg: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub notes: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

const SELECT_LOTS: &str = r#"
    SELECT l.lot_id, l.lot_code, l.vendor_id, v.name AS vendor_name, l.purchase_date,
           l.weight_kg, l.unit_cost, l.currency, l.notes, l.created_at
    FROM raw_leather_lots l
    LEFT JOIN vendors v ON v.vendor_id = l.vendor_id
"#;

impl LotService {
    /// Create a new LotService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a lot purchase. Fails with `DuplicateEntry` when the lot code is
    /// taken and with `Conflict` when the vendor does not exist.
    pub async fn create_lot(&self, input: CreateLotInput) -> AppResult<RawLeatherLot> {
        let mut tx = self.db.begin().await?;

        let lot_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO raw_leather_lots
                (lot_code, vendor_id, purchase_date, weight_kg, unit_cost, currency, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING lot_id
            "#,
        )
        .bind(&input.lot_code)
        .bind(input.vendor_id)
        .bind(input.purchase_date)
        .bind(opt_real(input.weight_kg)?)
        .bind(opt_real(input.unit_cost)?)
        .bind(&input.currency)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "lot code"))?;

        let row = sqlx::query_as::<_, LotRow>(&format!("{SELECT_LOTS} WHERE l.lot_id = ?"))
            .bind(lot_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(lot_id, code = %row.lot_code, "Raw leather lot recorded");
        row.try_into()
    }

    /// List lots, newest purchase first
    pub async fn list_lots(&self) -> AppResult<Vec<RawLeatherLot>> {
        let rows = sqlx::query_as::<_, LotRow>(&format!(
            "{SELECT_LOTS} ORDER BY l.purchase_date DESC, l.lot_id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(RawLeatherLot::try_from).collect()
    }

    /// Get a lot by id
    pub async fn get_lot(&self, lot_id: i64) -> AppResult<RawLeatherLot> {
        sqlx::query_as::<_, LotRow>(&format!("{SELECT_LOTS} WHERE l.lot_id = ?"))
            .bind(lot_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))?
            .try_into()
    }
}
