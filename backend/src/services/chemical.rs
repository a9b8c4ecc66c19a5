//! Chemical catalog service

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{opt_decimal, opt_real};
use crate::error::{AppError, AppResult};
use shared::{Chemical, ChemicalUnit};

/// Chemical service for the chemical catalog
#[derive(Clone)]
pub struct ChemicalService {
    db: SqlitePool,
}

/// Database row for a chemical joined with its preferred vendor
#[derive(Debug, sqlx::FromRow)]
struct ChemicalRow {
    chemical_id: i64,
    name: String,
    default_unit: String,
    unit_cost: Option<f64>,
    preferred_vendor_id: Option<i64>,
    preferred_vendor_name: Option<String>,
    created_at: NaiveDateTime,
}

impl TryFrom<ChemicalRow> for Chemical {
    type Error = AppError;

    fn try_from(row: ChemicalRow) -> AppResult<Self> {
        Ok(Chemical {
            chemical_id: row.chemical_id,
            default_unit: row
                .default_unit
                .parse()
                .map_err(|e: shared::ParseEnumError| AppError::Internal(e.to_string()))?,
            name: row.name,
            unit_cost: opt_decimal(row.unit_cost)?,
            preferred_vendor_id: row.preferred_vendor_id,
            preferred_vendor_name: row.preferred_vendor_name,
            created_at: row.created_at,
        })
    }
}

/// Input for adding a chemical to the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChemicalInput {
    pub name: String,
    #[serde(default)]
    pub default_unit: ChemicalUnit,
    pub unit_cost: Option<Decimal>,
    pub preferred_vendor_id: Option<i64>,
}

const SELECT_CHEMICALS: &str = r#"
    SELECT c.chemical_id, c.name, c.default_unit, c.unit_cost,
           c.preferred_vendor_id, v.name AS preferred_vendor_name, c.created_at
    FROM chemicals c
    LEFT JOIN vendors v ON v.vendor_id = c.preferred_vendor_id
"#;

impl ChemicalService {
    /// Create a new ChemicalService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Add a chemical. Fails with `DuplicateEntry` when the name is taken and
    /// with `Conflict` when the preferred vendor does not exist.
    pub async fn create_chemical(&self, input: CreateChemicalInput) -> AppResult<Chemical> {
        let mut tx = self.db.begin().await?;

        let chemical_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO chemicals (name, default_unit, unit_cost, preferred_vendor_id)
            VALUES (?, ?, ?, ?)
            RETURNING chemical_id
            "#,
        )
        .bind(&input.name)
        .bind(input.default_unit.as_str())
        .bind(opt_real(input.unit_cost)?)
        .bind(input.preferred_vendor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "chemical name"))?;

        let row = sqlx::query_as::<_, ChemicalRow>(&format!(
            "{SELECT_CHEMICALS} WHERE c.chemical_id = ?"
        ))
        .bind(chemical_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(chemical_id, name = %row.name, "Chemical created");
        row.try_into()
    }

    /// List the catalog by name
    pub async fn list_chemicals(&self) -> AppResult<Vec<Chemical>> {
        let rows = sqlx::query_as::<_, ChemicalRow>(&format!("{SELECT_CHEMICALS} ORDER BY c.name"))
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Chemical::try_from).collect()
    }
}
