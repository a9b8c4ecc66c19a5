//! Costing service: batch cost report from the cost roll-up views
//!
//! The views are recomputed on every query. `batch_costs_in_memory` produces
//! the same report through `shared::costing` from the raw records.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{decimal_from_real, opt_decimal};
use crate::error::{AppError, AppResult};
use shared::{BatchCost, BatchInput, CostLedger, RunCost, RunInput, UsageLineCost, UsageLineInput};

/// Costing service
#[derive(Clone)]
pub struct CostingService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct UsageLineCostRow {
    brc_id: i64,
    run_id: i64,
    batch_id: i64,
    chemical_id: i64,
    chemical_name: Option<String>,
    quantity: f64,
    unit: Option<String>,
    effective_unit_cost: f64,
    line_cost: f64,
}

impl TryFrom<UsageLineCostRow> for UsageLineCost {
    type Error = AppError;

    fn try_from(row: UsageLineCostRow) -> AppResult<Self> {
        Ok(UsageLineCost {
            brc_id: row.brc_id,
            run_id: row.run_id,
            batch_id: row.batch_id,
            chemical_id: row.chemical_id,
            chemical_name: row.chemical_name,
            quantity: decimal_from_real(row.quantity)?,
            unit: row.unit,
            effective_unit_cost: decimal_from_real(row.effective_unit_cost)?,
            line_cost: decimal_from_real(row.line_cost)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RunCostRow {
    run_id: i64,
    batch_id: i64,
    process_id: i64,
    process_name: Option<String>,
    chemical_cost: f64,
}

impl TryFrom<RunCostRow> for RunCost {
    type Error = AppError;

    fn try_from(row: RunCostRow) -> AppResult<Self> {
        Ok(RunCost {
            run_id: row.run_id,
            batch_id: row.batch_id,
            process_id: row.process_id,
            process_name: row.process_name,
            chemical_cost: decimal_from_real(row.chemical_cost)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BatchCostRow {
    batch_id: i64,
    batch_code: String,
    lot_code: Option<String>,
    article_code: Option<String>,
    raw_material_cost: f64,
    chemical_cost: f64,
    total_cost: f64,
}

impl TryFrom<BatchCostRow> for BatchCost {
    type Error = AppError;

    fn try_from(row: BatchCostRow) -> AppResult<Self> {
        Ok(BatchCost {
            batch_id: row.batch_id,
            batch_code: row.batch_code,
            lot_code: row.lot_code,
            article_code: row.article_code,
            raw_material_cost: decimal_from_real(row.raw_material_cost)?,
            chemical_cost: decimal_from_real(row.chemical_cost)?,
            total_cost: decimal_from_real(row.total_cost)?,
        })
    }
}

/// batch_id, batch_code, lot_code, article_code, lot weight, lot unit cost
type BatchSourceRow = (i64, String, Option<String>, Option<String>, Option<f64>, Option<f64>);

const SELECT_BATCH_COSTS: &str = r#"
    SELECT batch_id, batch_code, lot_code, article_code,
           raw_material_cost, chemical_cost, total_cost
    FROM v_batch_total_cost
"#;

impl CostingService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Cost of every chemical usage line
    pub async fn usage_lines(&self) -> AppResult<Vec<UsageLineCost>> {
        let rows = sqlx::query_as::<_, UsageLineCostRow>(
            r#"
            SELECT brc_id, run_id, batch_id, chemical_id, chemical_name, quantity, unit,
                   effective_unit_cost, line_cost
            FROM v_chemical_usage_cost
            ORDER BY batch_id, run_id, brc_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UsageLineCost::try_from).collect()
    }

    /// Chemical cost of every process run
    pub async fn run_costs(&self) -> AppResult<Vec<RunCost>> {
        let rows = sqlx::query_as::<_, RunCostRow>(
            r#"
            SELECT run_id, batch_id, process_id, process_name, chemical_cost
            FROM v_run_chemical_cost
            ORDER BY batch_id, run_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(RunCost::try_from).collect()
    }

    /// Batch costing report
    pub async fn batch_costs(&self) -> AppResult<Vec<BatchCost>> {
        let rows = sqlx::query_as::<_, BatchCostRow>(&format!("{SELECT_BATCH_COSTS} ORDER BY batch_id"))
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(BatchCost::try_from).collect()
    }

    /// Cost report row of one batch
    pub async fn batch_cost(&self, batch_id: i64) -> AppResult<BatchCost> {
        sqlx::query_as::<_, BatchCostRow>(&format!("{SELECT_BATCH_COSTS} WHERE batch_id = ?"))
            .bind(batch_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?
            .try_into()
    }

    /// Load every record feeding the report in one read transaction
    pub async fn load_ledger(&self) -> AppResult<CostLedger> {
        let mut tx = self.db.begin().await?;

        let chemicals = sqlx::query_as::<_, (i64, Option<f64>)>(
            "SELECT chemical_id, unit_cost FROM chemicals",
        )
        .fetch_all(&mut *tx)
        .await?;

        let batches = sqlx::query_as::<_, BatchSourceRow>(
            r#"
            SELECT b.batch_id, b.batch_code, l.lot_code, a.article_code, l.weight_kg, l.unit_cost
            FROM batches b
            LEFT JOIN raw_leather_lots l ON l.lot_id = b.lot_id
            LEFT JOIN articles a ON a.article_id = b.article_id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let runs = sqlx::query_as::<_, (i64, i64)>("SELECT run_id, batch_id FROM batch_process_runs")
            .fetch_all(&mut *tx)
            .await?;

        let lines = sqlx::query_as::<_, (i64, i64, i64, f64, Option<f64>)>(
            "SELECT brc_id, run_id, chemical_id, quantity, unit_cost FROM batch_run_chemicals",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CostLedger {
            chemical_costs: chemicals
                .into_iter()
                .map(|(id, cost)| -> AppResult<(i64, Option<Decimal>)> {
                    Ok((id, opt_decimal(cost)?))
                })
                .collect::<AppResult<HashMap<_, _>>>()?,
            batches: batches
                .into_iter()
                .map(|r| -> AppResult<BatchInput> {
                    Ok(BatchInput {
                        batch_id: r.0,
                        batch_code: r.1,
                        lot_code: r.2,
                        article_code: r.3,
                        lot_weight_kg: opt_decimal(r.4)?,
                        lot_unit_cost: opt_decimal(r.5)?,
                    })
                })
                .collect::<AppResult<_>>()?,
            runs: runs
                .into_iter()
                .map(|(run_id, batch_id)| RunInput { run_id, batch_id })
                .collect(),
            lines: lines
                .into_iter()
                .map(|r| -> AppResult<UsageLineInput> {
                    Ok(UsageLineInput {
                        brc_id: r.0,
                        run_id: r.1,
                        chemical_id: r.2,
                        quantity: decimal_from_real(r.3)?,
                        unit_cost: opt_decimal(r.4)?,
                    })
                })
                .collect::<AppResult<_>>()?,
        })
    }

    /// Batch costing report computed in memory from the raw records
    pub async fn batch_costs_in_memory(&self) -> AppResult<Vec<BatchCost>> {
        Ok(self.load_ledger().await?.batch_costs()?)
    }

    /// Serialize report rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
