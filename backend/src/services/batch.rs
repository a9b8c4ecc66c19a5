//! Production service: batches, process runs, chemical usage and finished lots

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{decimal_from_real, opt_decimal, opt_real, real_from_decimal};
use crate::error::{AppError, AppResult};
use shared::{Batch, ChemicalUnit, ChemicalUsage, FinishedLot, ProcessRun};

/// Batch service for production records
#[derive(Clone)]
pub struct BatchService {
    db: SqlitePool,
}

/// Database row for a batch joined with its lot and article
#[derive(Debug, sqlx::FromRow)]
struct BatchRow {
    batch_id: i64,
    batch_code: String,
    lot_id: i64,
    lot_code: Option<String>,
    article_id: Option<i64>,
    article_code: Option<String>,
    start_date: Option<NaiveDate>,
    planned_finish_date: Option<NaiveDate>,
    actual_finish_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

impl From<BatchRow> for Batch {
    fn from(row: BatchRow) -> Self {
        Batch {
            batch_id: row.batch_id,
            batch_code: row.batch_code,
            lot_id: row.lot_id,
            lot_code: row.lot_code,
            article_id: row.article_id,
            article_code: row.article_code,
            start_date: row.start_date,
            planned_finish_date: row.planned_finish_date,
            actual_finish_date: row.actual_finish_date,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Database row for a process run
#[derive(Debug, sqlx::FromRow)]
struct RunRow {
    run_id: i64,
    batch_id: i64,
    process_id: i64,
    process_name: Option<String>,
    started_at: Option<NaiveDateTime>,
    ended_at: Option<NaiveDateTime>,
    operator: Option<String>,
    yield_weight_kg: Option<f64>,
    notes: Option<String>,
}

impl TryFrom<RunRow> for ProcessRun {
    type Error = AppError;

    fn try_from(row: RunRow) -> AppResult<Self> {
        Ok(ProcessRun {
            run_id: row.run_id,
            batch_id: row.batch_id,
            process_id: row.process_id,
            process_name: row.process_name,
            started_at: row.started_at,
            ended_at: row.ended_at,
            operator: row.operator,
            yield_weight_kg: opt_decimal(row.yield_weight_kg)?,
            notes: row.notes,
        })
    }
}

/// Database row for a chemical usage line
#[derive(Debug, sqlx::FromRow)]
struct UsageRow {
    brc_id: i64,
    run_id: i64,
    chemical_id: i64,
    chemical_name: Option<String>,
    quantity: f64,
    unit: Option<String>,
    unit_cost: Option<f64>,
}

impl TryFrom<UsageRow> for ChemicalUsage {
    type Error = AppError;

    fn try_from(row: UsageRow) -> AppResult<Self> {
        let unit = row
            .unit
            .as_deref()
            .map(str::parse::<ChemicalUnit>)
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(ChemicalUsage {
            brc_id: row.brc_id,
            run_id: row.run_id,
            chemical_id: row.chemical_id,
            chemical_name: row.chemical_name,
            quantity: decimal_from_real(row.quantity)?,
            unit,
            unit_cost: opt_decimal(row.unit_cost)?,
        })
    }
}

/// Database row for a finished lot
#[derive(Debug, sqlx::FromRow)]
struct FinishedLotRow {
    finished_lot_id: i64,
    finished_code: String,
    batch_id: i64,
    grade: Option<String>,
    color: Option<String>,
    thickness_mm: Option<f64>,
    area_sqft: Option<f64>,
    weight_kg: Option<f64>,
    created_at: NaiveDateTime,
}

impl TryFrom<FinishedLotRow> for FinishedLot {
    type Error = AppError;

    fn try_from(row: FinishedLotRow) -> AppResult<Self> {
        Ok(FinishedLot {
            finished_lot_id: row.finished_lot_id,
            finished_code: row.finished_code,
            batch_id: row.batch_id,
            grade: row.grade,
            color: row.color,
            thickness_mm: opt_decimal(row.thickness_mm)?,
            area_sqft: opt_decimal(row.area_sqft)?,
            weight_kg: opt_decimal(row.weight_kg)?,
            created_at: row.created_at,
        })
    }
}

/// Input for starting a batch from a lot
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBatchInput {
    pub batch_code: String,
    pub lot_id: i64,
    pub article_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub planned_finish_date: Option<NaiveDate>,
    pub actual_finish_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for recording a process run
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRunInput {
    pub process_id: i64,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub operator: Option<String>,
    pub yield_weight_kg: Option<Decimal>,
    pub notes: Option<String>,
}

/// Input for recording chemical usage within a run
#[derive(Debug, Clone, Deserialize)]
pub struct RecordUsageInput {
    pub chemical_id: i64,
    pub quantity: Decimal,
    pub unit: Option<ChemicalUnit>,
    /// Leave empty to cost the line at the chemical's catalog price
    pub unit_cost: Option<Decimal>,
}

/// Input for recording a finished lot
#[derive(Debug, Clone, Deserialize)]
pub struct RecordFinishedLotInput {
    pub finished_code: String,
    pub batch_id: i64,
    pub grade: Option<String>,
    pub color: Option<String>,
    pub thickness_mm: Option<Decimal>,
    pub area_sqft: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
}

const SELECT_BATCHES: &str = r#"
    SELECT b.batch_id, b.batch_code, b.lot_id, l.lot_code, b.article_id, a.article_code,
           b.start_date, b.planned_finish_date, b.actual_finish_date, b.notes, b.created_at
    FROM batches b
    LEFT JOIN raw_leather_lots l ON l.lot_id = b.lot_id
    LEFT JOIN articles a ON a.article_id = b.article_id
"#;

const SELECT_RUNS: &str = r#"
    SELECT r.run_id, r.batch_id, r.process_id, p.name AS process_name,
           r.started_at, r.ended_at, r.operator, r.yield_weight_kg, r.notes
    FROM batch_process_runs r
    LEFT JOIN processes p ON p.process_id = r.process_id
"#;

const SELECT_USAGE: &str = r#"
    SELECT brc.brc_id, brc.run_id, brc.chemical_id, c.name AS chemical_name,
           brc.quantity, brc.unit, brc.unit_cost
    FROM batch_run_chemicals brc
    LEFT JOIN chemicals c ON c.chemical_id = brc.chemical_id
"#;

const SELECT_FINISHED: &str = r#"
    SELECT finished_lot_id, finished_code, batch_id, grade, color,
           thickness_mm, area_sqft, weight_kg, created_at
    FROM finished_lots
"#;

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Start a batch. Fails with `DuplicateEntry` when the batch code is taken
    /// and with `Conflict` when the lot or article does not exist.
    pub async fn create_batch(&self, input: CreateBatchInput) -> AppResult<Batch> {
        let mut tx = self.db.begin().await?;

        let batch_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO batches
                (batch_code, lot_id, article_id, start_date, planned_finish_date,
                 actual_finish_date, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING batch_id
            "#,
        )
        .bind(&input.batch_code)
        .bind(input.lot_id)
        .bind(input.article_id)
        .bind(input.start_date)
        .bind(input.planned_finish_date)
        .bind(input.actual_finish_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "batch code"))?;

        let row = sqlx::query_as::<_, BatchRow>(&format!("{SELECT_BATCHES} WHERE b.batch_id = ?"))
            .bind(batch_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(batch_id, code = %row.batch_code, lot_id = row.lot_id, "Batch created");
        Ok(row.into())
    }

    /// List batches, newest first
    pub async fn list_batches(&self) -> AppResult<Vec<Batch>> {
        let rows = sqlx::query_as::<_, BatchRow>(&format!("{SELECT_BATCHES} ORDER BY b.batch_id DESC"))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Batch::from).collect())
    }

    /// Get a batch by id
    pub async fn get_batch(&self, batch_id: i64) -> AppResult<Batch> {
        sqlx::query_as::<_, BatchRow>(&format!("{SELECT_BATCHES} WHERE b.batch_id = ?"))
            .bind(batch_id)
            .fetch_optional(&self.db)
            .await?
            .map(Batch::from)
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))
    }

    /// Record one execution of a process within a batch
    pub async fn record_run(&self, batch_id: i64, input: RecordRunInput) -> AppResult<ProcessRun> {
        let mut tx = self.db.begin().await?;

        let run_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO batch_process_runs
                (batch_id, process_id, started_at, ended_at, operator, yield_weight_kg, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING run_id
            "#,
        )
        .bind(batch_id)
        .bind(input.process_id)
        .bind(input.started_at)
        .bind(input.ended_at)
        .bind(&input.operator)
        .bind(opt_real(input.yield_weight_kg)?)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "process run"))?;

        let row = sqlx::query_as::<_, RunRow>(&format!("{SELECT_RUNS} WHERE r.run_id = ?"))
            .bind(run_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(run_id, batch_id, process_id = input.process_id, "Process run recorded");
        row.try_into()
    }

    /// Runs of a batch in the order they started
    pub async fn list_runs(&self, batch_id: i64) -> AppResult<Vec<ProcessRun>> {
        self.get_batch(batch_id).await?;

        let rows = sqlx::query_as::<_, RunRow>(&format!(
            "{SELECT_RUNS} WHERE r.batch_id = ? ORDER BY r.started_at, r.run_id"
        ))
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ProcessRun::try_from).collect()
    }

    /// Record a chemical usage line within a run
    pub async fn record_chemical_usage(
        &self,
        run_id: i64,
        input: RecordUsageInput,
    ) -> AppResult<ChemicalUsage> {
        let mut tx = self.db.begin().await?;

        let brc_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO batch_run_chemicals (run_id, chemical_id, quantity, unit, unit_cost)
            VALUES (?, ?, ?, ?, ?)
            RETURNING brc_id
            "#,
        )
        .bind(run_id)
        .bind(input.chemical_id)
        .bind(real_from_decimal(input.quantity)?)
        .bind(input.unit.map(|u| u.as_str()))
        .bind(opt_real(input.unit_cost)?)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "chemical usage"))?;

        let row = sqlx::query_as::<_, UsageRow>(&format!("{SELECT_USAGE} WHERE brc.brc_id = ?"))
            .bind(brc_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(brc_id, run_id, chemical_id = input.chemical_id, "Chemical usage recorded");
        row.try_into()
    }

    /// Usage lines of a run
    pub async fn list_chemical_usage(&self, run_id: i64) -> AppResult<Vec<ChemicalUsage>> {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT run_id FROM batch_process_runs WHERE run_id = ?")
                .bind(run_id)
                .fetch_optional(&self.db)
                .await?;

        if exists.is_none() {
            return Err(AppError::NotFound("Process run".to_string()));
        }

        let rows = sqlx::query_as::<_, UsageRow>(&format!(
            "{SELECT_USAGE} WHERE brc.run_id = ? ORDER BY brc.brc_id"
        ))
        .bind(run_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ChemicalUsage::try_from).collect()
    }

    /// Record the graded output of a batch
    pub async fn record_finished_lot(&self, input: RecordFinishedLotInput) -> AppResult<FinishedLot> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, FinishedLotRow>(
            r#"
            INSERT INTO finished_lots
                (finished_code, batch_id, grade, color, thickness_mm, area_sqft, weight_kg)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING finished_lot_id, finished_code, batch_id, grade, color,
                      thickness_mm, area_sqft, weight_kg, created_at
            "#,
        )
        .bind(&input.finished_code)
        .bind(input.batch_id)
        .bind(&input.grade)
        .bind(&input.color)
        .bind(opt_real(input.thickness_mm)?)
        .bind(opt_real(input.area_sqft)?)
        .bind(opt_real(input.weight_kg)?)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "finished lot code"))?;

        tx.commit().await?;

        tracing::info!(
            finished_lot_id = row.finished_lot_id,
            batch_id = row.batch_id,
            "Finished lot recorded"
        );
        row.try_into()
    }

    /// Finished lots, optionally limited to one batch
    pub async fn list_finished_lots(&self, batch_id: Option<i64>) -> AppResult<Vec<FinishedLot>> {
        let rows = match batch_id {
            Some(batch_id) => {
                sqlx::query_as::<_, FinishedLotRow>(&format!(
                    "{SELECT_FINISHED} WHERE batch_id = ? ORDER BY finished_lot_id"
                ))
                .bind(batch_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, FinishedLotRow>(&format!(
                    "{SELECT_FINISHED} ORDER BY finished_lot_id"
                ))
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(FinishedLot::try_from).collect()
    }
}
