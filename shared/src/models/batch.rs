//! Production models: batches, process runs, chemical usage and finished lots

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ChemicalUnit;

/// A production run of material traced to one lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    pub batch_id: i64,
    pub batch_code: String,
    pub lot_id: i64,
    pub lot_code: Option<String>,
    pub article_id: Option<i64>,
    pub article_code: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub planned_finish_date: Option<NaiveDate>,
    pub actual_finish_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Execution of one process step within a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessRun {
    pub run_id: i64,
    pub batch_id: i64,
    pub process_id: i64,
    pub process_name: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub operator: Option<String>,
    pub yield_weight_kg: Option<Decimal>,
    pub notes: Option<String>,
}

/// A chemical usage line within a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChemicalUsage {
    pub brc_id: i64,
    pub run_id: i64,
    pub chemical_id: i64,
    pub chemical_name: Option<String>,
    pub quantity: Decimal,
    pub unit: Option<ChemicalUnit>,
    /// Overrides the chemical's catalog cost when present
    pub unit_cost: Option<Decimal>,
}

/// Graded output of a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinishedLot {
    pub finished_lot_id: i64,
    pub finished_code: String,
    pub batch_id: i64,
    pub grade: Option<String>,
    pub color: Option<String>,
    pub thickness_mm: Option<Decimal>,
    pub area_sqft: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub created_at: NaiveDateTime,
}
