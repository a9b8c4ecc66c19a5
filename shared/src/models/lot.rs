//! Raw leather lot models

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchased quantity of raw hide from one vendor on one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawLeatherLot {
    pub lot_id: i64,
    /// Unique lot code (e.g., "LOT-2024-001")
    pub lot_code: String,
    pub vendor_id: Option<i64>,
    pub vendor_name: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_kg: Option<Decimal>,
    /// Cost per kilogram
    pub unit_cost: Option<Decimal>,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
