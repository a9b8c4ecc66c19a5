//! Vendor and chemical catalog models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ChemicalUnit, VendorType};

/// A supplier of hides, chemicals or services
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    pub vendor_id: i64,
    /// Unique across all vendors
    pub name: String,
    pub vendor_type: VendorType,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// A chemical in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chemical {
    pub chemical_id: i64,
    pub name: String,
    pub default_unit: ChemicalUnit,
    /// Catalog cost per default unit, used when a usage line has no override
    pub unit_cost: Option<Decimal>,
    pub preferred_vendor_id: Option<i64>,
    pub preferred_vendor_name: Option<String>,
    pub created_at: NaiveDateTime,
}
