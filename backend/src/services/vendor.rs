//! Vendor master data service

use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use shared::{Vendor, VendorType};

/// Vendor service for managing suppliers
#[derive(Clone)]
pub struct VendorService {
    db: SqlitePool,
}

/// Database row for a vendor
#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    vendor_id: i64,
    name: String,
    vendor_type: String,
    contact_person: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    active: bool,
    created_at: NaiveDateTime,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = AppError;

    fn try_from(row: VendorRow) -> AppResult<Self> {
        Ok(Vendor {
            vendor_id: row.vendor_id,
            vendor_type: row
                .vendor_type
                .parse()
                .map_err(|e: shared::ParseEnumError| AppError::Internal(e.to_string()))?,
            name: row.name,
            contact_person: row.contact_person,
            phone: row.phone,
            email: row.email,
            address: row.address,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

/// Input for creating a vendor
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVendorInput {
    pub name: String,
    #[serde(default)]
    pub vendor_type: VendorType,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateVendorInput {
    /// Active vendor with only the required fields set
    pub fn new(name: impl Into<String>, vendor_type: VendorType) -> Self {
        Self {
            name: name.into(),
            vendor_type,
            contact_person: None,
            phone: None,
            email: None,
            address: None,
            active: true,
        }
    }
}

const VENDOR_COLUMNS: &str =
    "vendor_id, name, vendor_type, contact_person, phone, email, address, active, created_at";

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a vendor. Fails with `DuplicateEntry` when the name is taken.
    pub async fn create_vendor(&self, input: CreateVendorInput) -> AppResult<Vendor> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, VendorRow>(&format!(
            r#"
            INSERT INTO vendors (name, vendor_type, contact_person, phone, email, address, active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {VENDOR_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.vendor_type.as_str())
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "vendor name"))?;

        tx.commit().await?;

        tracing::info!(vendor_id = row.vendor_id, name = %row.name, "Vendor created");
        row.try_into()
    }

    /// List all vendors by name
    pub async fn list_vendors(&self) -> AppResult<Vec<Vendor>> {
        let rows = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Vendor::try_from).collect()
    }
}
