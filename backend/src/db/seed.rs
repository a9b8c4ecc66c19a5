//! Reference data inserted on startup.
//!
//! All inserts use `INSERT OR IGNORE`, so seeding an already seeded database
//! changes nothing.

use sqlx::SqlitePool;

use crate::error::AppResult;

/// (name, vendor_type)
pub const VENDORS: &[(&str, &str)] = &[
    ("Anatolia Hides", "raw_leather"),
    ("ChemTan Supply", "chemical"),
    ("Blue Line Logistics", "service"),
];

/// (name, description)
pub const PROCESSES: &[(&str, &str)] = &[
    ("Soaking", "Rehydrate hides"),
    ("Tanning", "Stabilize"),
    ("Dyeing", "Apply color"),
];

/// (article_code, description)
pub const ARTICLES: &[(&str, &str)] = &[
    ("ART-1", "Sample article"),
    ("ART-2", "Another article"),
];

/// (article_code, process name, sequence_order)
pub const FLOW: &[(&str, &str, i64)] = &[
    ("ART-1", "Soaking", 1),
    ("ART-1", "Tanning", 2),
    ("ART-1", "Dyeing", 3),
];

/// Insert the reference rows in one transaction
pub async fn seed(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    for &(name, vendor_type) in VENDORS {
        sqlx::query("INSERT OR IGNORE INTO vendors (name, vendor_type) VALUES (?, ?)")
            .bind(name)
            .bind(vendor_type)
            .execute(&mut *tx)
            .await?;
    }

    for &(name, description) in PROCESSES {
        sqlx::query("INSERT OR IGNORE INTO processes (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }

    for &(code, description) in ARTICLES {
        sqlx::query("INSERT OR IGNORE INTO articles (article_code, description) VALUES (?, ?)")
            .bind(code)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }

    // Resolve ids by natural key so the flow survives arbitrary id assignment
    for &(code, process, order) in FLOW {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO article_process_flow (article_id, process_id, sequence_order)
            SELECT a.article_id, p.process_id, ?
            FROM articles a, processes p
            WHERE a.article_code = ? AND p.name = ?
            "#,
        )
        .bind(order)
        .bind(code)
        .bind(process)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        vendors = VENDORS.len(),
        processes = PROCESSES.len(),
        articles = ARTICLES.len(),
        flow_steps = FLOW.len(),
        "Reference data seeded"
    );

    Ok(())
}
