//! Process definition service

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use shared::Process;

/// Process service for reusable production steps
#[derive(Clone)]
pub struct ProcessService {
    db: SqlitePool,
}

/// Database row for a process
#[derive(Debug, sqlx::FromRow)]
struct ProcessRow {
    process_id: i64,
    name: String,
    description: Option<String>,
}

impl From<ProcessRow> for Process {
    fn from(row: ProcessRow) -> Self {
        Process {
            process_id: row.process_id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Input for defining a process
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProcessInput {
    pub name: String,
    pub description: Option<String>,
}

impl ProcessService {
    /// Create a new ProcessService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Define a process. Fails with `DuplicateEntry` when the name is taken.
    pub async fn create_process(&self, input: CreateProcessInput) -> AppResult<Process> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ProcessRow>(
            r#"
            INSERT INTO processes (name, description)
            VALUES (?, ?)
            RETURNING process_id, name, description
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "process name"))?;

        tx.commit().await?;

        tracing::info!(process_id = row.process_id, name = %row.name, "Process created");
        Ok(row.into())
    }

    /// List all processes by name
    pub async fn list_processes(&self) -> AppResult<Vec<Process>> {
        let rows = sqlx::query_as::<_, ProcessRow>(
            "SELECT process_id, name, description FROM processes ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Process::from).collect())
    }

    /// Delete a process. Fails with `Conflict` while an article flow or a
    /// batch run still references it.
    pub async fn delete_process(&self, process_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM processes WHERE process_id = ?")
            .bind(process_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "process"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Process".to_string()));
        }

        tx.commit().await?;

        tracing::info!(process_id, "Process deleted");
        Ok(())
    }
}
