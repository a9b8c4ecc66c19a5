//! Bookkeeping service: bank statement lines and categorization rules

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{decimal_from_real, real_from_decimal};
use crate::error::{AppError, AppResult};
use shared::{categorize, BankRule, BankStatement};

#[derive(Clone)]
pub struct BankService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct StatementRow {
    statement_id: i64,
    txn_date: NaiveDate,
    description: String,
    amount: f64,
    currency: String,
    reference: Option<String>,
    category: Option<String>,
    imported_at: NaiveDateTime,
}

impl TryFrom<StatementRow> for BankStatement {
    type Error = AppError;

    fn try_from(row: StatementRow) -> AppResult<Self> {
        Ok(BankStatement {
            statement_id: row.statement_id,
            txn_date: row.txn_date,
            description: row.description,
            amount: decimal_from_real(row.amount)?,
            currency: row.currency,
            reference: row.reference,
            category: row.category,
            imported_at: row.imported_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RuleRow {
    rule_id: i64,
    pattern: String,
    category: String,
    priority: i64,
}

impl From<RuleRow> for BankRule {
    fn from(row: RuleRow) -> Self {
        BankRule {
            rule_id: row.rule_id,
            pattern: row.pattern,
            category: row.category,
            priority: row.priority,
        }
    }
}

/// Input for importing one bank statement line
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStatementInput {
    pub txn_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub reference: Option<String>,
    /// Left empty, the category comes from the matching rules
    pub category: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Input for creating a categorization rule
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRuleInput {
    pub pattern: String,
    pub category: String,
    #[serde(default)]
    pub priority: i64,
}

impl BankService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Import a statement line, categorizing it by rule when no category is given
    pub async fn record_statement(&self, input: RecordStatementInput) -> AppResult<BankStatement> {
        let category = match input.category {
            Some(category) => Some(category),
            None => {
                let rules = self.list_rules().await?;
                categorize(&input.description, &rules).map(str::to_string)
            }
        };

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, StatementRow>(
            r#"
            INSERT INTO bank_statements (txn_date, description, amount, currency, reference, category)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING statement_id, txn_date, description, amount, currency, reference,
                      category, imported_at
            "#,
        )
        .bind(input.txn_date)
        .bind(&input.description)
        .bind(real_from_decimal(input.amount)?)
        .bind(&input.currency)
        .bind(&input.reference)
        .bind(&category)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "bank statement"))?;

        tx.commit().await?;

        tracing::debug!(statement_id = row.statement_id, category = ?row.category, "Statement imported");
        row.try_into()
    }

    /// Statement lines, most recent transaction first
    pub async fn list_statements(&self) -> AppResult<Vec<BankStatement>> {
        let rows = sqlx::query_as::<_, StatementRow>(
            r#"
            SELECT statement_id, txn_date, description, amount, currency, reference,
                   category, imported_at
            FROM bank_statements
            ORDER BY txn_date DESC, statement_id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(BankStatement::try_from).collect()
    }

    /// Create a rule. Fails with `DuplicateEntry` when the pattern exists.
    pub async fn create_rule(&self, input: CreateRuleInput) -> AppResult<BankRule> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, RuleRow>(
            r#"
            INSERT INTO bank_rules (pattern, category, priority)
            VALUES (?, ?, ?)
            RETURNING rule_id, pattern, category, priority
            "#,
        )
        .bind(&input.pattern)
        .bind(&input.category)
        .bind(input.priority)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "rule pattern"))?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Rules, highest priority first
    pub async fn list_rules(&self) -> AppResult<Vec<BankRule>> {
        let rows = sqlx::query_as::<_, RuleRow>(
            "SELECT rule_id, pattern, category, priority FROM bank_rules ORDER BY priority DESC, rule_id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(BankRule::from).collect())
    }
}
