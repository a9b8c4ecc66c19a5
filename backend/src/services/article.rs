//! Article service: product specifications and their ordered process flows

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use shared::{Article, ArticleFlow, FlowStep};

/// Article service for articles and article process flows
#[derive(Clone)]
pub struct ArticleService {
    db: SqlitePool,
}

/// Database row for an article
#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    article_id: i64,
    article_code: String,
    description: Option<String>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            article_id: row.article_id,
            article_code: row.article_code,
            description: row.description,
        }
    }
}

/// Database row for a flow step joined with its process
#[derive(Debug, sqlx::FromRow)]
struct FlowStepRow {
    apf_id: i64,
    article_id: i64,
    process_id: i64,
    process_name: String,
    sequence_order: i64,
}

impl From<FlowStepRow> for FlowStep {
    fn from(row: FlowStepRow) -> Self {
        FlowStep {
            apf_id: row.apf_id,
            article_id: row.article_id,
            process_id: row.process_id,
            process_name: row.process_name,
            sequence_order: row.sequence_order,
        }
    }
}

/// Input for creating an article
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleInput {
    pub article_code: String,
    pub description: Option<String>,
}

/// Input for appending a step to an article's flow
#[derive(Debug, Clone, Deserialize)]
pub struct AddFlowStepInput {
    pub process_id: i64,
    /// Position of the step; steps are listed by this value ascending
    #[serde(alias = "order")]
    pub sequence_order: i64,
}

impl ArticleService {
    /// Create a new ArticleService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create an article. Fails with `DuplicateEntry` when the code is taken.
    pub async fn create_article(&self, input: CreateArticleInput) -> AppResult<Article> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (article_code, description)
            VALUES (?, ?)
            RETURNING article_id, article_code, description
            "#,
        )
        .bind(&input.article_code)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "article code"))?;

        tx.commit().await?;

        tracing::info!(article_id = row.article_id, code = %row.article_code, "Article created");
        Ok(row.into())
    }

    /// List all articles
    pub async fn list_articles(&self) -> AppResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT article_id, article_code, description FROM articles ORDER BY article_id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Get an article by id
    pub async fn get_article(&self, article_id: i64) -> AppResult<Article> {
        sqlx::query_as::<_, ArticleRow>(
            "SELECT article_id, article_code, description FROM articles WHERE article_id = ?",
        )
        .bind(article_id)
        .fetch_optional(&self.db)
        .await?
        .map(Article::from)
        .ok_or_else(|| AppError::NotFound("Article".to_string()))
    }

    /// Delete an article; its flow steps go with it
    pub async fn delete_article(&self, article_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM articles WHERE article_id = ?")
            .bind(article_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, "article"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Article".to_string()));
        }

        tx.commit().await?;

        tracing::info!(article_id, "Article deleted");
        Ok(())
    }

    /// Steps of an article's flow, ordered by `sequence_order` ascending
    pub async fn list_flow_steps(&self, article_id: i64) -> AppResult<Vec<FlowStep>> {
        let rows = sqlx::query_as::<_, FlowStepRow>(
            r#"
            SELECT apf.apf_id, apf.article_id, apf.process_id,
                   p.name AS process_name, apf.sequence_order
            FROM article_process_flow apf
            JOIN processes p ON p.process_id = apf.process_id
            WHERE apf.article_id = ?
            ORDER BY apf.sequence_order, apf.apf_id
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(FlowStep::from).collect())
    }

    /// An article together with its ordered flow
    pub async fn get_flow(&self, article_id: i64) -> AppResult<ArticleFlow> {
        let article = self.get_article(article_id).await?;
        let steps = self.list_flow_steps(article_id).await?;
        Ok(ArticleFlow { article, steps })
    }

    /// Add a step to an article's flow.
    ///
    /// Fails with `DuplicateEntry` when the process is already part of the
    /// flow and with `Conflict` when the article or process does not exist.
    pub async fn add_flow_step(
        &self,
        article_id: i64,
        input: AddFlowStepInput,
    ) -> AppResult<FlowStep> {
        let mut tx = self.db.begin().await?;

        let apf_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO article_process_flow (article_id, process_id, sequence_order)
            VALUES (?, ?, ?)
            RETURNING apf_id
            "#,
        )
        .bind(article_id)
        .bind(input.process_id)
        .bind(input.sequence_order)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "flow step"))?;

        let row = sqlx::query_as::<_, FlowStepRow>(
            r#"
            SELECT apf.apf_id, apf.article_id, apf.process_id,
                   p.name AS process_name, apf.sequence_order
            FROM article_process_flow apf
            JOIN processes p ON p.process_id = apf.process_id
            WHERE apf.apf_id = ?
            "#,
        )
        .bind(apf_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            article_id,
            process_id = input.process_id,
            sequence_order = input.sequence_order,
            "Flow step added"
        );
        Ok(row.into())
    }

    /// Remove one step from an article's flow
    pub async fn remove_flow_step(&self, article_id: i64, apf_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result =
            sqlx::query("DELETE FROM article_process_flow WHERE apf_id = ? AND article_id = ?")
                .bind(apf_id)
                .bind(article_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Flow step".to_string()));
        }

        tx.commit().await?;

        tracing::info!(article_id, apf_id, "Flow step removed");
        Ok(())
    }
}
