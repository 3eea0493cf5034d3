use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{GenerationLogId, LocalPageId};
use crate::domains::local_pages::types::{GenerationStatus, SafetyFlag};

/// Append-only audit row, one per persisted generation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LocalPageGenerationLog {
    pub id: GenerationLogId,
    pub local_page_id: LocalPageId,
    pub slug: String,
    pub prompt_version: String,
    pub status: GenerationStatus,
    pub similarity_score: f64,
    pub safety_flags: Vec<SafetyFlag>,
    pub created_at: DateTime<Utc>,
}

impl LocalPageGenerationLog {
    /// Takes a connection so it can join the page insert's transaction.
    pub async fn create(
        local_page_id: LocalPageId,
        slug: &str,
        prompt_version: &str,
        status: GenerationStatus,
        similarity_score: f64,
        safety_flags: &[SafetyFlag],
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO local_page_generation_logs
                (id, local_page_id, slug, prompt_version, status, similarity_score, safety_flags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(GenerationLogId::new())
        .bind(local_page_id)
        .bind(slug)
        .bind(prompt_version)
        .bind(status)
        .bind(similarity_score)
        .bind(safety_flags)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_page(local_page_id: LocalPageId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM local_page_generation_logs WHERE local_page_id = $1 ORDER BY created_at DESC",
        )
        .bind(local_page_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
