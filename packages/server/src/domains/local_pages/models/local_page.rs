use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use super::generation_log::LocalPageGenerationLog;
use crate::common::LocalPageId;
use crate::domains::local_pages::errors::LocalPageError;
use crate::domains::local_pages::types::{
    FaqEntry, GenerationStatus, InternalLink, LocalPageContent, LocalPageStatus, SafetyFlag,
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LocalPage {
    pub id: LocalPageId,
    pub primary_keyword: String,
    pub primary_keyword_slug: String,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub state: String,
    pub intent: String,
    pub slug: String,
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub content_json: Json<LocalPageContent>,
    pub rendered_html: String,
    pub faq_json: Json<Vec<FaqEntry>>,
    pub internal_links_json: Json<Vec<InternalLink>>,
    pub uniqueness_score: f64,
    pub safety_flags: Vec<SafetyFlag>,
    pub status: LocalPageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the draft pipeline knows before the row exists.
#[derive(Debug, Clone)]
pub struct NewLocalPage {
    pub primary_keyword: String,
    pub primary_keyword_slug: String,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub state: String,
    pub intent: String,
    pub slug: String,
    pub content: LocalPageContent,
    pub rendered_html: String,
    pub internal_links: Vec<InternalLink>,
    pub uniqueness_score: f64,
    pub safety_flags: Vec<SafetyFlag>,
}

impl NewLocalPage {
    /// Materialize as a draft row without a database (used by in-memory stores).
    pub fn into_draft(self, id: LocalPageId, now: DateTime<Utc>) -> LocalPage {
        LocalPage {
            id,
            title: self.content.title.clone(),
            meta_description: self.content.meta_description.clone(),
            h1: self.content.h1.clone(),
            faq_json: Json(self.content.location_faq.clone()),
            content_json: Json(self.content),
            primary_keyword: self.primary_keyword,
            primary_keyword_slug: self.primary_keyword_slug,
            city: self.city,
            zip: self.zip,
            county: self.county,
            state: self.state,
            intent: self.intent,
            slug: self.slug,
            rendered_html: self.rendered_html,
            internal_links_json: Json(self.internal_links),
            uniqueness_score: self.uniqueness_score,
            safety_flags: self.safety_flags,
            status: LocalPageStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

impl LocalPage {
    pub fn content(&self) -> &LocalPageContent {
        &self.content_json.0
    }

    pub fn is_published(&self) -> bool {
        self.status == LocalPageStatus::Published
    }

    /// Insert a draft and its generation log in one transaction.
    ///
    /// A unique-index violation on `slug` is reported as
    /// [`LocalPageError::SlugConflict`] (wrapped in the returned `anyhow` error).
    pub async fn create_with_log(
        new: &NewLocalPage,
        prompt_version: &str,
        pool: &PgPool,
    ) -> Result<(Self, LocalPageGenerationLog)> {
        let mut tx = pool.begin().await?;

        let page = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO local_pages (
                id, primary_keyword, primary_keyword_slug, city, zip, county, state, intent,
                slug, title, meta_description, h1, content_json, rendered_html, faq_json,
                internal_links_json, uniqueness_score, safety_flags, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, 'draft')
            RETURNING *
            "#,
        )
        .bind(LocalPageId::new())
        .bind(&new.primary_keyword)
        .bind(&new.primary_keyword_slug)
        .bind(&new.city)
        .bind(&new.zip)
        .bind(&new.county)
        .bind(&new.state)
        .bind(&new.intent)
        .bind(&new.slug)
        .bind(&new.content.title)
        .bind(&new.content.meta_description)
        .bind(&new.content.h1)
        .bind(Json(&new.content))
        .bind(&new.rendered_html)
        .bind(Json(&new.content.location_faq))
        .bind(Json(&new.internal_links))
        .bind(new.uniqueness_score)
        .bind(&new.safety_flags)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                anyhow::Error::new(LocalPageError::SlugConflict(new.slug.clone()))
            }
            other => other.into(),
        })?;

        let log = LocalPageGenerationLog::create(
            page.id,
            &page.slug,
            prompt_version,
            GenerationStatus::from_flags(&page.safety_flags),
            1.0 - page.uniqueness_score,
            &page.safety_flags,
            &mut *tx,
        )
        .await?;

        tx.commit().await?;

        Ok((page, log))
    }

    pub async fn find_by_id(id: LocalPageId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM local_pages WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn slug_exists(slug: &str, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM local_pages WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Whether a published page other than `except` already owns `slug`.
    pub async fn published_slug_taken(slug: &str, except: LocalPageId, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM local_pages
                WHERE slug = $1 AND status = 'published' AND id <> $2
            )
            "#,
        )
        .bind(slug)
        .bind(except)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Rendered HTML of the most recently created published pages.
    pub async fn recent_published_html(limit: i64, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT rendered_html FROM local_pages
            WHERE status = 'published'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list(status: Option<LocalPageStatus>, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM local_pages
            WHERE ($1::local_page_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Subset of `slugs` already used by some page.
    pub async fn existing_slugs(slugs: &[String], pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT slug FROM local_pages WHERE slug = ANY($1)")
            .bind(slugs)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn set_status(id: LocalPageId, status: LocalPageStatus, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE local_pages SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns false when no row matched.
    pub async fn delete(id: LocalPageId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM local_pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
