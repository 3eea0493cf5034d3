//! Persistence seam for the local page pipeline.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{LocalCityContext, LocalPage, LocalPageGenerationLog, NewLocalPage};
use super::types::LocalPageStatus;
use crate::common::LocalPageId;

/// How a city context row is looked up: city + state case-insensitively, or exact zip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityContextLookup<'a> {
    CityState { city: &'a str, state: &'a str },
    Zip(&'a str),
}

#[async_trait]
pub trait LocalPageStore: Send + Sync {
    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    async fn find_by_id(&self, id: LocalPageId) -> Result<Option<LocalPage>>;

    async fn find_city_context(&self, lookup: CityContextLookup<'_>) -> Result<Option<LocalCityContext>>;

    /// Rendered HTML of up to `limit` published pages, newest first.
    async fn recent_published_html(&self, limit: i64) -> Result<Vec<String>>;

    /// Persist a draft together with its generation log; both or neither.
    async fn insert_draft(&self, page: NewLocalPage, prompt_version: &str) -> Result<LocalPage>;

    async fn published_slug_taken(&self, slug: &str, except: LocalPageId) -> Result<bool>;

    async fn set_status(&self, id: LocalPageId, status: LocalPageStatus) -> Result<Option<LocalPage>>;

    async fn delete(&self, id: LocalPageId) -> Result<bool>;

    async fn list(&self, status: Option<LocalPageStatus>, limit: i64) -> Result<Vec<LocalPage>>;

    async fn existing_slugs(&self, slugs: &[String]) -> Result<Vec<String>>;

    async fn logs_for_page(&self, id: LocalPageId) -> Result<Vec<LocalPageGenerationLog>>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgLocalPageStore {
    pool: PgPool,
}

impl PgLocalPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocalPageStore for PgLocalPageStore {
    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        LocalPage::slug_exists(slug, &self.pool).await
    }

    async fn find_by_id(&self, id: LocalPageId) -> Result<Option<LocalPage>> {
        LocalPage::find_by_id(id, &self.pool).await
    }

    async fn find_city_context(&self, lookup: CityContextLookup<'_>) -> Result<Option<LocalCityContext>> {
        match lookup {
            CityContextLookup::CityState { city, state } => {
                LocalCityContext::find_by_city_state(city, state, &self.pool).await
            }
            CityContextLookup::Zip(zip) => LocalCityContext::find_by_zip(zip, &self.pool).await,
        }
    }

    async fn recent_published_html(&self, limit: i64) -> Result<Vec<String>> {
        LocalPage::recent_published_html(limit, &self.pool).await
    }

    async fn insert_draft(&self, page: NewLocalPage, prompt_version: &str) -> Result<LocalPage> {
        let (page, _log) = LocalPage::create_with_log(&page, prompt_version, &self.pool).await?;
        Ok(page)
    }

    async fn published_slug_taken(&self, slug: &str, except: LocalPageId) -> Result<bool> {
        LocalPage::published_slug_taken(slug, except, &self.pool).await
    }

    async fn set_status(&self, id: LocalPageId, status: LocalPageStatus) -> Result<Option<LocalPage>> {
        LocalPage::set_status(id, status, &self.pool).await
    }

    async fn delete(&self, id: LocalPageId) -> Result<bool> {
        LocalPage::delete(id, &self.pool).await
    }

    async fn list(&self, status: Option<LocalPageStatus>, limit: i64) -> Result<Vec<LocalPage>> {
        LocalPage::list(status, limit, &self.pool).await
    }

    async fn existing_slugs(&self, slugs: &[String]) -> Result<Vec<String>> {
        LocalPage::existing_slugs(slugs, &self.pool).await
    }

    async fn logs_for_page(&self, id: LocalPageId) -> Result<Vec<LocalPageGenerationLog>> {
        LocalPageGenerationLog::find_for_page(id, &self.pool).await
    }
}
