//! Read-side operations and draft deletion.

use serde::Serialize;
use tracing::info;

use crate::common::LocalPageId;
use crate::domains::local_pages::errors::LocalPageError;
use crate::domains::local_pages::models::{LocalPage, LocalPageGenerationLog};
use crate::domains::local_pages::types::LocalPageStatus;
use crate::kernel::ServerDeps;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 500;

/// Pages newest first, optionally filtered by status.
pub async fn list_local_pages(
    status: Option<LocalPageStatus>,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> Result<Vec<LocalPage>, LocalPageError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    Ok(deps.local_pages.list(status, limit).await?)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlugAvailability {
    pub existing: Vec<String>,
    pub available: Vec<String>,
}

/// Partition `slugs` into those already used and those still free, keeping input order.
pub async fn check_slugs(slugs: Vec<String>, deps: &ServerDeps) -> Result<SlugAvailability, LocalPageError> {
    if slugs.is_empty() {
        return Ok(SlugAvailability::default());
    }

    let taken = deps.local_pages.existing_slugs(&slugs).await?;
    let (existing, available): (Vec<String>, Vec<String>) =
        slugs.into_iter().partition(|slug| taken.contains(slug));
    Ok(SlugAvailability { existing, available })
}

/// Hard-delete a draft. Published pages must be unpublished first.
pub async fn delete_local_page(id: LocalPageId, deps: &ServerDeps) -> Result<(), LocalPageError> {
    let page = deps
        .local_pages
        .find_by_id(id)
        .await?
        .ok_or(LocalPageError::NotFound)?;

    if page.is_published() {
        return Err(LocalPageError::PublishedNotDeletable);
    }

    if !deps.local_pages.delete(id).await? {
        return Err(LocalPageError::NotFound);
    }

    info!(page_id = %id, slug = %page.slug, "Local page draft deleted");
    Ok(())
}

pub async fn generation_logs(id: LocalPageId, deps: &ServerDeps) -> Result<Vec<LocalPageGenerationLog>, LocalPageError> {
    if deps.local_pages.find_by_id(id).await?.is_none() {
        return Err(LocalPageError::NotFound);
    }
    Ok(deps.local_pages.logs_for_page(id).await?)
}
