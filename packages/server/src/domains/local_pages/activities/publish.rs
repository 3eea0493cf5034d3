//! Publish gate and its inverse.

use tracing::info;

use super::generate_draft::UNIQUENESS_THRESHOLD;
use crate::common::LocalPageId;
use crate::domains::local_pages::errors::LocalPageError;
use crate::domains::local_pages::models::LocalPage;
use crate::domains::local_pages::types::LocalPageStatus;
use crate::kernel::ServerDeps;

/// Flip a draft to `published`.
///
/// Fails closed when another published page owns the slug. Unless `force` is
/// set, also fails when the draft carries safety flags or its uniqueness
/// score is below [`UNIQUENESS_THRESHOLD`].
pub async fn publish_local_page(id: LocalPageId, force: bool, deps: &ServerDeps) -> Result<LocalPage, LocalPageError> {
    let page = deps
        .local_pages
        .find_by_id(id)
        .await?
        .ok_or(LocalPageError::NotFound)?;

    if deps.local_pages.published_slug_taken(&page.slug, page.id).await? {
        return Err(LocalPageError::PublishedSlugTaken(page.slug));
    }

    if !force {
        if !page.safety_flags.is_empty() {
            return Err(LocalPageError::SafetyFlagged {
                flags: page.safety_flags,
            });
        }
        if page.uniqueness_score < UNIQUENESS_THRESHOLD {
            return Err(LocalPageError::BelowUniqueness {
                score: page.uniqueness_score,
            });
        }
    }

    let page = deps
        .local_pages
        .set_status(id, LocalPageStatus::Published)
        .await?
        .ok_or(LocalPageError::NotFound)?;

    info!(page_id = %page.id, slug = %page.slug, force, "Local page published");
    Ok(page)
}

/// Return a page to `draft`; unconditional.
pub async fn unpublish_local_page(id: LocalPageId, deps: &ServerDeps) -> Result<LocalPage, LocalPageError> {
    let page = deps
        .local_pages
        .set_status(id, LocalPageStatus::Draft)
        .await?
        .ok_or(LocalPageError::NotFound)?;

    info!(page_id = %page.id, slug = %page.slug, "Local page unpublished");
    Ok(page)
}
