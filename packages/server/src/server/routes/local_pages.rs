//! JSON endpoints for local page generation and publishing.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::LocalPageId;
use crate::domains::local_pages::activities::{
    self, parse_bulk_csv, run_bulk_generation, BulkOptions, BulkRowOutcome, BulkRowResult, SlugAvailability,
};
use crate::domains::local_pages::activities::bulk::DEFAULT_BULK_STATE;
use crate::domains::local_pages::{
    GenerateDraftRequest, LocalPage, LocalPageError, LocalPageGenerationLog, LocalPageStatus,
};
use crate::server::app::AppState;

impl IntoResponse for LocalPageError {
    fn into_response(self) -> Response {
        let status = match &self {
            LocalPageError::InvalidKeyword(_)
            | LocalPageError::MissingLocation
            | LocalPageError::InvalidZip(_)
            | LocalPageError::PublishedSlugTaken(_)
            | LocalPageError::SafetyFlagged { .. }
            | LocalPageError::BelowUniqueness { .. }
            | LocalPageError::PublishedNotDeletable => StatusCode::BAD_REQUEST,
            LocalPageError::SlugConflict(_) => StatusCode::CONFLICT,
            LocalPageError::NotFound => StatusCode::NOT_FOUND,
            LocalPageError::Generation(_) => StatusCode::BAD_GATEWAY,
            LocalPageError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            LocalPageError::SafetyFlagged { flags } => json!({
                "error": "Page has safety flags",
                "flags": flags,
            }),
            LocalPageError::BelowUniqueness { score } => json!({
                "error": "Uniqueness score below threshold",
                "uniquenessScore": score,
            }),
            LocalPageError::Storage(e) => {
                tracing::error!(error = %format!("{:#}", e), "Local page storage error");
                json!({ "error": "Internal server error" })
            }
            other => {
                if status.is_server_error() {
                    tracing::error!(error = %other, "Local page request failed");
                }
                json!({ "error": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub async fn generate_draft_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<GenerateDraftRequest>,
) -> Result<Json<LocalPage>, LocalPageError> {
    let page = activities::generate_draft(request, &state.deps).await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub id: LocalPageId,
    #[serde(default)]
    pub force: bool,
}

pub async fn publish_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<LocalPage>, LocalPageError> {
    let page = activities::publish_local_page(request.id, request.force, &state.deps).await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: LocalPageId,
}

pub async fn unpublish_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<IdRequest>,
) -> Result<Json<LocalPage>, LocalPageError> {
    let page = activities::unpublish_local_page(request.id, &state.deps).await?;
    Ok(Json(page))
}

pub async fn delete_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<IdRequest>,
) -> Result<Json<serde_json::Value>, LocalPageError> {
    activities::delete_local_page(query.id, &state.deps).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<LocalPageStatus>,
    pub limit: Option<i64>,
}

pub async fn list_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LocalPage>>, LocalPageError> {
    let pages = activities::list_local_pages(query.status, query.limit, &state.deps).await?;
    Ok(Json(pages))
}

#[derive(Debug, Deserialize)]
pub struct CheckSlugsRequest {
    pub slugs: Vec<String>,
}

pub async fn check_slugs_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CheckSlugsRequest>,
) -> Result<Json<SlugAvailability>, LocalPageError> {
    let availability = activities::check_slugs(request.slugs, &state.deps).await?;
    Ok(Json(availability))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub csv: String,
    pub state: Option<String>,
    #[serde(alias = "skip_existing")]
    pub skip_existing: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<BulkRowResult>,
}

impl BulkResponse {
    pub fn from_results(results: Vec<BulkRowResult>) -> Self {
        let count = |f: fn(&BulkRowOutcome) -> bool| results.iter().filter(|r| f(&r.outcome)).count();
        Self {
            succeeded: count(|o| matches!(o, BulkRowOutcome::Success { .. })),
            skipped: count(|o| matches!(o, BulkRowOutcome::Skipped { .. })),
            failed: count(|o| matches!(o, BulkRowOutcome::Error { .. })),
            results,
        }
    }
}

/// Runs synchronously; the response arrives after the last row.
pub async fn bulk_generate_handler(Extension(state): Extension<AppState>, Json(request): Json<BulkRequest>) -> Response {
    if request.csv.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "CSV content is required" })),
        )
            .into_response();
    }

    let rows = parse_bulk_csv(&request.csv);
    let options = BulkOptions {
        state: request
            .state
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BULK_STATE.to_string()),
        skip_existing: request.skip_existing.unwrap_or(true),
        delay: state.deps.bulk_delay,
    };

    let results = run_bulk_generation(&rows, &options, &state.deps).await;
    Json(BulkResponse::from_results(results)).into_response()
}

pub async fn generation_logs_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<LocalPageId>,
) -> Result<Json<Vec<LocalPageGenerationLog>>, LocalPageError> {
    let logs = activities::generation_logs(id, &state.deps).await?;
    Ok(Json(logs))
}
