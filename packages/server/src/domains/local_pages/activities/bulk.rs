//! Bulk CSV ingestion: one draft pipeline call per row, with a pause between calls.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use super::generate_draft::{generate_draft, validate_request};
use crate::domains::local_pages::keywords::DEFAULT_INTENT;
use crate::domains::local_pages::types::GenerateDraftRequest;
use crate::kernel::ServerDeps;

pub const BULK_CSV_HEADER: &str = "primary_keyword_slug,city,zip,county,intent,slug";
pub const DEFAULT_BULK_STATE: &str = "CA";
pub const DEFAULT_BULK_DELAY: Duration = Duration::from_millis(1500);

/// One data line of the bulk CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRow {
    /// 1-based, not counting the header.
    pub row: usize,
    pub primary_keyword_slug: String,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub intent: String,
    pub slug: Option<String>,
}

/// Parse the bulk format. The first line is a header and is skipped; blank
/// lines are ignored. Fields are comma-separated without quoting.
pub fn parse_bulk_csv(csv: &str) -> Vec<BulkRow> {
    csv.trim()
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            let values: Vec<&str> = line.split(',').map(str::trim).collect();
            let field = |i: usize| {
                values
                    .get(i)
                    .copied()
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            BulkRow {
                row: index + 1,
                primary_keyword_slug: field(0).unwrap_or_default(),
                city: field(1),
                zip: field(2),
                county: field(3),
                intent: field(4).unwrap_or_else(|| DEFAULT_INTENT.to_string()),
                slug: field(5),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct BulkOptions {
    pub state: String,
    pub skip_existing: bool,
    pub delay: Duration,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            state: DEFAULT_BULK_STATE.to_string(),
            skip_existing: true,
            delay: DEFAULT_BULK_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkRowOutcome {
    Success { slug: String },
    Skipped { reason: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkRowResult {
    pub row: usize,
    #[serde(flatten)]
    pub outcome: BulkRowOutcome,
}

impl BulkRow {
    fn to_request(&self, deps: &ServerDeps, state: &str) -> GenerateDraftRequest {
        GenerateDraftRequest {
            primary_keyword: deps.keywords.label_for(&self.primary_keyword_slug),
            primary_keyword_slug: self.primary_keyword_slug.clone(),
            city: self.city.clone(),
            zip: self.zip.clone(),
            county: self.county.clone(),
            state: state.to_string(),
            intent: self.intent.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Run every row through the draft pipeline. A failing row never aborts the batch.
///
/// Invalid rows and skipped slugs are reported without calling the generator;
/// the delay is applied after each generator call except the last row's.
pub async fn run_bulk_generation(rows: &[BulkRow], options: &BulkOptions, deps: &ServerDeps) -> Vec<BulkRowResult> {
    let mut results = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let request = row.to_request(deps, &options.state);
        let (outcome, called_generator) = process_row(request, options, deps).await;

        match &outcome {
            BulkRowOutcome::Success { slug } => info!(row = row.row, slug = %slug, "Bulk row generated"),
            BulkRowOutcome::Skipped { reason } => info!(row = row.row, reason = %reason, "Bulk row skipped"),
            BulkRowOutcome::Error { message } => warn!(row = row.row, error = %message, "Bulk row failed"),
        }

        results.push(BulkRowResult { row: row.row, outcome });

        if called_generator && index + 1 < rows.len() && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    results
}

/// Returns the outcome and whether the generator was invoked.
async fn process_row(request: GenerateDraftRequest, options: &BulkOptions, deps: &ServerDeps) -> (BulkRowOutcome, bool) {
    let slug = match validate_request(&request, &deps.keywords) {
        Ok(validated) => validated.slug,
        Err(e) => return (BulkRowOutcome::Error { message: e.to_string() }, false),
    };

    if options.skip_existing {
        match deps.local_pages.slug_exists(&slug).await {
            Ok(true) => {
                return (
                    BulkRowOutcome::Skipped {
                        reason: format!("Skipping existing slug \"{}\"", slug),
                    },
                    false,
                )
            }
            Ok(false) => {}
            Err(e) => warn!(slug = %slug, error = %e, "Error checking slug, generating anyway"),
        }
    }

    match generate_draft(request, deps).await {
        Ok(page) => (BulkRowOutcome::Success { slug: page.slug }, true),
        Err(e) => (BulkRowOutcome::Error { message: e.to_string() }, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_header_and_defaults_intent() {
        let csv = format!(
            "{}\nhood-cleaning,Fresno,,Fresno,,\nkitchen-exhaust-cleaning,,90012,,compliance,/custom\n",
            BULK_CSV_HEADER
        );
        let rows = parse_bulk_csv(&csv);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].city.as_deref(), Some("Fresno"));
        assert_eq!(rows[0].zip, None);
        assert_eq!(rows[0].intent, "information");
        assert_eq!(rows[0].slug, None);

        assert_eq!(rows[1].zip.as_deref(), Some("90012"));
        assert_eq!(rows[1].intent, "compliance");
        assert_eq!(rows[1].slug.as_deref(), Some("/custom"));
    }

    #[test]
    fn test_parse_short_rows_and_blank_lines() {
        let rows = parse_bulk_csv("header\n\nhood-cleaning , Los Angeles\n   \n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].primary_keyword_slug, "hood-cleaning");
        assert_eq!(rows[0].city.as_deref(), Some("Los Angeles"));
        assert_eq!(rows[0].county, None);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse_bulk_csv(BULK_CSV_HEADER).is_empty());
        assert!(parse_bulk_csv("").is_empty());
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let result = BulkRowResult {
            row: 3,
            outcome: BulkRowOutcome::Skipped {
                reason: "exists".into(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["row"], 3);
        assert_eq!(json["outcome"], "skipped");
        assert_eq!(json["reason"], "exists");
    }
}
