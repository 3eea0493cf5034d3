//! Draft pipeline: preconditions, generation with escalation, scoring, persistence.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::domains::local_pages::errors::LocalPageError;
use crate::domains::local_pages::generator::generate_local_page_content;
use crate::domains::local_pages::keywords::{KeywordCatalog, DEFAULT_INTENT};
use crate::domains::local_pages::models::{LocalPage, NewLocalPage};
use crate::domains::local_pages::prompt::{LocationInput, PROMPT_VERSION};
use crate::domains::local_pages::render::{html_to_text, render_local_page_html};
use crate::domains::local_pages::retry::GenerationMode;
use crate::domains::local_pages::similarity::calculate_uniqueness_score;
use crate::domains::local_pages::slug::synthesize_slug;
use crate::domains::local_pages::store::CityContextLookup;
use crate::domains::local_pages::types::{
    GenerateDraftRequest, InternalLink, LocalPageContent, SafetyFlag,
};
use crate::domains::local_pages::validation::validate_content;
use crate::kernel::ServerDeps;

/// Drafts scoring below this are flagged `high_similarity`; publishing requires at least this.
pub const UNIQUENESS_THRESHOLD: f64 = 0.9;

/// Number of recent published pages compared against a new draft.
pub const SIMILARITY_SAMPLE_SIZE: i64 = 80;

lazy_static! {
    static ref ZIP_PATTERN: Regex = Regex::new(r"^\d{5}$").unwrap();
}

/// A request that passed every local precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest<'a> {
    pub keyword_slug: &'a str,
    pub city: Option<&'a str>,
    pub zip: Option<&'a str>,
    pub county: Option<&'a str>,
    pub state: &'a str,
    pub slug: String,
}

impl ValidatedRequest<'_> {
    /// Name used for validation and rendering: the city, else the zip.
    pub fn location_label(&self) -> &str {
        self.city.or(self.zip).unwrap_or_default()
    }
}

/// Checks preconditions in order, before anything touches the store or the AI.
pub fn validate_request<'a>(
    request: &'a GenerateDraftRequest,
    keywords: &KeywordCatalog,
) -> Result<ValidatedRequest<'a>, LocalPageError> {
    let keyword_slug = request.primary_keyword_slug.trim();
    if !keywords.contains(keyword_slug) {
        return Err(LocalPageError::InvalidKeyword(keyword_slug.to_string()));
    }

    let city = request.city();
    let zip = request.zip();
    if city.is_none() && zip.is_none() {
        return Err(LocalPageError::MissingLocation);
    }

    if let Some(zip) = zip {
        if !ZIP_PATTERN.is_match(zip) {
            return Err(LocalPageError::InvalidZip(zip.to_string()));
        }
    }

    let state = request.state.trim();
    let slug = match request.slug() {
        Some(slug) => slug.to_string(),
        None => synthesize_slug(keyword_slug, city, zip, state).ok_or(LocalPageError::MissingLocation)?,
    };

    Ok(ValidatedRequest {
        keyword_slug,
        city,
        zip,
        county: request.county(),
        state,
        slug,
    })
}

/// Generate, validate, score and persist one draft page.
///
/// Nothing is written unless every step succeeds; the page and its
/// generation log are inserted together.
pub async fn generate_draft(request: GenerateDraftRequest, deps: &ServerDeps) -> Result<LocalPage, LocalPageError> {
    let validated = validate_request(&request, &deps.keywords)?;

    if deps.local_pages.slug_exists(&validated.slug).await? {
        return Err(LocalPageError::SlugConflict(validated.slug));
    }

    let mut city_context = None;
    if let Some(city) = validated.city {
        let lookup = CityContextLookup::CityState {
            city,
            state: validated.state,
        };
        city_context = deps.local_pages.find_city_context(lookup).await?;
    }
    if city_context.is_none() {
        if let Some(zip) = validated.zip {
            city_context = deps.local_pages.find_city_context(CityContextLookup::Zip(zip)).await?;
        }
    }
    let local_notes = city_context.as_ref().and_then(|ctx| ctx.local_notes.as_deref());
    if local_notes.is_some() {
        debug!(slug = %validated.slug, "Using local city context notes");
    }

    let location = LocationInput {
        city: validated.city.unwrap_or_default(),
        state: validated.state,
        county: validated.county,
        zip: validated.zip,
        local_context_notes: local_notes,
    };
    let label = validated.location_label();

    // The comparison corpus does not depend on the generated content.
    let ((content, mut flags), corpus) = tokio::try_join!(
        generate_with_escalation(deps, location, label, &validated.slug),
        async {
            deps.local_pages
                .recent_published_html(SIMILARITY_SAMPLE_SIZE)
                .await
                .map_err(LocalPageError::from)
        },
    )?;

    let corpus: Vec<String> = corpus.iter().map(|html| html_to_text(html)).collect();
    let uniqueness_score = calculate_uniqueness_score(&content.similarity_text(), &corpus);
    if uniqueness_score < UNIQUENESS_THRESHOLD && !flags.contains(&SafetyFlag::HighSimilarity) {
        flags.push(SafetyFlag::HighSimilarity);
    }

    let rendered_html = render_local_page_html(&content, label, validated.state);

    let primary_keyword = match request.primary_keyword.trim() {
        "" => deps.keywords.label_for(validated.keyword_slug),
        given => given.to_string(),
    };
    let intent = match request.intent.trim() {
        "" => DEFAULT_INTENT.to_string(),
        given => given.to_string(),
    };

    let new_page = NewLocalPage {
        primary_keyword,
        primary_keyword_slug: validated.keyword_slug.to_string(),
        city: validated.city.map(str::to_string),
        zip: validated.zip.map(str::to_string),
        county: validated.county.map(str::to_string),
        state: validated.state.to_string(),
        intent,
        slug: validated.slug.clone(),
        content,
        rendered_html,
        internal_links: InternalLink::defaults_for(validated.keyword_slug),
        uniqueness_score,
        safety_flags: flags,
    };

    let page = deps.local_pages.insert_draft(new_page, PROMPT_VERSION).await?;

    info!(
        page_id = %page.id,
        slug = %page.slug,
        uniqueness_score = page.uniqueness_score,
        flags = ?page.safety_flags,
        "Local page draft created"
    );

    Ok(page)
}

/// Runs the normal attempt and, when structural quality flags appear, one strict attempt.
/// Returns the last attempt's content and flags.
async fn generate_with_escalation(
    deps: &ServerDeps,
    location: LocationInput<'_>,
    label: &str,
    slug: &str,
) -> Result<(LocalPageContent, Vec<SafetyFlag>), LocalPageError> {
    let mut mode = GenerationMode::Normal;
    let mut attempt = 1;

    loop {
        let content = generate_local_page_content(deps.ai.as_ref(), &deps.generation, location, mode).await?;
        let flags = validate_content(&content, label, location.state);

        match mode.next(&flags) {
            Some(next) => {
                warn!(slug, attempt, flags = ?flags, "Draft failed quality checks, retrying in strict mode");
                mode = next;
                attempt += 1;
            }
            None => {
                debug!(slug, attempt, flags = ?flags, "Generation attempt accepted");
                return Ok((content, flags));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(city: Option<&str>, zip: Option<&str>) -> GenerateDraftRequest {
        GenerateDraftRequest {
            primary_keyword_slug: "hood-cleaning".into(),
            city: city.map(Into::into),
            zip: zip.map(Into::into),
            state: "CA".into(),
            intent: "information".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_keyword_checked_first() {
        let mut req = request(None, None);
        req.primary_keyword_slug = "pressure-washing".into();
        let err = validate_request(&req, &KeywordCatalog::default()).unwrap_err();
        assert!(matches!(err, LocalPageError::InvalidKeyword(ref k) if k == "pressure-washing"));
    }

    #[test]
    fn test_missing_location() {
        let req = request(Some("  "), None);
        let err = validate_request(&req, &KeywordCatalog::default()).unwrap_err();
        assert!(matches!(err, LocalPageError::MissingLocation));
    }

    #[test]
    fn test_zip_must_be_five_digits() {
        let catalog = KeywordCatalog::default();
        let short = request(None, Some("9001"));
        assert!(matches!(
            validate_request(&short, &catalog),
            Err(LocalPageError::InvalidZip(ref z)) if z == "9001"
        ));

        let letters = request(None, Some("9001a"));
        assert!(validate_request(&letters, &catalog).is_err());

        let ok = request(None, Some("90012"));
        let validated = validate_request(&ok, &catalog).unwrap();
        assert_eq!(validated.slug, "/hood-cleaning-90012");
        assert_eq!(validated.location_label(), "90012");
    }

    #[test]
    fn test_city_slug_synthesized() {
        let req = request(Some("Los Angeles"), None);
        let validated = validate_request(&req, &KeywordCatalog::default()).unwrap();
        assert_eq!(validated.slug, "/hood-cleaning/los-angeles-ca");
        assert_eq!(validated.location_label(), "Los Angeles");
    }

    #[test]
    fn test_explicit_slug_kept() {
        let mut req = request(Some("Fresno"), None);
        req.slug = Some("/custom/fresno".into());
        let validated = validate_request(&req, &KeywordCatalog::default()).unwrap();
        assert_eq!(validated.slug, "/custom/fresno");
    }
}
