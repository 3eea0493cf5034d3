//! Content bundle, flags and request types for local SEO pages.

use serde::{Deserialize, Serialize};

/// AI-authored content for one local page.
///
/// Free-text sections separate paragraphs with a blank line (`\n\n`); the
/// renderer and the public page templates both rely on that convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalPageContent {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub short_intro: String,
    pub long_intro: String,
    pub main_body: String,
    pub what_typically_happens_next: String,
    pub services_intro: String,
    /// Comma-separated place names; empty when the admin supplied none.
    pub neighborhoods_or_areas: String,
    pub local_stats_or_regulation_notes: String,
    /// Only ever populated from admin-supplied quotes.
    pub local_testimonials: Vec<Testimonial>,
    #[serde(rename = "locationFAQ")]
    pub location_faq: Vec<FaqEntry>,
}

impl LocalPageContent {
    /// The five sections a complete page is expected to fill, in page order.
    pub fn required_sections(&self) -> [&str; 5] {
        [
            &self.short_intro,
            &self.long_intro,
            &self.main_body,
            &self.what_typically_happens_next,
            &self.services_intro,
        ]
    }

    /// Text compared against published pages for uniqueness.
    pub fn similarity_text(&self) -> String {
        format!("{} {} {}", self.short_intro, self.long_intro, self.main_body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    pub text: String,
    pub url: String,
}

impl InternalLink {
    /// Navigation links attached to every generated page.
    pub fn defaults_for(keyword_slug: &str) -> Vec<Self> {
        vec![
            Self {
                text: "Locations Hub".to_string(),
                url: format!("/{}/locations/", keyword_slug),
            },
            Self {
                text: "Contact Us".to_string(),
                url: "/contact".to_string(),
            },
        ]
    }
}

/// Quality/policy problems detected in generated content.
///
/// Flags never block drafting; they gate publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "safety_flag", rename_all = "snake_case")]
pub enum SafetyFlag {
    LowWordCount,
    LowCityMentions,
    LowLocalContext,
    InsufficientSections,
    InsufficientFaq,
    ProhibitedClaims,
    HighSimilarity,
}

impl SafetyFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowWordCount => "low_word_count",
            Self::LowCityMentions => "low_city_mentions",
            Self::LowLocalContext => "low_local_context",
            Self::InsufficientSections => "insufficient_sections",
            Self::InsufficientFaq => "insufficient_faq",
            Self::ProhibitedClaims => "prohibited_claims",
            Self::HighSimilarity => "high_similarity",
        }
    }
}

impl std::fmt::Display for SafetyFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "local_page_status", rename_all = "lowercase")]
pub enum LocalPageStatus {
    Draft,
    Published,
}

impl LocalPageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl std::str::FromStr for LocalPageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Outcome recorded on a generation log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "generation_status", rename_all = "lowercase")]
pub enum GenerationStatus {
    Success,
    Flagged,
}

impl GenerationStatus {
    pub fn from_flags(flags: &[SafetyFlag]) -> Self {
        if flags.is_empty() {
            Self::Success
        } else {
            Self::Flagged
        }
    }
}

/// Inbound request for one draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDraftRequest {
    /// Display label; falls back to the catalog label when empty.
    #[serde(default)]
    pub primary_keyword: String,
    pub primary_keyword_slug: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub state: String,
    /// Accepted and forwarded, not used by generation.
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl GenerateDraftRequest {
    pub fn city(&self) -> Option<&str> {
        provided(&self.city)
    }

    pub fn zip(&self) -> Option<&str> {
        provided(&self.zip)
    }

    pub fn county(&self) -> Option<&str> {
        provided(&self.county)
    }

    pub fn slug(&self) -> Option<&str> {
        provided(&self.slug)
    }
}

/// Treats blank strings the same as an absent field.
fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
