//! One generation attempt: prompt the model, parse and normalize its JSON.

use std::time::Duration;

use openai_client::{strip_code_blocks, OpenAIError};
use serde::Deserialize;
use serde_json::Value;

use super::errors::GenerationFailure;
use super::prompt::{system_prompt, user_prompt, LocationInput};
use super::retry::GenerationMode;
use super::types::{FaqEntry, LocalPageContent};
use crate::kernel::{BaseAI, JsonCompletionRequest};

/// Model and branding used for every generation call.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub business_name: String,
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            business_name: "Shield Hood Services".to_string(),
            timeout: Duration::from_secs(90),
        }
    }
}

pub async fn generate_local_page_content(
    ai: &dyn BaseAI,
    settings: &GenerationSettings,
    location: LocationInput<'_>,
    mode: GenerationMode,
) -> Result<LocalPageContent, GenerationFailure> {
    let request = JsonCompletionRequest {
        model: settings.model.clone(),
        system_prompt: system_prompt(&settings.business_name, &location),
        user_prompt: user_prompt(&settings.business_name, &location, mode),
        temperature: mode.temperature(),
        top_p: mode.top_p(),
    };

    let raw = tokio::time::timeout(settings.timeout, ai.complete_json(request))
        .await
        .map_err(|_| GenerationFailure::Timeout(settings.timeout))?
        .map_err(classify_ai_error)?;

    parse_content(&raw)
}

/// Maps infrastructure errors from the AI layer onto generation failures.
fn classify_ai_error(err: anyhow::Error) -> GenerationFailure {
    match err.downcast_ref::<OpenAIError>() {
        Some(OpenAIError::Config(msg)) => GenerationFailure::MissingCredential(msg.clone()),
        Some(OpenAIError::Timeout(after)) => GenerationFailure::Timeout(*after),
        Some(OpenAIError::Parse(msg)) => GenerationFailure::Malformed(msg.clone()),
        _ => GenerationFailure::Upstream(format!("{:#}", err)),
    }
}

/// Lenient mirror of [`LocalPageContent`]: the model may omit or mistype any field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawContent {
    title: Option<String>,
    meta_description: Option<String>,
    h1: Option<String>,
    short_intro: Option<String>,
    long_intro: Option<String>,
    main_body: Option<String>,
    what_typically_happens_next: Option<String>,
    services_intro: Option<String>,
    neighborhoods_or_areas: Option<Value>,
    local_stats_or_regulation_notes: Option<String>,
    local_testimonials: Option<Value>,
    #[serde(rename = "locationFAQ")]
    location_faq: Option<Value>,
}

/// Parse the model's JSON answer into a complete content bundle.
///
/// `title`, `h1` and `mainBody` must be non-empty; other text fields default
/// to empty, and array fields that are not arrays become empty lists.
pub fn parse_content(raw: &str) -> Result<LocalPageContent, GenerationFailure> {
    let cleaned = strip_code_blocks(raw);
    let parsed: RawContent = serde_json::from_str(cleaned)
        .map_err(|e| GenerationFailure::Malformed(format!("invalid JSON: {}", e)))?;

    let title = required(parsed.title, "title")?;
    let h1 = required(parsed.h1, "h1")?;
    let main_body = required(parsed.main_body, "mainBody")?;

    Ok(LocalPageContent {
        title,
        meta_description: parsed.meta_description.unwrap_or_default(),
        h1,
        short_intro: parsed.short_intro.unwrap_or_default(),
        long_intro: parsed.long_intro.unwrap_or_default(),
        main_body,
        what_typically_happens_next: parsed.what_typically_happens_next.unwrap_or_default(),
        services_intro: parsed.services_intro.unwrap_or_default(),
        neighborhoods_or_areas: areas_text(parsed.neighborhoods_or_areas),
        local_stats_or_regulation_notes: parsed.local_stats_or_regulation_notes.unwrap_or_default(),
        local_testimonials: array_entries(parsed.local_testimonials),
        location_faq: array_entries::<FaqEntry>(parsed.location_faq)
            .into_iter()
            .filter(|faq| !faq.question.trim().is_empty() && !faq.answer.trim().is_empty())
            .collect(),
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, GenerationFailure> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| GenerationFailure::Malformed(format!("missing required field: {}", field)))
}

/// Accepts either the documented comma-separated string or a JSON array of names.
fn areas_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

/// Keeps the well-formed entries of a JSON array; anything else is empty.
fn array_entries<T: for<'de> Deserialize<'de>>(value: Option<Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
