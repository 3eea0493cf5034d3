//! Error taxonomy for the local page pipeline and publish gate.

use std::time::Duration;

use thiserror::Error;

use super::types::SafetyFlag;

/// Failure to obtain a structurally complete content bundle.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("Generation API credential missing: {0}")]
    MissingCredential(String),

    #[error("Generation API call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Generation API error: {0}")]
    Upstream(String),

    #[error("Malformed generation response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum LocalPageError {
    #[error("Invalid primary keyword: {0}")]
    InvalidKeyword(String),

    #[error("Must provide either city or zip")]
    MissingLocation,

    #[error("ZIP must be 5 digits: {0}")]
    InvalidZip(String),

    #[error("Slug already exists: {0}")]
    SlugConflict(String),

    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error("Local page not found")]
    NotFound,

    #[error("Another published page already exists for this slug: {0}")]
    PublishedSlugTaken(String),

    #[error("Page has safety flags: {}", format_flags(.flags))]
    SafetyFlagged { flags: Vec<SafetyFlag> },

    #[error("Uniqueness score below threshold: {score:.3}")]
    BelowUniqueness { score: f64 },

    #[error("Published pages must be unpublished before deletion")]
    PublishedNotDeletable,

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl LocalPageError {
    /// Input errors are detected before any external call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyword(_) | Self::MissingLocation | Self::InvalidZip(_) | Self::SlugConflict(_)
        )
    }

    /// Rejections raised by the publish gate.
    pub fn is_publish_rejection(&self) -> bool {
        matches!(
            self,
            Self::PublishedSlugTaken(_) | Self::SafetyFlagged { .. } | Self::BelowUniqueness { .. }
        )
    }
}

/// Store implementations return `anyhow` errors; a store may wrap a domain
/// error (e.g. a slug unique-violation) which is recovered here.
impl From<anyhow::Error> for LocalPageError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<LocalPageError>() {
            Ok(domain) => domain,
            Err(other) => Self::Storage(other),
        }
    }
}

fn format_flags(flags: &[SafetyFlag]) -> String {
    flags
        .iter()
        .map(SafetyFlag::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
