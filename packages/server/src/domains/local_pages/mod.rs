//! Local SEO page generation for hood-cleaning service locations.
//!
//! Generates AI-written location pages as drafts, scores them for quality and
//! uniqueness against already-published pages, and gates publishing on the result.

pub mod activities;
pub mod errors;
pub mod generator;
pub mod keywords;
pub mod models;
pub mod prompt;
pub mod render;
pub mod retry;
pub mod similarity;
pub mod slug;
pub mod store;
pub mod types;
pub mod validation;

pub use errors::{GenerationFailure, LocalPageError};
pub use generator::GenerationSettings;
pub use keywords::KeywordCatalog;
pub use models::{LocalCityContext, LocalPage, LocalPageGenerationLog, NewLocalPage};
pub use store::{CityContextLookup, LocalPageStore, PgLocalPageStore};
pub use types::*;
