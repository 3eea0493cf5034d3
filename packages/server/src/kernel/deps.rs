//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by the local
//! page activities. External services sit behind trait objects so tests can
//! swap in the doubles from `test_dependencies`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::Config;
use crate::domains::local_pages::{GenerationSettings, KeywordCatalog, LocalPageStore, PgLocalPageStore};
use crate::kernel::{ai::OpenAIAdapter, BaseAI};

/// Dependencies accessible to activities.
#[derive(Clone)]
pub struct ServerDeps {
    pub local_pages: Arc<dyn LocalPageStore>,
    pub ai: Arc<dyn BaseAI>,
    /// Loaded once at startup, read-only afterwards.
    pub keywords: Arc<KeywordCatalog>,
    pub generation: GenerationSettings,
    /// Pause between rows of a bulk run.
    pub bulk_delay: Duration,
}

impl ServerDeps {
    pub fn new(
        local_pages: Arc<dyn LocalPageStore>,
        ai: Arc<dyn BaseAI>,
        keywords: Arc<KeywordCatalog>,
        generation: GenerationSettings,
        bulk_delay: Duration,
    ) -> Self {
        Self {
            local_pages,
            ai,
            keywords,
            generation,
            bulk_delay,
        }
    }

    /// Wire production implementations from configuration.
    pub fn production(config: &Config, pool: PgPool) -> Self {
        let generation = GenerationSettings {
            model: config.openai_model.clone(),
            business_name: config.business_name.clone(),
            timeout: config.generation_timeout,
        };

        let ai = OpenAIAdapter::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.generation_timeout,
        );
        if !ai.is_configured() {
            tracing::warn!("OPENAI_API_KEY not set; draft generation will fail until it is configured");
        }

        Self::new(
            Arc::new(PgLocalPageStore::new(pool)),
            Arc::new(ai),
            Arc::new(KeywordCatalog::default()),
            generation,
            config.bulk_delay,
        )
    }
}
