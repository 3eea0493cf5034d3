// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use openai_client::OpenAIError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseAI, JsonCompletionRequest, ServerDeps};
use crate::common::{CityContextId, GenerationLogId, LocalPageId};
use crate::domains::local_pages::errors::LocalPageError;
use crate::domains::local_pages::models::{
    LocalCityContext, LocalPage, LocalPageGenerationLog, NewLocalPage,
};
use crate::domains::local_pages::store::{CityContextLookup, LocalPageStore};
use crate::domains::local_pages::types::{GenerationStatus, LocalPageStatus};
use crate::domains::local_pages::{GenerationSettings, KeywordCatalog};

// =============================================================================
// Mock AI
// =============================================================================

enum MockReply {
    Text(String),
    Error(OpenAIError),
}

pub struct MockAI {
    responses: Arc<Mutex<Vec<MockReply>>>,
    calls: Arc<Mutex<Vec<JsonCompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(MockReply::Text(response.into()));
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Queue a client error (e.g. missing key, non-2xx response)
    pub fn with_error(self, error: OpenAIError) -> Self {
        self.responses.lock().unwrap().push(MockReply::Error(error));
        self
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all requests that were sent to the AI
    pub fn calls(&self) -> Vec<JsonCompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a user prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.user_prompt.contains(text))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete_json(&self, request: JsonCompletionRequest) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(err)) => Err(err.into()),
            None => Ok("Mock AI response".to_string()),
        }
    }
}

// =============================================================================
// In-memory LocalPageStore
// =============================================================================

#[derive(Default)]
struct StoreState {
    pages: Vec<LocalPage>,
    logs: Vec<LocalPageGenerationLog>,
    contexts: Vec<LocalCityContext>,
}

/// `LocalPageStore` backed by vectors; mirrors the Postgres unique-slug rule.
#[derive(Default)]
pub struct InMemoryLocalPageStore {
    state: Mutex<StoreState>,
    fail_inserts: bool,
}

impl InMemoryLocalPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `insert_draft` returns a storage error.
    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    /// Add a city context row (either city+state or zip keyed).
    pub fn with_city_context(
        self,
        city: Option<&str>,
        state: Option<&str>,
        zip: Option<&str>,
        notes: &str,
    ) -> Self {
        self.state.lock().unwrap().contexts.push(LocalCityContext {
            id: CityContextId::new(),
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            zip: zip.map(str::to_string),
            local_notes: Some(notes.to_string()),
            created_at: Utc::now(),
        });
        self
    }

    /// Seed an already-published page, created `age_minutes` ago.
    pub fn insert_published(&self, page: NewLocalPage, age_minutes: i64) -> LocalPage {
        let created_at = Utc::now() - ChronoDuration::minutes(age_minutes);
        let mut page = page.into_draft(LocalPageId::new(), created_at);
        page.status = LocalPageStatus::Published;
        self.state.lock().unwrap().pages.push(page.clone());
        page
    }

    pub fn pages(&self) -> Vec<LocalPage> {
        self.state.lock().unwrap().pages.clone()
    }

    pub fn logs(&self) -> Vec<LocalPageGenerationLog> {
        self.state.lock().unwrap().logs.clone()
    }

    fn newest_first(pages: impl Iterator<Item = LocalPage>) -> Vec<LocalPage> {
        let mut pages: Vec<_> = pages.collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        pages
    }
}

#[async_trait]
impl LocalPageStore for InMemoryLocalPageStore {
    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().pages.iter().any(|p| p.slug == slug))
    }

    async fn find_by_id(&self, id: LocalPageId) -> Result<Option<LocalPage>> {
        Ok(self.state.lock().unwrap().pages.iter().find(|p| p.id == id).cloned())
    }

    async fn find_city_context(&self, lookup: CityContextLookup<'_>) -> Result<Option<LocalCityContext>> {
        let guard = self.state.lock().unwrap();
        let matches = |ctx: &&LocalCityContext| match lookup {
            CityContextLookup::CityState { city, state } => {
                ctx.city.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(city))
                    && ctx.state.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(state))
            }
            CityContextLookup::Zip(zip) => ctx.zip.as_deref() == Some(zip),
        };
        Ok(guard.contexts.iter().find(matches).cloned())
    }

    async fn recent_published_html(&self, limit: i64) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let published = state.pages.iter().filter(|p| p.is_published()).cloned();
        Ok(Self::newest_first(published)
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|p| p.rendered_html)
            .collect())
    }

    async fn insert_draft(&self, page: NewLocalPage, prompt_version: &str) -> Result<LocalPage> {
        if self.fail_inserts {
            anyhow::bail!("simulated storage failure");
        }

        let mut state = self.state.lock().unwrap();
        if state.pages.iter().any(|p| p.slug == page.slug) {
            return Err(LocalPageError::SlugConflict(page.slug).into());
        }

        let page = page.into_draft(LocalPageId::new(), Utc::now());
        state.logs.push(LocalPageGenerationLog {
            id: GenerationLogId::new(),
            local_page_id: page.id,
            slug: page.slug.clone(),
            prompt_version: prompt_version.to_string(),
            status: GenerationStatus::from_flags(&page.safety_flags),
            similarity_score: 1.0 - page.uniqueness_score,
            safety_flags: page.safety_flags.clone(),
            created_at: page.created_at,
        });
        state.pages.push(page.clone());
        Ok(page)
    }

    async fn published_slug_taken(&self, slug: &str, except: LocalPageId) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .pages
            .iter()
            .any(|p| p.slug == slug && p.is_published() && p.id != except))
    }

    async fn set_status(&self, id: LocalPageId, status: LocalPageStatus) -> Result<Option<LocalPage>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.pages.iter_mut().find(|p| p.id == id).map(|page| {
            page.status = status;
            page.updated_at = Utc::now();
            page.clone()
        }))
    }

    async fn delete(&self, id: LocalPageId) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.pages.len();
        state.pages.retain(|p| p.id != id);
        let deleted = state.pages.len() < before;
        if deleted {
            state.logs.retain(|l| l.local_page_id != id);
        }
        Ok(deleted)
    }

    async fn list(&self, status: Option<LocalPageStatus>, limit: i64) -> Result<Vec<LocalPage>> {
        let state = self.state.lock().unwrap();
        let pages = state
            .pages
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned();
        Ok(Self::newest_first(pages)
            .into_iter()
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn existing_slugs(&self, slugs: &[String]) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(slugs
            .iter()
            .filter(|s| state.pages.iter().any(|p| &p.slug == *s))
            .cloned()
            .collect())
    }

    async fn logs_for_page(&self, id: LocalPageId) -> Result<Vec<LocalPageGenerationLog>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .logs
            .iter()
            .filter(|l| l.local_page_id == id)
            .cloned()
            .collect())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub store: Arc<InMemoryLocalPageStore>,
    pub keywords: Arc<KeywordCatalog>,
    pub generation: GenerationSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            store: Arc::new(InMemoryLocalPageStore::new()),
            keywords: Arc::new(KeywordCatalog::default()),
            generation: GenerationSettings::default(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set an in-memory store (e.g. one seeded with published pages)
    pub fn store(mut self, store: InMemoryLocalPageStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Convert into ServerDeps; bulk runs use no inter-row delay
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.ai.clone(),
            self.keywords.clone(),
            self.generation.clone(),
            Duration::ZERO,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
