// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for and how to interpret the answer lives in the domains.

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// AI Trait (Infrastructure - JSON-mode LLM completion)
// =============================================================================

/// One JSON-mode completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonCompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a system + user prompt pair, forcing a single JSON object
    /// response. Returns the raw JSON text; parse it in calling code.
    async fn complete_json(&self, request: JsonCompletionRequest) -> Result<String>;
}
