// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};

use super::{BaseAI, JsonCompletionRequest};

/// OpenAI implementation of AI capabilities.
///
/// Built without a key when `OPENAI_API_KEY` is unset, so the server can
/// still start; every completion then fails with a configuration error.
#[derive(Clone)]
pub struct OpenAIAdapter {
    client: Option<OpenAIClient>,
}

impl OpenAIAdapter {
    pub fn new(api_key: Option<String>, base_url: Option<String>, timeout: Duration) -> Self {
        let client = api_key.filter(|k| !k.trim().is_empty()).map(|key| {
            let client = OpenAIClient::new(key).with_timeout(timeout);
            match base_url {
                Some(url) => client.with_base_url(url),
                None => client,
            }
        });
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn complete_json(&self, request: JsonCompletionRequest) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| OpenAIError::Config("OPENAI_API_KEY not configured".into()))?;

        tracing::info!(
            model = %request.model,
            temperature = request.temperature,
            prompt_length = request.system_prompt.len() + request.user_prompt.len(),
            "Calling OpenAI API"
        );

        let response = client
            .chat_completion(
                ChatRequest::new(request.model.clone())
                    .message(Message::system(request.system_prompt))
                    .message(Message::user(request.user_prompt))
                    .temperature(request.temperature)
                    .top_p(request.top_p)
                    .json_object(),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %request.model, "OpenAI API call failed");
                e
            })?;

        tracing::info!(
            response_length = response.content.len(),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "OpenAI API response received"
        );

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JsonCompletionRequest {
        JsonCompletionRequest {
            model: "gpt-4o-mini".into(),
            system_prompt: "system".into(),
            user_prompt: "user".into(),
            temperature: 0.8,
            top_p: 0.9,
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let adapter = OpenAIAdapter::new(None, None, Duration::from_secs(1));
        assert!(!adapter.is_configured());

        let err = adapter.complete_json(request()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<OpenAIError>(), Some(OpenAIError::Config(_))));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let adapter = OpenAIAdapter::new(Some("  ".into()), None, Duration::from_secs(1));
        assert!(!adapter.is_configured());
    }
}
