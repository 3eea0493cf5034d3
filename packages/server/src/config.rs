use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Generation requests fail with a missing-credential error when unset.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub generation_timeout: Duration,
    pub bulk_delay: Duration,
    pub business_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            generation_timeout: Duration::from_secs(
                env::var("GENERATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "90".to_string())
                    .parse()
                    .context("GENERATION_TIMEOUT_SECS must be a valid number")?,
            ),
            bulk_delay: Duration::from_millis(
                env::var("BULK_DELAY_MS")
                    .unwrap_or_else(|_| "1500".to_string())
                    .parse()
                    .context("BULK_DELAY_MS must be a valid number")?,
            ),
            business_name: env::var("BUSINESS_NAME")
                .unwrap_or_else(|_| "Shield Hood Services".to_string()),
        })
    }
}
