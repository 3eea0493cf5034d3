use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CityContextId;

/// Curated per-city or per-zip notes, maintained outside the generation flow.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LocalCityContext {
    pub id: CityContextId,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub local_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LocalCityContext {
    pub async fn find_by_city_state(city: &str, state: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM local_city_contexts
            WHERE lower(city) = lower($1) AND lower(state) = lower($2)
            LIMIT 1
            "#,
        )
        .bind(city)
        .bind(state)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_zip(zip: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM local_city_contexts WHERE zip = $1 LIMIT 1")
            .bind(zip)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
