//! iBL episode lookup client

use super::{http_client_builder, read_json, EpisodeLookup};
use crate::error::ServiceError;
use crate::models::EpisodeLookupResult;
use async_trait::async_trait;
use epmood_common::config::fill_template;

/// Query parameters passed through verbatim on every episode lookup
const EPISODE_QUERY: [(&str, &str); 2] = [("availability", "all"), ("mixin", "live")];

/// iBL API client
pub struct IblClient {
    http_client: reqwest::Client,
    url_template: String,
}

impl IblClient {
    pub fn new(url_template: impl Into<String>) -> epmood_common::Result<Self> {
        let http_client = http_client_builder().build().map_err(|e| {
            epmood_common::Error::Config(format!("Failed to build iBL client: {}", e))
        })?;

        Ok(Self::with_client(http_client, url_template))
    }

    pub fn with_client(http_client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            http_client,
            url_template: url_template.into(),
        }
    }
}

#[async_trait]
impl EpisodeLookup for IblClient {
    async fn lookup_episode(&self, episode_id: &str) -> Result<EpisodeLookupResult, ServiceError> {
        let url = fill_template(&self.url_template, episode_id);

        tracing::debug!(episode_id = %episode_id, url = %url, "Querying iBL");

        let response = self
            .http_client
            .get(&url)
            .query(&EPISODE_QUERY)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        let result: EpisodeLookupResult = read_json(response, episode_id).await?;

        tracing::info!(
            episode_id = %episode_id,
            episodes = result.episodes.len(),
            "Retrieved episode from iBL"
        );

        Ok(result)
    }
}
