//! Playlister segment mapping client

use super::{http_client_builder, read_json, SegmentMapping};
use crate::error::ServiceError;
use crate::models::SegmentsResponse;
use async_trait::async_trait;
use epmood_common::config::fill_template;

/// Playlister API client
pub struct PlaylisterClient {
    http_client: reqwest::Client,
    url_template: String,
}

impl PlaylisterClient {
    pub fn new(url_template: impl Into<String>) -> epmood_common::Result<Self> {
        let http_client = http_client_builder().build().map_err(|e| {
            epmood_common::Error::Config(format!("Failed to build Playlister client: {}", e))
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
impl SegmentMapping for PlaylisterClient {
    async fn lookup_segments(&self, version_id: &str) -> Result<SegmentsResponse, ServiceError> {
        let url = fill_template(&self.url_template, version_id);

        tracing::debug!(version_id = %version_id, url = %url, "Querying Playlister");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        let segments: SegmentsResponse = read_json(response, version_id).await?;

        tracing::info!(
            version_id = %version_id,
            segments = segments.segments.len(),
            "Retrieved segments from Playlister"
        );

        Ok(segments)
    }
}
