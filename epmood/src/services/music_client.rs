//! Music metadata client
//!
//! The music metadata service only accepts mutually authenticated TLS: every
//! request presents the configured client certificate.

use super::{http_client_builder, read_json, MusicMetadata};
use crate::error::ServiceError;
use crate::models::RecordResponse;
use async_trait::async_trait;
use epmood_common::config::fill_template;
use epmood_common::{Error, ServiceConfig};
use std::path::Path;

/// Music metadata API client
pub struct MusicClient {
    http_client: reqwest::Client,
    url_template: String,
}

impl MusicClient {
    /// Build a client presenting the configured certificate and key
    pub fn new(config: &ServiceConfig) -> epmood_common::Result<Self> {
        let mut pem = read_pem(&config.cert_file)?;
        pem.push(b'\n');
        pem.extend(read_pem(&config.key_file)?);

        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| Error::Config(format!("Invalid client certificate or key: {}", e)))?;

        if config.insecure_skip_verify {
            tracing::warn!("Server certificate verification disabled for music metadata");
        }

        let http_client = http_client_builder()
            .identity(identity)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build music client: {}", e)))?;

        Ok(Self::with_client(http_client, config.music_url.clone()))
    }

    pub fn with_client(http_client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            http_client,
            url_template: url_template.into(),
        }
    }
}

fn read_pem(path: &Path) -> epmood_common::Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

#[async_trait]
impl MusicMetadata for MusicClient {
    async fn lookup_record(&self, record_id: &str) -> Result<RecordResponse, ServiceError> {
        let url = fill_template(&self.url_template, record_id);

        tracing::debug!(record_id = %record_id, url = %url, "Querying music metadata");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        let record: RecordResponse = read_json(response, record_id).await?;

        tracing::debug!(
            record_id = %record_id,
            links = record.data.external_links.len(),
            "Retrieved external links"
        );

        Ok(record)
    }
}
