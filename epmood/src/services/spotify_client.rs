//! Spotify Web API client
//!
//! Covers the three calls the mood aggregation needs:
//! - client-credentials token exchange
//! - `audio-features/{id}`
//! - `audio-analysis/{id}`

use super::{http_client_builder, read_json, StreamingAudio};
use crate::error::ServiceError;
use crate::models::{AccessToken, AudioAnalysis, AudioFeatures};
use async_trait::async_trait;
use epmood_common::config::encode_path_segment;
use epmood_common::{ServiceConfig, SpotifyCredentials};

/// Spotify API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    credentials: SpotifyCredentials,
    token_url: String,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(config: &ServiceConfig) -> epmood_common::Result<Self> {
        let http_client = http_client_builder().build().map_err(|e| {
            epmood_common::Error::Config(format!("Failed to build Spotify client: {}", e))
        })?;

        Ok(Self::with_client(
            http_client,
            config.spotify.clone(),
            config.spotify_token_url.clone(),
            config.spotify_api_url.clone(),
        ))
    }

    pub fn with_client(
        http_client: reqwest::Client,
        credentials: SpotifyCredentials,
        token_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            credentials,
            token_url: token_url.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_track_resource<T: serde::de::DeserializeOwned>(
        &self,
        token: &AccessToken,
        resource: &str,
        track_id: &str,
    ) -> Result<T, ServiceError> {
        let url = format!(
            "{}/{}/{}",
            self.api_url,
            resource,
            encode_path_segment(track_id)
        );

        tracing::debug!(track_id = %track_id, url = %url, "Querying Spotify");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        read_json(response, track_id).await
    }
}

#[async_trait]
impl StreamingAudio for SpotifyClient {
    async fn request_token(&self) -> Result<AccessToken, ServiceError> {
        tracing::debug!(url = %self.token_url, "Requesting Spotify client-credentials token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        let token: AccessToken = read_json(response, "token").await?;

        tracing::info!(expires_in = token.expires_in, "Obtained Spotify access token");

        Ok(token)
    }

    async fn audio_features(
        &self,
        token: &AccessToken,
        track_id: &str,
    ) -> Result<AudioFeatures, ServiceError> {
        self.get_track_resource(token, "audio-features", track_id)
            .await
    }

    async fn audio_analysis(
        &self,
        token: &AccessToken,
        track_id: &str,
    ) -> Result<AudioAnalysis, ServiceError> {
        self.get_track_resource(token, "audio-analysis", track_id)
            .await
    }
}
