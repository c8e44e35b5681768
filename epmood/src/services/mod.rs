//! Collaborator clients
//!
//! Each downstream service is reached through a trait so the workflow can be
//! exercised against in-memory fakes. The HTTP implementations live in the
//! submodules.

pub mod ibl_client;
pub mod music_client;
pub mod playlister_client;
pub mod spotify_client;

#[cfg(test)]
pub(crate) mod fakes;

pub use ibl_client::IblClient;
pub use music_client::MusicClient;
pub use playlister_client::PlaylisterClient;
pub use spotify_client::SpotifyClient;

use crate::error::ServiceError;
use crate::models::{
    AccessToken, AudioAnalysis, AudioFeatures, EpisodeLookupResult, RecordResponse,
    SegmentsResponse,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("epmood/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Episode → versions lookup
#[async_trait]
pub trait EpisodeLookup: Send + Sync {
    async fn lookup_episode(&self, episode_id: &str) -> Result<EpisodeLookupResult, ServiceError>;
}

/// Version → segments lookup
#[async_trait]
pub trait SegmentMapping: Send + Sync {
    async fn lookup_segments(&self, version_id: &str) -> Result<SegmentsResponse, ServiceError>;
}

/// Record → external links lookup
#[async_trait]
pub trait MusicMetadata: Send + Sync {
    async fn lookup_record(&self, record_id: &str) -> Result<RecordResponse, ServiceError>;
}

/// Streaming service: one token per run, then per-track metrics
#[async_trait]
pub trait StreamingAudio: Send + Sync {
    async fn request_token(&self) -> Result<AccessToken, ServiceError>;

    async fn audio_features(
        &self,
        token: &AccessToken,
        track_id: &str,
    ) -> Result<AudioFeatures, ServiceError>;

    async fn audio_analysis(
        &self,
        token: &AccessToken,
        track_id: &str,
    ) -> Result<AudioAnalysis, ServiceError>;
}

/// Builder with the settings shared by every client
pub(crate) fn http_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
}

/// Map status codes and decode a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    id: &str,
) -> Result<T, ServiceError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound(id.to_string()));
    }

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ServiceError::ApiError(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ServiceError::ParseError(e.to_string()))
}
