//! In-memory collaborators for workflow tests

use super::{EpisodeLookup, MusicMetadata, SegmentMapping, StreamingAudio};
use crate::error::ServiceError;
use crate::models::{
    AccessToken, AnalysisTrack, AudioAnalysis, AudioFeatures, Episode, EpisodeLookupResult,
    ExternalLink, RecordData, RecordResponse, Segment, SegmentsResponse, Version,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeEpisodes(pub Result<EpisodeLookupResult, ServiceError>);

impl FakeEpisodes {
    /// One episode per entry, each holding the given version IDs
    pub fn with_versions(episodes: &[&[&str]]) -> Self {
        let episodes = episodes
            .iter()
            .map(|versions| Episode {
                versions: versions
                    .iter()
                    .map(|id| Version { id: id.to_string() })
                    .collect(),
            })
            .collect();
        Self(Ok(EpisodeLookupResult { episodes }))
    }
}

#[async_trait]
impl EpisodeLookup for FakeEpisodes {
    async fn lookup_episode(&self, _episode_id: &str) -> Result<EpisodeLookupResult, ServiceError> {
        self.0.clone()
    }
}

pub struct FakeSegments(pub Result<SegmentsResponse, ServiceError>);

impl FakeSegments {
    pub fn with_records(records: &[Option<&str>]) -> Self {
        let segments = records
            .iter()
            .map(|record| Segment {
                record_id: record.map(str::to_string),
            })
            .collect();
        Self(Ok(SegmentsResponse { segments }))
    }
}

#[async_trait]
impl SegmentMapping for FakeSegments {
    async fn lookup_segments(&self, _version_id: &str) -> Result<SegmentsResponse, ServiceError> {
        self.0.clone()
    }
}

/// Serves links per record ID and remembers the order of lookups
#[derive(Default)]
pub struct FakeRecords {
    pub links: HashMap<String, Vec<ExternalLink>>,
    pub failing: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRecords {
    pub fn with(mut self, record_id: &str, links: Vec<ExternalLink>) -> Self {
        self.links.insert(record_id.to_string(), links);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MusicMetadata for FakeRecords {
    async fn lookup_record(&self, record_id: &str) -> Result<RecordResponse, ServiceError> {
        self.calls.lock().unwrap().push(record_id.to_string());

        if self.failing.as_deref() == Some(record_id) {
            return Err(ServiceError::ApiError(503, "unavailable".to_string()));
        }

        Ok(RecordResponse {
            data: RecordData {
                external_links: self.links.get(record_id).cloned().unwrap_or_default(),
            },
        })
    }
}

/// Streaming service serving fixed metrics; unknown tracks answer 404
pub struct FakeStreaming {
    pub token: Result<AccessToken, ServiceError>,
    pub features: HashMap<String, AudioFeatures>,
    pub analysis: HashMap<String, AudioAnalysis>,
    pub token_requests: AtomicUsize,
    /// Delay applied to every per-track call
    pub delay: Option<Duration>,
}

impl Default for FakeStreaming {
    fn default() -> Self {
        Self {
            token: Ok(AccessToken {
                access_token: "token".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            }),
            features: HashMap::new(),
            analysis: HashMap::new(),
            token_requests: AtomicUsize::new(0),
            delay: None,
        }
    }
}

impl FakeStreaming {
    /// Register a track with both bundles
    pub fn with_track(
        mut self,
        track_id: &str,
        [valence, danceability, energy, liveness, loudness]: [f32; 5],
        tempo: f64,
    ) -> Self {
        self.features.insert(
            track_id.to_string(),
            AudioFeatures {
                valence,
                danceability,
                energy,
                liveness,
                loudness,
            },
        );
        self.analysis.insert(
            track_id.to_string(),
            AudioAnalysis {
                track: AnalysisTrack { tempo },
            },
        );
        self
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl StreamingAudio for FakeStreaming {
    async fn request_token(&self) -> Result<AccessToken, ServiceError> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        self.token.clone()
    }

    async fn audio_features(
        &self,
        _token: &AccessToken,
        track_id: &str,
    ) -> Result<AudioFeatures, ServiceError> {
        self.pause().await;
        self.features
            .get(track_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(track_id.to_string()))
    }

    async fn audio_analysis(
        &self,
        _token: &AccessToken,
        track_id: &str,
    ) -> Result<AudioAnalysis, ServiceError> {
        self.pause().await;
        self.analysis
            .get(track_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(track_id.to_string()))
    }
}
