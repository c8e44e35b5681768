//! Pipeline orchestrator
//!
//! Chains the five stages for one episode. The pipeline never prints or
//! exits; callers turn its result into output (see [`crate::report`]).

use super::{
    aggregate_mood, resolve_links, resolve_records, resolve_version, select_tracks, Deadline,
};
use crate::error::PipelineResult;
use crate::models::MoodSummary;
use crate::services::{
    EpisodeLookup, IblClient, MusicClient, MusicMetadata, PlaylisterClient, SegmentMapping,
    SpotifyClient, StreamingAudio,
};
use epmood_common::ServiceConfig;

/// The four collaborators of a mood run
pub struct MoodPipeline {
    episodes: Box<dyn EpisodeLookup>,
    segments: Box<dyn SegmentMapping>,
    music: Box<dyn MusicMetadata>,
    streaming: Box<dyn StreamingAudio>,
}

impl MoodPipeline {
    pub fn new(
        episodes: Box<dyn EpisodeLookup>,
        segments: Box<dyn SegmentMapping>,
        music: Box<dyn MusicMetadata>,
        streaming: Box<dyn StreamingAudio>,
    ) -> Self {
        Self {
            episodes,
            segments,
            music,
            streaming,
        }
    }

    /// Build the HTTP clients described by `config`
    ///
    /// Fails when the client certificate or key cannot be loaded.
    pub fn from_config(config: &ServiceConfig) -> epmood_common::Result<Self> {
        Ok(Self::new(
            Box::new(IblClient::new(config.ibl_url.clone())?),
            Box::new(PlaylisterClient::new(config.playlister_url.clone())?),
            Box::new(MusicClient::new(config)?),
            Box::new(SpotifyClient::new(config)?),
        ))
    }

    /// Resolve `episode_id` to its averaged mood
    pub async fn run(&self, episode_id: &str, deadline: Deadline) -> PipelineResult<MoodSummary> {
        tracing::info!(episode_id = %episode_id, "Starting mood run");

        let version_id = resolve_version(self.episodes.as_ref(), episode_id, &deadline).await?;
        let record_ids = resolve_records(self.segments.as_ref(), &version_id, &deadline).await?;
        let links = resolve_links(self.music.as_ref(), &record_ids, &deadline).await?;
        let track_ids = select_tracks(&links)?;

        tracing::info!(
            episode_id = %episode_id,
            tracks = track_ids.len(),
            "Selected Spotify tracks"
        );

        aggregate_mood(self.streaming.as_ref(), &track_ids, &deadline).await
    }
}
