//! Error types for epmood
//!
//! `ServiceError` is what a collaborator client reports; `PipelineError` is
//! what the pipeline reports to its caller. The workflow stages decide how
//! one maps onto the other.

use thiserror::Error;

/// The collaborator call a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EpisodeLookup,
    SegmentMapping,
    MusicMetadata,
    StreamingAuth,
    AudioFeatures,
    AudioAnalysis,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::EpisodeLookup => "Episode Information",
            Stage::SegmentMapping => "Record IDs",
            Stage::MusicMetadata => "External Links",
            Stage::StreamingAuth => "Spotify token",
            Stage::AudioFeatures => "Audio Features",
            Stage::AudioAnalysis => "Audio Analysis",
        };
        f.write_str(name)
    }
}

/// Collaborator client errors
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Network communication error (includes per-request timeouts)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Collaborator answered 404 for the given ID
    #[error("Not found: {0}")]
    NotFound(String),

    /// Collaborator returned a non-success status
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Failed to parse response JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Pipeline errors; every variant is terminal for a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Episode not found")]
    NotFound,

    #[error("No Version available")]
    NoVersion,

    #[error("Failed to get {stage}: {message}")]
    TransportFailure { stage: Stage, message: String },

    #[error("Malformed external link: {0}")]
    MalformedLink(String),

    #[error("couldn't get token: {0}")]
    AuthFailure(String),

    #[error("No mood data available")]
    NoMoodData,

    #[error("Deadline exceeded while getting {stage}")]
    DeadlineExceeded { stage: Stage },

    #[error(transparent)]
    Config(#[from] epmood_common::Error),
}

impl PipelineError {
    pub(crate) fn transport(stage: Stage, err: ServiceError) -> Self {
        PipelineError::TransportFailure {
            stage,
            message: err.to_string(),
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
