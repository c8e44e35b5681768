//! Wire and domain types
//!
//! Response bodies of the four collaborators are modeled only as far as the
//! pipeline reads them; unknown fields are ignored.

use crate::error::Stage;
use serde::{Deserialize, Serialize};

// ============================================================================
// Episode lookup (iBL)
// ============================================================================

/// Episode lookup response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EpisodeLookupResult {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Episode {
    #[serde(default)]
    pub versions: Vec<Version>,
}

/// A renderable instance of an episode
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    pub id: String,
}

// ============================================================================
// Segment mapping (Playlister)
// ============================================================================

/// Segment mapping response for one version
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SegmentsResponse {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A timed segment of a version; non-music segments carry no record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Segment {
    #[serde(default)]
    pub record_id: Option<String>,
}

// ============================================================================
// Music metadata
// ============================================================================

/// Music metadata response for one record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecordResponse {
    #[serde(default)]
    pub data: RecordData,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecordData {
    #[serde(default, rename = "external-links")]
    pub external_links: Vec<ExternalLink>,
}

/// Typed pointer from a record into another system
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExternalLink {
    /// Link type tag, e.g. "SPOTIFY"
    #[serde(rename = "type")]
    pub link_type: String,
    /// Composite colon-delimited value, e.g. "spotify:track:<id>"
    pub value: String,
}

impl ExternalLink {
    pub fn new(link_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            link_type: link_type.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Streaming service (Spotify)
// ============================================================================

/// Client-credentials access token
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Audio features of one track
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioFeatures {
    /// Musical positiveness (0.0-1.0)
    pub valence: f32,
    /// Danceability score (0.0-1.0)
    pub danceability: f32,
    /// Perceived intensity (0.0-1.0)
    pub energy: f32,
    /// Presence of an audience (0.0-1.0)
    pub liveness: f32,
    /// Overall loudness in dB, typically -60 to 0
    pub loudness: f32,
}

/// Audio analysis of one track; only the track-level summary is read
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioAnalysis {
    pub track: AnalysisTrack,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisTrack {
    /// Estimated tempo in BPM
    pub tempo: f64,
}

// ============================================================================
// Mood
// ============================================================================

/// One track's derived mood
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodFactor {
    pub happiness: f32,
    pub chill_factor: f32,
}

impl MoodFactor {
    /// Derive the mood of one track
    ///
    /// Loudness is read from the features bundle; the analysis contributes
    /// only tempo.
    pub fn from_metrics(features: &AudioFeatures, analysis: &AudioAnalysis) -> Self {
        let happiness = 5.0
            * (features.valence - 0.5)
            * (features.danceability * features.energy * features.liveness);
        let chill_factor =
            (analysis.track.tempo as f32 / 120.0) * ((features.loudness + 30.0) / 30.0);

        Self {
            happiness,
            chill_factor,
        }
    }

    /// False when an out-of-range metric overflowed `f32`
    pub fn is_finite(&self) -> bool {
        self.happiness.is_finite() && self.chill_factor.is_finite()
    }
}

/// Aggregate mood of an episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodResult {
    #[serde(rename = "chillFactor")]
    pub chill_factor: f32,
    #[serde(rename = "happinessFactor")]
    pub happiness_factor: f32,
}

impl MoodResult {
    /// Arithmetic mean of the given factors; `None` when there are none
    pub fn average(factors: &[MoodFactor]) -> Option<Self> {
        if factors.is_empty() {
            return None;
        }

        let (total_happiness, total_chill) = factors
            .iter()
            .fold((0.0f32, 0.0f32), |(happiness, chill), factor| {
                (happiness + factor.happiness, chill + factor.chill_factor)
            });
        let count = factors.len() as f32;

        Some(Self {
            chill_factor: total_chill / count,
            happiness_factor: total_happiness / count,
        })
    }

    pub fn is_finite(&self) -> bool {
        self.chill_factor.is_finite() && self.happiness_factor.is_finite()
    }
}

/// A track excluded from aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFailure {
    pub track_id: String,
    pub stage: Stage,
    pub reason: String,
}

/// Outcome of a successful pipeline run
#[derive(Debug, Clone)]
pub struct MoodSummary {
    pub mood: MoodResult,
    /// Number of tracks the mood was averaged over
    pub tracks_aggregated: usize,
    pub failures: Vec<TrackFailure>,
}
