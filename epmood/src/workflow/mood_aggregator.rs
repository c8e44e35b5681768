//! Stage 5: track IDs → audio metrics → averaged mood
//!
//! One access token is requested per run and reused for every track. Tracks
//! are fetched one at a time, features first, then analysis. A track whose
//! fetch fails, or whose metrics overflow to a non-finite mood, is excluded
//! and recorded as a [`TrackFailure`]; the run only fails when no track is
//! left to average over or the average itself is not finite.

use super::Deadline;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::{AccessToken, MoodFactor, MoodResult, MoodSummary, TrackFailure};
use crate::services::StreamingAudio;
use futures::{stream, StreamExt, TryStreamExt};

/// Failure reason for a track whose metrics overflow the mood arithmetic
pub const NON_FINITE_MOOD: &str = "non-finite mood";

/// Average mood over every track whose metrics could be fetched
pub async fn aggregate_mood(
    streaming: &dyn StreamingAudio,
    track_ids: &[String],
    deadline: &Deadline,
) -> PipelineResult<MoodSummary> {
    if track_ids.is_empty() {
        tracing::info!("No Spotify tracks to aggregate");
        return Err(PipelineError::NoMoodData);
    }

    let token = deadline
        .bound(Stage::StreamingAuth, streaming.request_token())
        .await?
        .map_err(|e| PipelineError::AuthFailure(e.to_string()))?;

    let outcomes: Vec<Result<MoodFactor, TrackFailure>> = stream::iter(track_ids)
        .then(|track_id| track_mood(streaming, &token, track_id, deadline))
        .try_collect()
        .await?;

    let factors: Vec<MoodFactor> = outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok().copied())
        .collect();
    let failures: Vec<TrackFailure> = outcomes.into_iter().filter_map(Result::err).collect();

    let Some(mood) = MoodResult::average(&factors) else {
        tracing::warn!(failed = failures.len(), "Metrics unavailable for every track");
        return Err(PipelineError::NoMoodData);
    };
    if !mood.is_finite() {
        tracing::warn!(tracks = factors.len(), "Average mood is not finite");
        return Err(PipelineError::NoMoodData);
    }

    tracing::info!(
        tracks = factors.len(),
        excluded = failures.len(),
        happiness = mood.happiness_factor,
        chill = mood.chill_factor,
        "Aggregated mood"
    );

    Ok(MoodSummary {
        mood,
        tracks_aggregated: factors.len(),
        failures,
    })
}

/// Mood of one track; the outer error is reserved for the run deadline
async fn track_mood(
    streaming: &dyn StreamingAudio,
    token: &AccessToken,
    track_id: &str,
    deadline: &Deadline,
) -> PipelineResult<Result<MoodFactor, TrackFailure>> {
    let features = match deadline
        .bound(Stage::AudioFeatures, streaming.audio_features(token, track_id))
        .await?
    {
        Ok(features) => features,
        Err(e) => return Ok(Err(excluded(track_id, Stage::AudioFeatures, e))),
    };

    let analysis = match deadline
        .bound(Stage::AudioAnalysis, streaming.audio_analysis(token, track_id))
        .await?
    {
        Ok(analysis) => analysis,
        Err(e) => return Ok(Err(excluded(track_id, Stage::AudioAnalysis, e))),
    };

    let factor = MoodFactor::from_metrics(&features, &analysis);
    if !factor.is_finite() {
        return Ok(Err(excluded(track_id, Stage::AudioAnalysis, NON_FINITE_MOOD)));
    }

    Ok(Ok(factor))
}

fn excluded(track_id: &str, stage: Stage, reason: impl ToString) -> TrackFailure {
    let reason = reason.to_string();
    tracing::warn!(track_id = %track_id, stage = %stage, reason = %reason, "Excluding track");

    TrackFailure {
        track_id: track_id.to_string(),
        stage,
        reason,
    }
}
