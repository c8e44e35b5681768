//! Stage 1: episode ID → version ID

use super::Deadline;
use crate::error::{PipelineError, PipelineResult, ServiceError, Stage};
use crate::services::EpisodeLookup;

/// Resolve the first version of the first episode
///
/// No "latest" or "preferred" selection is attempted.
pub async fn resolve_version(
    episodes: &dyn EpisodeLookup,
    episode_id: &str,
    deadline: &Deadline,
) -> PipelineResult<String> {
    let lookup = deadline
        .bound(Stage::EpisodeLookup, episodes.lookup_episode(episode_id))
        .await?
        .map_err(|e| match e {
            ServiceError::NotFound(_) => PipelineError::NotFound,
            other => PipelineError::transport(Stage::EpisodeLookup, other),
        })?;

    let episode = lookup
        .episodes
        .into_iter()
        .next()
        .ok_or(PipelineError::NotFound)?;
    let version = episode
        .versions
        .into_iter()
        .next()
        .ok_or(PipelineError::NoVersion)?;

    tracing::info!(episode_id = %episode_id, version_id = %version.id, "Resolved version");

    Ok(version.id)
}
