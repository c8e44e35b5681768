//! Stage 4: external links → Spotify track IDs

use crate::error::{PipelineError, PipelineResult};
use crate::models::ExternalLink;

/// Link type selected for mood aggregation (exact, case-sensitive)
pub const SPOTIFY_LINK_TYPE: &str = "SPOTIFY";

/// Track IDs of the Spotify links, in input order, duplicates kept
///
/// A Spotify link value must be `service:type:id`; the third segment is the
/// track ID. Values with fewer segments fail with `MalformedLink`.
pub fn select_tracks(links: &[ExternalLink]) -> PipelineResult<Vec<String>> {
    links
        .iter()
        .filter(|link| link.link_type == SPOTIFY_LINK_TYPE)
        .map(|link| {
            link.value
                .split(':')
                .nth(2)
                .map(str::to_string)
                .ok_or_else(|| PipelineError::MalformedLink(link.value.clone()))
        })
        .collect()
}
