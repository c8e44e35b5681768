//! Stage 2: version ID → record IDs

use super::Deadline;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::services::SegmentMapping;

/// Record IDs of a version's segments, in response order
///
/// Segments without a record (speech, jingles) are skipped. An empty result
/// is valid.
pub async fn resolve_records(
    segments: &dyn SegmentMapping,
    version_id: &str,
    deadline: &Deadline,
) -> PipelineResult<Vec<String>> {
    let response = deadline
        .bound(Stage::SegmentMapping, segments.lookup_segments(version_id))
        .await?
        .map_err(|e| PipelineError::transport(Stage::SegmentMapping, e))?;

    let total = response.segments.len();
    let record_ids: Vec<String> = response
        .segments
        .into_iter()
        .filter_map(|segment| segment.record_id)
        .collect();

    tracing::info!(
        version_id = %version_id,
        segments = total,
        records = record_ids.len(),
        "Resolved records"
    );

    Ok(record_ids)
}
