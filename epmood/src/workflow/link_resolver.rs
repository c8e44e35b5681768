//! Stage 3: record IDs → external links

use super::Deadline;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::ExternalLink;
use crate::services::MusicMetadata;
use futures::{stream, StreamExt, TryStreamExt};

/// External links of every record, concatenated in record order
///
/// Records are looked up one at a time; the first failing lookup aborts.
pub async fn resolve_links(
    music: &dyn MusicMetadata,
    record_ids: &[String],
    deadline: &Deadline,
) -> PipelineResult<Vec<ExternalLink>> {
    let links: Vec<ExternalLink> = stream::iter(record_ids)
        .then(|record_id| links_for_record(music, record_id, deadline))
        .try_concat()
        .await?;

    tracing::info!(
        records = record_ids.len(),
        links = links.len(),
        "Resolved external links"
    );

    Ok(links)
}

async fn links_for_record(
    music: &dyn MusicMetadata,
    record_id: &str,
    deadline: &Deadline,
) -> PipelineResult<Vec<ExternalLink>> {
    let record = deadline
        .bound(Stage::MusicMetadata, music.lookup_record(record_id))
        .await?
        .map_err(|e| PipelineError::transport(Stage::MusicMetadata, e))?;

    Ok(record.data.external_links)
}
