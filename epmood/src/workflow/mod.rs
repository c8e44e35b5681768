//! Episode mood workflow
//!
//! Five forward-only stages, each consuming the previous stage's output:
//! 1. **version_resolver**: episode ID → first version ID
//! 2. **record_resolver**: version ID → record IDs
//! 3. **link_resolver**: record IDs → external links (one lookup per record)
//! 4. **track_selector**: external links → Spotify track IDs
//! 5. **mood_aggregator**: track IDs → audio metrics → averaged mood
//!
//! Every collaborator call is awaited before the next one starts and is
//! bounded by the run's single [`Deadline`].

pub mod link_resolver;
pub mod mood_aggregator;
pub mod pipeline;
pub mod record_resolver;
pub mod track_selector;
pub mod version_resolver;

pub use link_resolver::resolve_links;
pub use mood_aggregator::aggregate_mood;
pub use pipeline::MoodPipeline;
pub use record_resolver::resolve_records;
pub use track_selector::select_tracks;
pub use version_resolver::resolve_version;

use crate::error::{PipelineError, Stage};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// End-to-end deadline shared by every collaborator call of one run
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// No deadline; calls are bounded only by the per-request HTTP timeout
    pub fn unbounded() -> Self {
        Self { at: None }
    }

    /// Await `call`, failing with `DeadlineExceeded` once the deadline passes
    pub async fn bound<F: Future>(&self, stage: Stage, call: F) -> Result<F::Output, PipelineError> {
        match self.at {
            Some(at) => tokio::time::timeout_at(at, call).await.map_err(|_| {
                tracing::warn!(stage = %stage, "Deadline exceeded");
                PipelineError::DeadlineExceeded { stage }
            }),
            None => Ok(call.await),
        }
    }
}
