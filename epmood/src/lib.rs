//! epmood library interface
//!
//! Resolves a broadcast episode to the averaged mood of the music it plays:
//! episode → version → records → external links → Spotify tracks → mood.

pub mod error;
pub mod models;
pub mod report;
pub mod services;
pub mod workflow;

pub use crate::error::{PipelineError, PipelineResult, ServiceError, Stage};
pub use crate::models::{MoodResult, MoodSummary};
pub use crate::workflow::{Deadline, MoodPipeline};
