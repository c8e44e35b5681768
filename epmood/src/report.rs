//! Process output boundary
//!
//! Turns a pipeline result into the single JSON line written to stdout and
//! the process exit status.

use crate::error::PipelineResult;
use crate::models::MoodSummary;
use serde_json::json;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Message reported when the episode ID argument is missing or repeated
pub const USAGE_ERROR: &str = "Invalid number of arguments";

/// What the process prints and how it exits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub line: String,
    pub exit_code: u8,
}

impl Report {
    /// `{"error": "<message>"}` with a failing exit status
    pub fn error(message: &str) -> Self {
        Self {
            line: json!({ "error": message }).to_string(),
            exit_code: EXIT_FAILURE,
        }
    }

    pub fn usage() -> Self {
        Self::error(USAGE_ERROR)
    }

    pub fn from_result(result: &PipelineResult<MoodSummary>) -> Self {
        match result {
            Ok(summary) => match serde_json::to_string(&summary.mood) {
                Ok(line) => Self {
                    line,
                    exit_code: EXIT_SUCCESS,
                },
                Err(e) => Self::error(&e.to_string()),
            },
            Err(e) => Self::error(&e.to_string()),
        }
    }
}
