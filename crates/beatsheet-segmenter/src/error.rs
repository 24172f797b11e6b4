//! Segmenter error types.

use thiserror::Error;

use beatsheet_llm::LlmError;

pub type SegmenterResult<T> = Result<T, SegmenterError>;

#[derive(Debug, Error)]
pub enum SegmenterError {
    #[error("Script contains no narrable content")]
    EmptyScript,

    /// The script leaked staging language into narrative channels; must be
    /// fixed upstream, never silently stripped here.
    #[error("Visual contamination score {count} exceeds threshold {threshold}")]
    ContaminationExceeded {
        count: usize,
        threshold: usize,
        warnings: Vec<String>,
    },

    #[error("Beat count {count} outside accepted range [{min}, {max}]")]
    CountOutOfRange {
        count: usize,
        min: usize,
        max: usize,
        warnings: Vec<String>,
    },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SegmenterError {
    /// Warning log carried by acceptance-gate failures.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::ContaminationExceeded { warnings, .. }
            | Self::CountOutOfRange { warnings, .. } => warnings,
            _ => &[],
        }
    }
}
