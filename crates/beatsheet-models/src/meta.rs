//! Beat-sheet metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for a finished beat sheet.
///
/// Observability only: nothing here feeds back into acceptance logic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BeatSheetMeta {
    pub total_beats: usize,

    pub avg_estimated_seconds: f64,

    /// Accepted beat-count bounds the run was validated against
    pub min_beats: usize,
    pub max_beats: usize,

    /// Non-fatal diagnostics accumulated by every pass, in order
    pub warnings: Vec<String>,

    pub visual_contamination_count: usize,

    /// Narrable line count after normalization
    pub normalized_line_count: usize,

    pub word_count: usize,

    pub estimated_duration_s: f64,

    /// Beat count the total duration would suggest; diagnostic only
    pub target_beats: usize,

    pub structural_markers_count: usize,

    /// Where the markers artifact was written, if artifacts are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_markers_path: Option<String>,
}
