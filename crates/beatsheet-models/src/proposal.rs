//! Untrusted range proposals returned by the segmentation model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single beat proposal from the segmentation model.
///
/// Everything here is untrusted: line numbers are chunk-relative until the
/// caller shifts them, ranges may invert or overlap, and counts may be off.
/// Integer fields are wide so out-of-bounds values survive parsing and reach
/// the clamping pass instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RangeProposal {
    #[schemars(range(min = 1))]
    pub order: i64,

    /// First line of the proposed range (1-based, inclusive)
    #[schemars(range(min = 1))]
    pub line_start: i64,

    /// Last line of the proposed range (1-based, inclusive)
    #[schemars(range(min = 1))]
    pub line_end: i64,

    /// Narrative intent of the beat; must stay free of visual direction
    #[schemars(length(min = 3))]
    pub intent: String,

    #[schemars(range(min = 1.0, max = 12.0))]
    pub estimated_seconds: f64,

    /// 1 = low, 2 = medium, 3 = high
    #[schemars(range(min = 1, max = 3))]
    pub priority: i64,
}

/// Envelope for the model's segmentation response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SegmentationResponse {
    pub beats: Vec<RangeProposal>,
}
