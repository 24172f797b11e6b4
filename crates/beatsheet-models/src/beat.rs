//! Beat models: the validated, durable output of segmentation.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Schema version stamped on every beat record.
pub const BEAT_SCHEMA_VERSION: &str = "beatsheet/1";

/// Source line range backing a beat (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BeatSource {
    pub line_start: usize,
    pub line_end: usize,
}

impl BeatSource {
    pub fn new(line_start: usize, line_end: usize) -> Self {
        Self {
            line_start,
            line_end,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_end.saturating_sub(self.line_start) + 1
    }

    /// Whether `next` starts exactly where this range ends.
    pub fn is_contiguous_with(&self, next: &BeatSource) -> bool {
        next.line_start == self.line_end + 1
    }

    /// Literal join of the narrable lines this range claims.
    ///
    /// Every beat's text is rebuilt through this function; model-echoed text
    /// is never consulted.
    pub fn slice_text(&self, lines: &[String]) -> String {
        let start = self.line_start.saturating_sub(1).min(lines.len());
        let end = self.line_end.min(lines.len());
        lines[start..end].join("\n")
    }
}

/// A validated narrative beat bound to an exact script slice.
///
/// Invariant after materialization: `text == source.slice_text(lines)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Beat {
    pub run_id: String,

    /// Zero-padded sequence id (`b001`, `b002`, ...). Assigned only at
    /// finalization; empty until then and must not be read earlier.
    pub beat_id: String,

    pub order: u32,

    /// Exact text of the claimed script slice
    pub text: String,

    /// Narrative intent from the model (validated for contamination)
    pub intent: String,

    pub estimated_seconds: f64,

    /// 1 = low, 2 = medium, 3 = high
    pub priority: u8,

    pub source: BeatSource,

    pub schema_version: String,

    pub created_at: DateTime<Utc>,
}

impl Beat {
    /// Create a beat with text rebuilt from the source range.
    pub fn from_source(
        run_id: impl Into<String>,
        order: u32,
        intent: impl Into<String>,
        priority: u8,
        source: BeatSource,
        lines: &[String],
    ) -> Self {
        Self {
            run_id: run_id.into(),
            beat_id: String::new(),
            order,
            text: source.slice_text(lines),
            intent: intent.into(),
            estimated_seconds: 0.0,
            priority,
            source,
            schema_version: BEAT_SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.source.line_count()
    }

    /// Serialize as a single JSONL line (no pretty printing).
    pub fn to_jsonl_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_slice_text_joins_range() {
        let lines = lines(&["First.", "Second.", "Third."]);
        let source = BeatSource::new(1, 2);
        assert_eq!(source.slice_text(&lines), "First.\nSecond.");
        assert_eq!(BeatSource::new(3, 3).slice_text(&lines), "Third.");
    }

    #[test]
    fn test_slice_text_clamps_out_of_bounds() {
        let lines = lines(&["Only."]);
        assert_eq!(BeatSource::new(1, 10).slice_text(&lines), "Only.");
        assert_eq!(BeatSource::new(5, 10).slice_text(&lines), "");
    }

    #[test]
    fn test_contiguity() {
        let a = BeatSource::new(1, 3);
        assert!(a.is_contiguous_with(&BeatSource::new(4, 6)));
        assert!(!a.is_contiguous_with(&BeatSource::new(5, 6)));
        assert!(!a.is_contiguous_with(&BeatSource::new(3, 6)));
    }

    #[test]
    fn test_from_source_rebuilds_text() {
        let lines = lines(&["One.", "Two."]);
        let beat = Beat::from_source("run-1", 1, "intro", 2, BeatSource::new(1, 2), &lines);
        assert_eq!(beat.text, "One.\nTwo.");
        assert!(beat.beat_id.is_empty());
        assert_eq!(beat.schema_version, BEAT_SCHEMA_VERSION);
    }

    #[test]
    fn test_jsonl_line_is_single_line() {
        let lines = lines(&["One."]);
        let beat = Beat::from_source("run-1", 1, "intro", 1, BeatSource::new(1, 1), &lines);
        let jsonl = beat.to_jsonl_line().unwrap();
        assert!(!jsonl.contains('\n'));
        assert!(jsonl.contains("\"beat_id\""));
    }
}
