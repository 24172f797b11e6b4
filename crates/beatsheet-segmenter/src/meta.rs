//! Beat-sheet metadata aggregation.

use beatsheet_models::{Beat, BeatSheetMeta};

use crate::config::SegmenterConfig;
use crate::repair::RepairReport;

/// Summarize an accepted beat list.
///
/// Pure function over the final beats; the derived target count is
/// observability only and never feeds back into acceptance logic.
#[allow(clippy::too_many_arguments)]
pub fn aggregate_meta(
    beats: &[Beat],
    min_beats: usize,
    max_beats: usize,
    normalized_line_count: usize,
    markers_count: usize,
    markers_path: Option<String>,
    report: RepairReport,
    config: &SegmenterConfig,
) -> BeatSheetMeta {
    let estimated_duration: f64 = beats.iter().map(|b| b.estimated_seconds).sum();
    let avg = if beats.is_empty() {
        0.0
    } else {
        estimated_duration / beats.len() as f64
    };
    let target_beats = if config.target_beat_seconds > 0.0 {
        (estimated_duration / config.target_beat_seconds) as usize
    } else {
        0
    };

    BeatSheetMeta {
        total_beats: beats.len(),
        avg_estimated_seconds: round2(avg),
        min_beats,
        max_beats,
        warnings: report.warnings,
        visual_contamination_count: report.contamination_count,
        normalized_line_count,
        word_count: report.word_count,
        estimated_duration_s: round2(estimated_duration),
        target_beats,
        structural_markers_count: markers_count,
        structural_markers_path: markers_path,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
