//! Word counting, duration estimation, and dynamic beat-count bounds.

use tracing::debug;

use crate::config::SegmenterConfig;

/// Count words after stripping markdown heading/emphasis characters.
pub fn clean_word_count(text: &str) -> usize {
    text.replace(['#', '*'], "").split_whitespace().count()
}

/// Estimate spoken seconds for text at the configured narration rate.
///
/// Floors at 1.0 s so tiny fragments still occupy a beat slot.
pub fn estimate_seconds(text: &str, words_per_second: f64) -> f64 {
    let words = clean_word_count(text) as f64;
    (words / words_per_second).max(1.0)
}

/// Dynamic `[min, max]` beat-count bounds for a body of text.
///
/// Duration is estimated from word count and divided by the target seconds
/// per beat; the floor relaxes to 40% of target so the model may group
/// ideas, the ceiling stretches to 150% and never drops below the configured
/// default maximum. Strict duration limits are enforced later by the repair
/// pipeline.
pub fn dynamic_limits(text: &str, config: &SegmenterConfig) -> (usize, usize) {
    let words = clean_word_count(text);
    let estimated_duration = words as f64 / config.words_per_second;
    let target = ((estimated_duration / config.target_beat_seconds) as usize).max(1);

    let min_beats = ((target as f64 * 0.4) as usize).max(1);
    let max_beats = ((target as f64 * 1.5) as usize).max(config.max_beats_default);

    debug!(
        words,
        estimated_duration, target, min_beats, max_beats, "Dynamic beat sizing"
    );

    (min_beats, max_beats)
}
