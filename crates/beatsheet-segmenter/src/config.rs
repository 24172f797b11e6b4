//! Segmenter configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Segmenter configuration.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Model requested for segmentation calls
    pub model: String,
    /// Floor for the dynamic beat-count ceiling on short scripts
    pub max_beats_default: usize,
    /// Target spoken seconds per beat
    pub target_beat_seconds: f64,
    /// Narration rate used for every duration estimate
    pub words_per_second: f64,
    /// Aggregate contamination score above which a run fails
    pub contamination_threshold: usize,
    /// Hard word ceiling per chunk
    pub chunk_target_words: usize,
    /// Fraction of the word ceiling after which a structural-marker boundary
    /// closes a chunk early
    pub chunk_soft_ratio: f64,
    /// Beats shorter than this duration are merged into their successor
    pub min_beat_seconds: f64,
    /// Beats shorter than this character count are merged into their successor
    pub min_beat_chars: usize,
    /// Beats longer than this duration are split by line range
    pub split_threshold_seconds: f64,
    /// Absolute ceiling on reported beat durations
    pub duration_ceiling_seconds: f64,
    /// Response budget for segmentation calls
    pub llm_max_tokens: u32,
    /// Timeout per segmentation call
    pub llm_timeout: Duration,
    /// Root directory for run artifacts; None disables artifact writes
    pub work_dir: Option<PathBuf>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_beats_default: 18,
            target_beat_seconds: 4.0,
            words_per_second: 2.8,
            contamination_threshold: 30,
            chunk_target_words: 450,
            chunk_soft_ratio: 0.6,
            min_beat_seconds: 1.5,
            min_beat_chars: 40,
            split_threshold_seconds: 7.0,
            duration_ceiling_seconds: 12.0,
            llm_max_tokens: 12_000,
            llm_timeout: Duration::from_secs(600),
            work_dir: Some(PathBuf::from("runs")),
        }
    }
}

impl SegmenterConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            model: std::env::var("SEGMENTER_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            max_beats_default: std::env::var("SEGMENTER_MAX_BEATS_DEFAULT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(18),
            target_beat_seconds: std::env::var("SEGMENTER_TARGET_BEAT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4.0),
            words_per_second: std::env::var("SEGMENTER_WORDS_PER_SECOND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2.8),
            contamination_threshold: std::env::var("SEGMENTER_CONTAMINATION_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            chunk_target_words: std::env::var("SEGMENTER_CHUNK_TARGET_WORDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(450),
            chunk_soft_ratio: std::env::var("SEGMENTER_CHUNK_SOFT_RATIO")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.6),
            min_beat_seconds: std::env::var("SEGMENTER_MIN_BEAT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.5),
            min_beat_chars: std::env::var("SEGMENTER_MIN_BEAT_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(40),
            split_threshold_seconds: std::env::var("SEGMENTER_SPLIT_THRESHOLD_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7.0),
            duration_ceiling_seconds: std::env::var("SEGMENTER_DURATION_CEILING_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(12.0),
            llm_max_tokens: std::env::var("SEGMENTER_LLM_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(12_000),
            llm_timeout: Duration::from_secs(
                std::env::var("SEGMENTER_LLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            work_dir: std::env::var("SEGMENTER_WORK_DIR")
                .ok()
                .map(PathBuf::from)
                .or_else(|| Some(PathBuf::from("runs"))),
        }
    }

    /// Disable artifact writes.
    pub fn without_artifacts(mut self) -> Self {
        self.work_dir = None;
        self
    }
}
