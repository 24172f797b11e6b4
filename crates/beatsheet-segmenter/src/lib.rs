//! Script-to-beats segmentation pipeline.
//!
//! Converts a long-form narration script into a validated sequence of beats:
//! - Normalizer: splits narrable sentences from structural markers
//! - Chunker: word-budgeted chunks sized for the model's response budget
//! - Segmentation calls: schema-constrained JSON requests, one per chunk
//! - Repair pipeline: clamp, gap-fill, merge, split, finalize, accept
//! - Metadata aggregation and run artifacts
//!
//! The segmentation model is untrusted: its line ranges are clamped and
//! repaired, and beat text is always rebuilt from the script itself.

pub mod artifacts;
pub mod chunk;
pub mod config;
pub mod contamination;
pub mod error;
pub mod meta;
pub mod normalize;
pub mod pacing;
pub mod prompt;
pub mod repair;
pub mod segmenter;

pub use config::SegmenterConfig;
pub use contamination::ContaminationPolicy;
pub use error::{SegmenterError, SegmenterResult};
pub use segmenter::BeatSegmenter;
