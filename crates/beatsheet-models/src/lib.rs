//! Shared data models for the beatsheet pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Structural markers and chunks of the normalized script
//! - Untrusted range proposals returned by the segmentation model
//! - Validated beats and beat-sheet metadata

pub mod beat;
pub mod meta;
pub mod proposal;
pub mod script;

// Re-export common types
pub use beat::{Beat, BeatSource, BEAT_SCHEMA_VERSION};
pub use meta::BeatSheetMeta;
pub use proposal::{RangeProposal, SegmentationResponse};
pub use script::{Chunk, MarkerKind, StructuralMarker};
