//! Word-budgeted chunking of the narrable stream.

use std::collections::HashSet;

use beatsheet_models::{Chunk, StructuralMarker};

use crate::config::SegmenterConfig;
use crate::pacing;

/// Partition narrable lines into chunks sized for one segmentation call.
///
/// A chunk closes when its word count reaches the hard target, or early at a
/// structural-marker boundary once the soft threshold is passed. The final
/// chunk always closes at end of input. Chunks cover the stream exactly once,
/// in order, with no gaps or overlaps.
pub fn create_chunks(
    lines: &[String],
    markers: &[StructuralMarker],
    config: &SegmenterConfig,
) -> Vec<Chunk> {
    // A marker between narrable line i and i+1 makes i a preferred boundary.
    let split_points: HashSet<usize> = markers
        .iter()
        .filter_map(|m| m.applies_after_narrable)
        .collect();

    let soft_target = (config.chunk_target_words as f64 * config.chunk_soft_ratio) as usize;

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut chunk_start = 0usize;
    let mut word_count = 0usize;

    for (i, line) in lines.iter().enumerate() {
        current.push(line.clone());
        word_count += pacing::clean_word_count(line);

        let hard_boundary = word_count >= config.chunk_target_words;
        let soft_boundary = word_count >= soft_target && split_points.contains(&i);
        let last_line = i == lines.len() - 1;

        if hard_boundary || soft_boundary || last_line {
            chunks.push(Chunk {
                offset: chunk_start,
                lines: std::mem::take(&mut current),
            });
            chunk_start = i + 1;
            word_count = 0;
        }
    }

    chunks
}
