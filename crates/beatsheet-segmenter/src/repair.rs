//! Repair pipeline: six ordered passes turning untrusted range proposals
//! into a verified, gap-free, duration-bounded beat list.
//!
//! Passes:
//! 1. Materialize: clamp ranges, drop unusable proposals, rebuild text from
//!    the script slice
//! 2. Gap fill: guarantee full coverage of the narrable stream
//! 3. Merge short beats into their contiguous successor
//! 4. Split long beats by halving line ranges
//! 5. Finalize: renumber, audit, recompute durations, scan contamination
//! 6. Accept or reject against the caller's contracts
//!
//! Every pass consumes the working list and returns a fresh one; beats are
//! never shared between collections.

use std::collections::VecDeque;

use tracing::{debug, error};

use beatsheet_models::{Beat, BeatSource, RangeProposal};

use crate::config::SegmenterConfig;
use crate::contamination::ContaminationPolicy;
use crate::error::{SegmenterError, SegmenterResult};
use crate::pacing;

/// Diagnostics accumulated across all passes.
#[derive(Debug, Default)]
pub struct RepairReport {
    /// Human-readable warnings, in pass order
    pub warnings: Vec<String>,
    /// Aggregate contamination score over intents and texts
    pub contamination_count: usize,
    /// Total words across accepted beat texts
    pub word_count: usize,
}

/// Run all six repair passes over raw proposals.
///
/// `lines` is the narrable stream; every line number is 1-based and inclusive.
/// `min_expected`/`max_expected` are the caller's acceptance bounds. Fails
/// closed: a pass-6 rejection returns an error carrying the full warning log
/// and no beats.
pub fn repair(
    run_id: &str,
    lines: &[String],
    proposals: Vec<RangeProposal>,
    min_expected: usize,
    max_expected: usize,
    config: &SegmenterConfig,
    policy: &ContaminationPolicy,
) -> SegmenterResult<(Vec<Beat>, RepairReport)> {
    let mut report = RepairReport::default();

    let beats = materialize(run_id, lines, proposals, &mut report.warnings);
    debug!(beats = beats.len(), "Materialized proposals");

    let beats = fill_gaps(run_id, lines, beats, &mut report.warnings);
    let beats = merge_short(lines, beats, config);
    let beats = split_long(lines, beats, config);
    debug!(beats = beats.len(), "Coverage repaired");

    let beats = finalize(lines, beats, config, policy, &mut report);

    if report.contamination_count > config.contamination_threshold {
        error!(
            count = report.contamination_count,
            threshold = config.contamination_threshold,
            "Rejecting beat sheet: visual contamination over threshold"
        );
        return Err(SegmenterError::ContaminationExceeded {
            count: report.contamination_count,
            threshold: config.contamination_threshold,
            warnings: report.warnings,
        });
    }

    if beats.len() < min_expected || beats.len() > max_expected {
        error!(
            count = beats.len(),
            min = min_expected,
            max = max_expected,
            "Rejecting beat sheet: count outside accepted range"
        );
        return Err(SegmenterError::CountOutOfRange {
            count: beats.len(),
            min: min_expected,
            max: max_expected,
            warnings: report.warnings,
        });
    }

    Ok((beats, report))
}

/// Pass 1: clamp ranges into script bounds, drop proposals that invert or
/// empty out, and rebuild each beat's text from the literal script slice.
/// Model-echoed text is never consulted.
fn materialize(
    run_id: &str,
    lines: &[String],
    mut proposals: Vec<RangeProposal>,
    warnings: &mut Vec<String>,
) -> Vec<Beat> {
    proposals.sort_by_key(|p| p.order);

    let line_count = lines.len() as i64;
    let mut beats = Vec::with_capacity(proposals.len());

    for proposal in proposals {
        let start = proposal.line_start.max(1);
        let end = proposal.line_end.min(line_count);

        if start > end {
            warnings.push(format!(
                "Invalid range for beat {}: {}-{}. Skipping.",
                proposal.order, proposal.line_start, proposal.line_end
            ));
            continue;
        }

        let source = BeatSource::new(start as usize, end as usize);
        if source.slice_text(lines).trim().is_empty() {
            warnings.push(format!(
                "Empty text for beat {}: lines {}-{}. Skipping.",
                proposal.order, start, end
            ));
            continue;
        }

        beats.push(Beat::from_source(
            run_id,
            proposal.order.clamp(1, u32::MAX as i64) as u32,
            proposal.intent,
            proposal.priority.clamp(1, 3) as u8,
            source,
            lines,
        ));
    }

    beats
}

/// Pass 2: guarantee the beat list covers every narrable line exactly once,
/// in order, with no overlaps.
///
/// Gaps with content are merged into the previous beat; a gap before any
/// accepted beat becomes its own leading beat. Ranges that overlap already
/// covered lines are trimmed forward, or dropped when fully covered.
fn fill_gaps(
    run_id: &str,
    lines: &[String],
    beats: Vec<Beat>,
    warnings: &mut Vec<String>,
) -> Vec<Beat> {
    if beats.is_empty() {
        return beats;
    }

    let mut filled: Vec<Beat> = Vec::with_capacity(beats.len());
    let mut last_end = 0usize;

    for mut beat in beats {
        if beat.source.line_start <= last_end {
            if beat.source.line_end <= last_end {
                warnings.push(format!(
                    "Dropped beat {}: lines {}-{} already covered",
                    beat.order, beat.source.line_start, beat.source.line_end
                ));
                continue;
            }
            let trimmed = BeatSource::new(last_end + 1, beat.source.line_end);
            warnings.push(format!(
                "Trimmed overlapping beat {}: lines {}-{} to {}-{}",
                beat.order,
                beat.source.line_start,
                beat.source.line_end,
                trimmed.line_start,
                trimmed.line_end
            ));
            beat.source = trimmed;
            beat.text = trimmed.slice_text(lines);
        }

        let gap_start = last_end + 1;
        let gap_end = beat.source.line_start.saturating_sub(1);
        if gap_start <= gap_end {
            absorb_gap(run_id, lines, &mut filled, gap_start, gap_end, beat.order, warnings);
        }

        last_end = beat.source.line_end;
        filled.push(beat);
    }

    if last_end < lines.len() {
        absorb_gap(run_id, lines, &mut filled, last_end + 1, lines.len(), 0, warnings);
    }

    filled
}

/// Merge an uncovered range into the previous beat, or promote it to its own
/// beat when none exists yet.
fn absorb_gap(
    run_id: &str,
    lines: &[String],
    filled: &mut Vec<Beat>,
    gap_start: usize,
    gap_end: usize,
    order_hint: u32,
    warnings: &mut Vec<String>,
) {
    let gap_source = BeatSource::new(gap_start, gap_end);
    let gap_text = gap_source.slice_text(lines);
    if gap_text.trim().is_empty() {
        return;
    }

    if let Some(prev) = filled.last_mut() {
        prev.text.push('\n');
        prev.text.push_str(&gap_text);
        prev.source.line_end = gap_end;
        warnings.push(format!(
            "Merged gap lines {}-{} into beat {}",
            gap_start, gap_end, prev.order
        ));
    } else {
        warnings.push(format!(
            "Created leading beat for uncovered lines {}-{}",
            gap_start, gap_end
        ));
        filled.push(Beat::from_source(
            run_id,
            order_hint,
            "[GAP FILLED] Narrative bridge",
            1,
            gap_source,
            lines,
        ));
    }
}

/// Pass 3: coalesce too-short beats into their contiguous successor.
///
/// Non-contiguous short beats are left alone rather than merged incorrectly;
/// the last beat is never merged forward.
fn merge_short(lines: &[String], beats: Vec<Beat>, config: &SegmenterConfig) -> Vec<Beat> {
    if beats.len() <= 1 {
        return beats;
    }

    let mut queue: VecDeque<Beat> = beats.into();
    let mut merged: Vec<Beat> = Vec::with_capacity(queue.len());

    while let Some(beat) = queue.pop_front() {
        let duration = pacing::estimate_seconds(&beat.text, config.words_per_second);
        let too_short = duration < config.min_beat_seconds
            || beat.text.chars().count() < config.min_beat_chars;

        let mergeable = too_short
            && queue
                .front()
                .is_some_and(|next| beat.source.is_contiguous_with(&next.source));

        if mergeable {
            if let Some(next) = queue.pop_front() {
                let source = BeatSource::new(beat.source.line_start, next.source.line_end);
                merged.push(Beat::from_source(
                    beat.run_id.as_str(),
                    beat.order,
                    format!("{} | {}", beat.intent, next.intent),
                    beat.priority.max(next.priority),
                    source,
                    lines,
                ));
                continue;
            }
        }

        merged.push(beat);
    }

    merged
}

/// Pass 4: split over-long beats by halving their line range.
///
/// Uses an explicit worklist so split depth never depends on call-stack
/// headroom; the range strictly halves each round. Single-line beats are
/// atomic and kept even when over the threshold; finalization reports them.
fn split_long(lines: &[String], beats: Vec<Beat>, config: &SegmenterConfig) -> Vec<Beat> {
    let mut result = Vec::with_capacity(beats.len());

    for beat in beats {
        let mut worklist = vec![beat];
        while let Some(current) = worklist.pop() {
            let duration = pacing::estimate_seconds(&current.text, config.words_per_second);
            if duration <= config.split_threshold_seconds || current.line_count() <= 1 {
                result.push(current);
                continue;
            }

            let start = current.source.line_start;
            let end = current.source.line_end;
            let mid = start + current.line_count() / 2 - 1;

            let second = Beat::from_source(
                current.run_id.as_str(),
                current.order,
                current.intent.clone(),
                current.priority,
                BeatSource::new(mid + 1, end),
                lines,
            );
            let first = Beat::from_source(
                current.run_id.as_str(),
                current.order,
                current.intent,
                current.priority,
                BeatSource::new(start, mid),
                lines,
            );

            // LIFO: left half on top so fragments come out in line order
            worklist.push(second);
            worklist.push(first);
        }
    }

    result
}

/// Pass 5: renumber, audit text against ranges, recompute durations, and
/// scan for contamination.
fn finalize(
    lines: &[String],
    beats: Vec<Beat>,
    config: &SegmenterConfig,
    policy: &ContaminationPolicy,
    report: &mut RepairReport,
) -> Vec<Beat> {
    let mut finalized = Vec::with_capacity(beats.len());

    for (idx, mut beat) in beats.into_iter().enumerate() {
        beat.order = (idx + 1) as u32;
        beat.beat_id = format!("b{:03}", idx + 1);

        // The range is the source of truth; text must match it exactly.
        let expected = beat.source.slice_text(lines);
        if beat.text != expected {
            report.warnings.push(format!(
                "AUDIT FAIL: beat {} text mismatch, rebuilt from lines {}-{}",
                beat.beat_id, beat.source.line_start, beat.source.line_end
            ));
            beat.text = expected;
        }

        // Duration is a pacing estimate, not a contract on the text: over the
        // ceiling, only the reported value is clamped.
        let duration = pacing::estimate_seconds(&beat.text, config.words_per_second);
        if duration > config.duration_ceiling_seconds {
            report.warnings.push(format!(
                "BEAT_TOO_LONG: beat {} duration {:.1}s exceeds {:.1}s ceiling (atomic unit too large)",
                beat.beat_id, duration, config.duration_ceiling_seconds
            ));
            beat.estimated_seconds = config.duration_ceiling_seconds;
        } else {
            beat.estimated_seconds = duration;
        }

        report.word_count += beat.text.split_whitespace().count();

        let intent_hits = policy.scan_intent(&beat.intent);
        if intent_hits > 0 {
            report.warnings.push(format!(
                "[CONTAMINATION] Beat {} intent contains visual terms",
                beat.beat_id
            ));
            report.contamination_count += intent_hits;
        }

        let text_hits = policy.scan_text(&beat.text);
        if text_hits > 0 {
            report.warnings.push(format!(
                "[CONTAMINATION] Beat {} text contains direction phrases",
                beat.beat_id
            ));
            report.contamination_count += text_hits;
        }

        finalized.push(beat);
    }

    finalized
}
