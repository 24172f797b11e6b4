//! Beat segmentation orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use beatsheet_llm::{LlmClient, LlmError, LlmJsonRequest, LlmMessage, LlmRequest};
use beatsheet_models::{Beat, BeatSheetMeta, Chunk, RangeProposal, SegmentationResponse, StructuralMarker};

use crate::artifacts;
use crate::chunk::create_chunks;
use crate::config::SegmenterConfig;
use crate::contamination::ContaminationPolicy;
use crate::error::{SegmenterError, SegmenterResult};
use crate::meta::aggregate_meta;
use crate::normalize::normalize_script;
use crate::pacing;
use crate::prompt;
use crate::repair;

/// Step name attached to LLM trace metadata.
const STEP_NAME: &str = "BEAT_SEGMENTER";

/// Turns a narration script into a validated beat sheet.
///
/// Chunks are processed strictly sequentially: each chunk's beat-count budget
/// and the global order renumbering depend on accumulating results in
/// sequence. Retry policy lives in the LLM client; a chunk-call failure
/// propagates unchanged and aborts the run.
pub struct BeatSegmenter {
    llm: Arc<dyn LlmClient>,
    config: SegmenterConfig,
    policy: ContaminationPolicy,
}

impl BeatSegmenter {
    pub fn new(llm: Arc<dyn LlmClient>, config: SegmenterConfig) -> Self {
        Self {
            llm,
            config,
            policy: ContaminationPolicy::default(),
        }
    }

    /// Replace the contamination policy. Keyword lists are data, not logic.
    pub fn with_policy(mut self, policy: ContaminationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Segment a script into beats.
    ///
    /// Fails on empty input, on LLM failures (propagated unchanged), and on
    /// the acceptance gates. No partial beat list is ever returned from a
    /// failed run.
    pub async fn segment(
        &self,
        run_id: &str,
        script_text: &str,
    ) -> SegmenterResult<(Vec<Beat>, BeatSheetMeta)> {
        let (narrable, markers) = normalize_script(script_text);
        if narrable.is_empty() {
            return Err(SegmenterError::EmptyScript);
        }

        info!(
            run_id = %run_id,
            narrable_lines = narrable.len(),
            markers = markers.len(),
            "Script normalized"
        );

        // Inspection artifacts; failing to persist never fails the run.
        let markers_path = self
            .persist_inspection_artifacts(run_id, &narrable, &markers)
            .await;

        let chunks = create_chunks(&narrable, &markers, &self.config);
        info!(run_id = %run_id, chunks = chunks.len(), "Script chunked for segmentation");

        let mut proposals: Vec<RangeProposal> = Vec::new();
        let mut next_order: i64 = 1;

        for (i, chunk) in chunks.iter().enumerate() {
            let (chunk_min, chunk_max) = pacing::dynamic_limits(&chunk.text(), &self.config);
            let (first_line, last_line) = chunk.global_range();
            info!(
                run_id = %run_id,
                chunk = i + 1,
                total = chunks.len(),
                first_line,
                last_line,
                min_beats = chunk_min,
                max_beats = chunk_max,
                "Requesting segmentation for chunk"
            );

            let chunk_proposals = self
                .segment_chunk(run_id, chunk, chunk_min, chunk_max)
                .await?;

            // Shift chunk-relative lines to global numbers and force a single
            // ascending order across all chunks.
            for mut proposal in chunk_proposals {
                proposal.line_start += chunk.offset as i64;
                proposal.line_end += chunk.offset as i64;
                proposal.order = next_order;
                next_order += 1;
                proposals.push(proposal);
            }
        }

        let full_text = narrable.join("\n");
        let (min_expected, max_expected) = pacing::dynamic_limits(&full_text, &self.config);

        let (beats, report) = repair::repair(
            run_id,
            &narrable,
            proposals,
            min_expected,
            max_expected,
            &self.config,
            &self.policy,
        )?;

        let meta = aggregate_meta(
            &beats,
            min_expected,
            max_expected,
            narrable.len(),
            markers.len(),
            markers_path,
            report,
            &self.config,
        );

        info!(
            run_id = %run_id,
            beats = meta.total_beats,
            estimated_duration_s = meta.estimated_duration_s,
            warnings = meta.warnings.len(),
            "Segmentation accepted"
        );

        Ok((beats, meta))
    }

    /// Issue one schema-constrained segmentation request for a chunk.
    async fn segment_chunk(
        &self,
        run_id: &str,
        chunk: &Chunk,
        min_beats: usize,
        max_beats: usize,
    ) -> SegmenterResult<Vec<RangeProposal>> {
        let numbered = prompt::numbered_script(&chunk.lines);
        let schema = prompt::segmentation_schema(min_beats, max_beats);

        let request = LlmRequest::new(
            self.config.model.clone(),
            vec![
                LlmMessage::system(prompt::system_prompt(
                    min_beats,
                    max_beats,
                    prompt::FAST_PACING,
                )),
                LlmMessage::user(prompt::user_prompt(&numbered, min_beats, max_beats)),
            ],
        )
        .with_max_tokens(self.config.llm_max_tokens)
        .with_timeout(self.config.llm_timeout)
        .with_trace(run_id, STEP_NAME);

        let response = self
            .llm
            .generate_json(&LlmJsonRequest::new(request, schema))
            .await?;

        let json = response
            .json
            .ok_or_else(|| LlmError::provider("generate_json returned no JSON payload"))?;
        let parsed: SegmentationResponse = serde_json::from_value(json)?;
        Ok(parsed.beats)
    }

    async fn persist_inspection_artifacts(
        &self,
        run_id: &str,
        narrable: &[String],
        markers: &[StructuralMarker],
    ) -> Option<String> {
        let root = self.config.work_dir.as_ref()?;

        let result: SegmenterResult<PathBuf> = async {
            let dir = artifacts::ensure_work_dir(root, run_id).await?;
            artifacts::write_narrable_script(&dir, narrable).await?;
            artifacts::write_markers(&dir, markers).await
        }
        .await;

        match result {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "Could not persist inspection artifacts");
                None
            }
        }
    }
}
