//! End-to-end segmentation tests through the mock LLM client.

use std::sync::Arc;

use serde_json::{json, Value};

use beatsheet_llm::MockLlmClient;
use beatsheet_models::Beat;
use beatsheet_segmenter::{BeatSegmenter, SegmenterConfig, SegmenterError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("beatsheet_segmenter=debug")
        .with_test_writer()
        .try_init();
}

fn prop(order: i64, start: i64, end: i64, intent: &str) -> Value {
    json!({
        "order": order,
        "line_start": start,
        "line_end": end,
        "intent": intent,
        "estimated_seconds": 3.0,
        "priority": 2
    })
}

fn segmenter_with(mock: Arc<MockLlmClient>, config: SegmenterConfig) -> BeatSegmenter {
    BeatSegmenter::new(mock, config)
}

/// No gaps, no overlaps, every text equal to its claimed slice.
fn assert_coverage(beats: &[Beat], narrable_line_count: usize) {
    let mut next_line = 1usize;
    for beat in beats {
        assert_eq!(beat.source.line_start, next_line, "coverage broken at {}", beat.beat_id);
        next_line = beat.source.line_end + 1;
    }
    assert_eq!(next_line, narrable_line_count + 1);
}

const SIMPLE_SCRIPT: &str =
    "Line 1: Markets are weird.\nLine 2: Data is flowing.\nLine 3: Clarity is key.";

#[tokio::test]
async fn segments_script_into_verified_beats() {
    init_tracing();
    let mock = Arc::new(MockLlmClient::new());
    mock.push_json(json!({
        "beats": [
            prop(1, 1, 2, "Opening hook"),
            prop(2, 3, 3, "Closing thought"),
        ]
    }));

    let segmenter = segmenter_with(mock.clone(), SegmenterConfig::default().without_artifacts());
    let (beats, meta) = segmenter.segment("run-simple", SIMPLE_SCRIPT).await.unwrap();

    assert_eq!(beats.len(), 2);
    assert_eq!(
        beats[0].text,
        "Line 1: Markets are weird.\nLine 2: Data is flowing."
    );
    assert_eq!(beats[1].text, "Line 3: Clarity is key.");
    assert_eq!(beats[0].beat_id, "b001");
    assert_eq!(beats[1].beat_id, "b002");
    assert!(beats.iter().all(|b| b.run_id == "run-simple"));
    assert_coverage(&beats, 3);

    assert_eq!(meta.total_beats, 2);
    assert_eq!(meta.normalized_line_count, 3);
    assert_eq!(meta.visual_contamination_count, 0);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn fills_gaps_and_records_warning() {
    init_tracing();
    let mock = Arc::new(MockLlmClient::new());
    mock.push_json(json!({
        "beats": [
            prop(1, 1, 1, "Opening hook"),
            prop(2, 3, 3, "Closing thought"),
        ]
    }));

    let segmenter = segmenter_with(mock, SegmenterConfig::default().without_artifacts());
    let (beats, meta) = segmenter.segment("run-gap", SIMPLE_SCRIPT).await.unwrap();

    assert_eq!(beats.len(), 2);
    assert_eq!(beats[0].source.line_end, 2);
    assert!(meta
        .warnings
        .contains(&"Merged gap lines 2-2 into beat 1".to_string()));
    assert_coverage(&beats, 3);
}

#[tokio::test]
async fn chunked_script_renumbers_globally() {
    init_tracing();
    let line = "Investors watched the quarterly numbers with growing confidence.";
    let script = vec![line; 100].join("\n");

    // 8 words per line, 450-word chunk target: chunk 1 covers 57 lines,
    // chunk 2 the remaining 43.
    let chunk_fixture = |line_count: i64| {
        let mut beats = Vec::new();
        let mut order = 1;
        let mut start = 1;
        while start <= line_count {
            let end = (start + 1).min(line_count);
            beats.push(prop(order, start, end, "Advance the narrative"));
            order += 1;
            start = end + 1;
        }
        json!({ "beats": beats })
    };

    let mock = Arc::new(MockLlmClient::new());
    mock.push_json(chunk_fixture(57));
    mock.push_json(chunk_fixture(43));

    let segmenter = segmenter_with(mock.clone(), SegmenterConfig::default().without_artifacts());
    let (beats, meta) = segmenter.segment("run-chunked", &script).await.unwrap();

    assert_eq!(mock.call_count(), 2);
    assert_eq!(beats.len(), 51);
    assert_coverage(&beats, 100);

    for (i, beat) in beats.iter().enumerate() {
        assert_eq!(beat.order as usize, i + 1);
    }
    assert_eq!(beats[0].beat_id, "b001");
    assert_eq!(beats[50].beat_id, "b051");
    assert_eq!(meta.total_beats, 51);

    // Each chunk sees its own 1-based numbering
    let calls = mock.calls();
    assert!(calls[0].user_content.contains("1: Investors"));
    assert!(calls[1].user_content.contains("1: Investors"));
    assert!(!calls[1].user_content.contains("58: Investors"));
}

#[tokio::test]
async fn rejects_beat_count_outside_bounds() {
    init_tracing();
    let line = "Quarterly revenue beat expectations across all divisions.";
    let script = vec![line; 25].join("\n");

    // 175 words -> accepted range [6, 22]; 25 single-line beats exceed it
    let fixture: Vec<Value> = (1..=25)
        .map(|i| prop(i, i, i, "Advance the narrative"))
        .collect();
    let mock = Arc::new(MockLlmClient::new());
    mock.push_json(json!({ "beats": fixture }));

    let segmenter = segmenter_with(mock, SegmenterConfig::default().without_artifacts());
    let err = segmenter.segment("run-count", &script).await.unwrap_err();

    match err {
        SegmenterError::CountOutOfRange { count, min, max, .. } => {
            assert_eq!(count, 25);
            assert_eq!((min, max), (6, 22));
        }
        other => panic!("expected CountOutOfRange, got {:?}", other),
    }
}

#[tokio::test]
async fn rejects_contaminated_run() {
    init_tracing();
    let mock = Arc::new(MockLlmClient::new());
    mock.push_json(json!({
        "beats": [prop(1, 1, 3, "We see a camera pan over the red scene")]
    }));

    let config = SegmenterConfig {
        contamination_threshold: 1,
        ..SegmenterConfig::default()
    }
    .without_artifacts();
    let segmenter = segmenter_with(mock, config);
    let err = segmenter.segment("run-contam", SIMPLE_SCRIPT).await.unwrap_err();

    match &err {
        SegmenterError::ContaminationExceeded { count, threshold, .. } => {
            assert!(count > threshold);
        }
        other => panic!("expected ContaminationExceeded, got {:?}", other),
    }
    assert!(err.warnings().iter().any(|w| w.contains("[CONTAMINATION]")));
}

#[tokio::test]
async fn rejects_empty_script() {
    init_tracing();
    let mock = Arc::new(MockLlmClient::new());
    let segmenter = segmenter_with(mock, SegmenterConfig::default().without_artifacts());

    let err = segmenter.segment("run-empty", "").await.unwrap_err();
    assert!(matches!(err, SegmenterError::EmptyScript));

    // Markers alone are not narrable content
    let err = segmenter.segment("run-markers", "# Title\n---").await.unwrap_err();
    assert!(matches!(err, SegmenterError::EmptyScript));
}

#[tokio::test]
async fn llm_failure_propagates_unchanged() {
    init_tracing();
    // Empty fixture queue: the mock fails like a provider would
    let mock = Arc::new(MockLlmClient::new());
    let segmenter = segmenter_with(mock, SegmenterConfig::default().without_artifacts());

    let err = segmenter.segment("run-fail", SIMPLE_SCRIPT).await.unwrap_err();
    assert!(matches!(err, SegmenterError::Llm(_)));
}

#[tokio::test]
async fn writes_inspection_artifacts() {
    init_tracing();
    let work_dir = tempfile::tempdir().unwrap();
    let script = "# Intro\nMarkets rallied strongly today.\n---\nInvestors remained cautious overall.";

    let mock = Arc::new(MockLlmClient::new());
    mock.push_json(json!({ "beats": [prop(1, 1, 2, "Summarize the day")] }));

    let config = SegmenterConfig {
        work_dir: Some(work_dir.path().to_path_buf()),
        ..SegmenterConfig::default()
    };
    let segmenter = segmenter_with(mock, config);
    let (beats, meta) = segmenter.segment("run-artifacts", script).await.unwrap();

    let run_dir = work_dir.path().join("run-artifacts").join("work");
    let narrable = std::fs::read_to_string(
        run_dir.join(beatsheet_segmenter::artifacts::NARRABLE_SCRIPT_FILE),
    )
    .unwrap();
    assert_eq!(
        narrable,
        "Markets rallied strongly today.\nInvestors remained cautious overall."
    );

    let markers_raw = std::fs::read_to_string(
        run_dir.join(beatsheet_segmenter::artifacts::MARKERS_FILE),
    )
    .unwrap();
    assert_eq!(markers_raw.lines().count(), 2);
    assert_eq!(meta.structural_markers_count, 2);
    assert!(meta
        .structural_markers_path
        .as_deref()
        .unwrap()
        .ends_with("structural_markers.jsonl"));

    // Orchestration-side writers complete the artifact set
    beatsheet_segmenter::artifacts::write_beat_sheet(&run_dir, &beats)
        .await
        .unwrap();
    beatsheet_segmenter::artifacts::write_meta(&run_dir, &meta)
        .await
        .unwrap();

    let sheet = std::fs::read_to_string(
        run_dir.join(beatsheet_segmenter::artifacts::BEAT_SHEET_FILE),
    )
    .unwrap();
    assert_eq!(sheet.lines().count(), beats.len());
}
