//! Run artifact persistence.
//!
//! Artifacts land under `<work_dir>/<run_id>/work/`: a plain-text dump of
//! the narrable script, JSONL structural markers, the JSONL beat sheet, and
//! the meta object. All JSON is line-delimited UTF-8 with no pretty
//! printing.

use std::path::{Path, PathBuf};

use beatsheet_models::{Beat, BeatSheetMeta, StructuralMarker};

use crate::error::SegmenterResult;

pub const NARRABLE_SCRIPT_FILE: &str = "normalized_script_narrable.txt";
pub const MARKERS_FILE: &str = "structural_markers.jsonl";
pub const BEAT_SHEET_FILE: &str = "beat_sheet.jsonl";
pub const META_FILE: &str = "beat_sheet.meta.json";

/// Work directory for a run, created on demand.
pub async fn ensure_work_dir(root: &Path, run_id: &str) -> std::io::Result<PathBuf> {
    let dir = root.join(run_id).join("work");
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}

/// Write the narrable-only normalized script.
pub async fn write_narrable_script(dir: &Path, lines: &[String]) -> SegmenterResult<PathBuf> {
    let path = dir.join(NARRABLE_SCRIPT_FILE);
    tokio::fs::write(&path, lines.join("\n")).await?;
    Ok(path)
}

/// Write structural markers as JSONL.
pub async fn write_markers(dir: &Path, markers: &[StructuralMarker]) -> SegmenterResult<PathBuf> {
    let path = dir.join(MARKERS_FILE);
    let mut out = String::new();
    for marker in markers {
        out.push_str(&serde_json::to_string(marker)?);
        out.push('\n');
    }
    tokio::fs::write(&path, out).await?;
    Ok(path)
}

/// Write the beat sheet as JSONL, one beat per line.
pub async fn write_beat_sheet(dir: &Path, beats: &[Beat]) -> SegmenterResult<PathBuf> {
    let path = dir.join(BEAT_SHEET_FILE);
    let mut out = String::new();
    for beat in beats {
        out.push_str(&beat.to_jsonl_line()?);
        out.push('\n');
    }
    tokio::fs::write(&path, out).await?;
    Ok(path)
}

/// Write the beat-sheet meta object.
pub async fn write_meta(dir: &Path, meta: &BeatSheetMeta) -> SegmenterResult<PathBuf> {
    let path = dir.join(META_FILE);
    tokio::fs::write(&path, serde_json::to_string(meta)?).await?;
    Ok(path)
}
