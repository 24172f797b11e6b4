//! Normalized script structure: markers and chunks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of structural line found in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Markdown heading (`#` through `######`)
    Section,
    /// Horizontal rule (`---` or longer)
    Separator,
}

/// A heading or separator line, excluded from narration.
///
/// Markers never enter beat text. They bias chunk boundaries and are
/// persisted as an inspection artifact.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StructuralMarker {
    pub kind: MarkerKind,

    /// The marker line as it appeared in the script (trimmed)
    pub raw_text: String,

    /// 0-based position in the normalized document (narrable lines and
    /// markers counted together)
    pub position_in_document: usize,

    /// 0-based index of the narrable line this marker follows, or `None`
    /// when the marker precedes all narrable content
    pub applies_after_narrable: Option<usize>,
}

/// A contiguous run of narrable lines handed to one segmentation call.
///
/// Transient: chunks exist only while segmentation requests are in flight.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 0-based offset of the chunk's first line in the narrable stream
    pub offset: usize,

    /// Narrable lines, in stream order
    pub lines: Vec<String>,
}

impl Chunk {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 1-based global line numbers covered by this chunk (inclusive).
    pub fn global_range(&self) -> (usize, usize) {
        (self.offset + 1, self.offset + self.lines.len())
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
