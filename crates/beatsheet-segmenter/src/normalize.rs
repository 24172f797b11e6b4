//! Script normalization: narrable sentences vs structural markers.

use beatsheet_models::{MarkerKind, StructuralMarker};

/// Split raw script text into narrable sentences and structural markers.
///
/// Line endings are normalized, lines trimmed, blanks dropped entirely.
/// Headings (`#` through `######` followed by whitespace) and separators
/// (3+ hyphens) become markers and never enter the narrable stream; every
/// other line is sentence-split and appended. Pure function of the input.
pub fn normalize_script(text: &str) -> (Vec<String>, Vec<StructuralMarker>) {
    let text = text.replace("\r\n", "\n");

    let mut narrable: Vec<String> = Vec::new();
    let mut markers: Vec<StructuralMarker> = Vec::new();
    // Narrable lines and markers counted together
    let mut position = 0usize;

    for raw_line in text.split('\n') {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(kind) = marker_kind(line) {
            markers.push(StructuralMarker {
                kind,
                raw_text: line.to_string(),
                position_in_document: position,
                applies_after_narrable: narrable.len().checked_sub(1),
            });
            position += 1;
            continue;
        }

        for sentence in split_sentences(line) {
            narrable.push(sentence);
            position += 1;
        }
    }

    (narrable, markers)
}

fn marker_kind(line: &str) -> Option<MarkerKind> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes)
        && line[hashes..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
    {
        return Some(MarkerKind::Section);
    }
    if line.len() >= 3 && line.chars().all(|c| c == '-') {
        return Some(MarkerKind::Separator);
    }
    None
}

/// Split a line into sentences after `.`, `!`, or `?` followed by whitespace
/// and an uppercase letter.
fn split_sentences(line: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            if j > i + 1 && j < chars.len() && chars[j].1.is_ascii_uppercase() {
                push_sentence(&mut sentences, &line[start..pos + c.len_utf8()]);
                start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }

    push_sentence(&mut sentences, &line[start..]);
    sentences
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}
