//! Prompt templates and the response schema for segmentation calls.

use serde_json::{json, Value};

/// Default pacing instruction.
pub const FAST_PACING: &str =
    "FAST PACING. Keep beats short (2-5 seconds). Avoid long blocks of text.";

/// System instructions for the segmentation model.
pub fn system_prompt(min_beats: usize, max_beats: usize, pacing_instruction: &str) -> String {
    format!(
        r#"You are a narrative segmenter for a video production pipeline.
Your job is to divide the provided script into small, logical narrative "beats".

RULES:
1. NO VISUAL DESCRIPTIONS: Do not describe camera angles, colors, "we see X", or visual styles.
2. NO NEW TEXT: You must only use ranges of lines from the provided script.
3. CONTEXT: Maintain the narrative flow. Each beat should represent a single idea or transition.
4. JSON ONLY: Respond strictly with valid JSON matching the requested schema.
5. STRICT LIMITS: You MUST produce between {min_beats} and {max_beats} beats.
   - If you produce fewer than {min_beats}, your output is INVALID.
   - Break long sentences or paragraphs into multiple beats to meet this count.
   - Each beat should be roughly 1 sentence or phrase.

PACING:
{pacing_instruction}

You will receive lines of the script numbered from 1.
Return the starting and ending line number (inclusive) for each beat.

IMPORTANT: Each beat object MUST have these exact fields:
- order: integer (1, 2, 3, ...)
- line_start: integer (first line number)
- line_end: integer (last line number, inclusive)
- intent: string (brief narrative intent)
- estimated_seconds: number (1.0 to 12.0)
- priority: integer (1=low, 2=medium, 3=high)"#
    )
}

/// User message carrying the numbered chunk.
pub fn user_prompt(numbered_script: &str, min_beats: usize, max_beats: usize) -> String {
    format!(
        r#"Script to segment:
{numbered_script}

REQUIRED BEAT COUNT: {min_beats} to {max_beats} beats.
CRITICAL: You must generate at least {min_beats} beats.
Do not group large blocks of text. Keep beats granular (1-3 lines max usually).

Segment the script into logical beats and return JSON in this EXACT format:

{{
  "beats": [
    {{
      "order": 1,
      "line_start": 1,
      "line_end": 2,
      "intent": "Brief description of narrative purpose",
      "estimated_seconds": 4.5,
      "priority": 2
    }}
  ]
}}

Start segmentation now."#
    )
}

/// Render chunk lines as a 1-based numbered view.
pub fn numbered_script(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON schema the segmentation response must satisfy, bounded to the
/// chunk's dynamic beat-count range.
pub fn segmentation_schema(min_beats: usize, max_beats: usize) -> Value {
    json!({
        "type": "object",
        "required": ["beats"],
        "properties": {
            "beats": {
                "type": "array",
                "minItems": min_beats,
                "maxItems": max_beats,
                "items": {
                    "type": "object",
                    "required": ["order", "line_start", "line_end", "intent",
                                 "estimated_seconds", "priority"],
                    "properties": {
                        "order": {"type": "integer", "minimum": 1},
                        "line_start": {"type": "integer", "minimum": 1},
                        "line_end": {"type": "integer", "minimum": 1},
                        "intent": {"type": "string", "minLength": 3},
                        "estimated_seconds": {"type": "number", "minimum": 1.0, "maximum": 12.0},
                        "priority": {"type": "integer", "minimum": 1, "maximum": 3}
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_script_is_one_based() {
        let lines = vec!["First.".to_string(), "Second.".to_string()];
        assert_eq!(numbered_script(&lines), "1: First.\n2: Second.");
    }

    #[test]
    fn test_prompts_embed_bounds() {
        let system = system_prompt(4, 12, FAST_PACING);
        assert!(system.contains("between 4 and 12 beats"));
        assert!(system.contains(FAST_PACING));

        let user = user_prompt("1: Hello.", 4, 12);
        assert!(user.contains("REQUIRED BEAT COUNT: 4 to 12 beats."));
        assert!(user.contains("1: Hello."));
    }

    #[test]
    fn test_schema_embeds_item_bounds() {
        let schema = segmentation_schema(3, 9);
        assert_eq!(schema["properties"]["beats"]["minItems"], 3);
        assert_eq!(schema["properties"]["beats"]["maxItems"], 9);
        let required = schema["properties"]["beats"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 6);
    }
}
