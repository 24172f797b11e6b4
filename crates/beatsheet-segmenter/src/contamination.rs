//! Contamination scanning: visual/staging vocabulary in narrative channels.

use regex_lite::Regex;

/// Default pattern set for the intent field. Broad: any visual term flags.
const INTENT_PATTERNS: &[&str] = &[
    r"camera",
    r"zoom",
    r"pan",
    r"tilt",
    r"\bshot\b",
    r"angle",
    r"\bframe\b",
    r"\bcolor\b",
    r"\bblue\b",
    r"\bred\b",
    r"\bgreen\b",
    r"\byellow\b",
    r"\bgold\b",
    r"glossy",
    r"neon",
    r"bright",
    r"\bdark\b",
    r"lighting",
    r"we see",
    r"appears",
    r"shows",
    r"background",
    r"foreground",
    r"\bscene\b",
    r"\bimage\b",
    r"\bpicture\b",
    r"\bview\b",
    r"visual",
];

/// Default pattern set for beat text. Narrow: only explicit direction
/// phrases, not common words.
const TEXT_PATTERNS: &[&str] = &[
    r"camera angle",
    r"camera moves",
    r"camera pans",
    r"camera zooms",
    r"camera tilts",
    r"close-up",
    r"wide shot",
    r"tracking shot",
    r"dolly",
    r"crane shot",
    r"we see\b",
    r"viewer sees",
    r"audience sees",
    r"screen shows",
    r"zoom in",
    r"zoom out",
    r"pan to",
    r"tilt up",
    r"tilt down",
    r"fade in",
    r"fade out",
    r"cut to",
];

/// Keyword policy for detecting visual direction in narrative channels.
///
/// The asymmetry is deliberate: `intent` is model-authored and held to the
/// broad list, while `text` comes from the script and is only flagged for
/// explicit direction phrases. Pattern lists are data, not logic; supply
/// custom sets through `from_patterns`.
#[derive(Debug, Clone)]
pub struct ContaminationPolicy {
    intent_patterns: Vec<Regex>,
    text_patterns: Vec<Regex>,
}

impl Default for ContaminationPolicy {
    fn default() -> Self {
        Self::from_patterns(INTENT_PATTERNS, TEXT_PATTERNS)
            .expect("built-in contamination patterns compile")
    }
}

impl ContaminationPolicy {
    /// Build a policy from external pattern lists.
    pub fn from_patterns(intent: &[&str], text: &[&str]) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            intent_patterns: compile(intent)?,
            text_patterns: compile(text)?,
        })
    }

    /// Count intent-field matches against the broad visual-term list.
    pub fn scan_intent(&self, intent: &str) -> usize {
        let lower = intent.to_lowercase();
        self.intent_patterns
            .iter()
            .filter(|re| re.is_match(&lower))
            .count()
    }

    /// Count explicit direction phrases in beat text.
    pub fn scan_text(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.text_patterns
            .iter()
            .filter(|re| re.is_match(&lower))
            .count()
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex_lite::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_intent_scores_zero() {
        let policy = ContaminationPolicy::default();
        assert_eq!(policy.scan_intent("Introduce the quarterly results"), 0);
        assert_eq!(policy.scan_intent("Build tension before the reveal"), 0);
    }

    #[test]
    fn test_visual_intent_counts_each_term() {
        let policy = ContaminationPolicy::default();
        // "we see", "camera", and "pan" each match
        assert!(policy.scan_intent("We see a camera pan") >= 2);
    }

    #[test]
    fn test_word_boundaries_respected() {
        let policy = ContaminationPolicy::default();
        // "shot" is boundary-anchored
        assert_eq!(policy.scan_intent("A gunshot rang out"), 0);
        assert_eq!(policy.scan_intent("One shot remains"), 1);
    }

    #[test]
    fn test_text_list_is_narrower_than_intent_list() {
        let policy = ContaminationPolicy::default();
        // Common words pass in text...
        assert_eq!(policy.scan_text("The red background shows growth"), 0);
        // ...but the same words flag in intent
        assert!(policy.scan_intent("The red background shows growth") >= 3);
    }

    #[test]
    fn test_text_direction_phrases_flag() {
        let policy = ContaminationPolicy::default();
        assert_eq!(policy.scan_text("The camera pans across. Fade in."), 2);
        assert_eq!(policy.scan_text("Cut to the chase"), 1);
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let policy = ContaminationPolicy::default();
        assert!(policy.scan_intent("WE SEE the skyline") >= 1);
        assert_eq!(policy.scan_text("FADE OUT"), 1);
    }

    #[test]
    fn test_custom_patterns() {
        let policy = ContaminationPolicy::from_patterns(&[r"\bdrone\b"], &[r"drone shot"]).unwrap();
        assert_eq!(policy.scan_intent("a drone hovers"), 1);
        assert_eq!(policy.scan_intent("we see a camera pan"), 0);
        assert_eq!(policy.scan_text("epic drone shot of the bay"), 1);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(ContaminationPolicy::from_patterns(&["(unclosed"], &[]).is_err());
    }
}
