use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::types::{EffectMention, ProcessedScript};

/// Assumed narration speaking rate for timestamp estimation.
const WORDS_PER_MINUTE: f64 = 150.0;

/// Lazy match: a span never crosses a `]`, and nesting is not supported —
/// the first `]` closes the span.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// Extract every bracketed effect mention from `raw` and produce the
/// cleaned narration text.
///
/// Pure and infallible: markerless input yields zero effects and a cleaned
/// text identical to the input. Positions are byte offsets into `raw`, not
/// into the cleaned text.
pub fn parse(raw: &str) -> ProcessedScript {
    let mut cleaned = String::with_capacity(raw.len());
    let mut effects = Vec::new();
    let mut last = 0;

    for caps in MARKER_RE.captures_iter(raw) {
        let m = caps.get(0).unwrap();
        cleaned.push_str(&raw[last..m.start()]);
        last = m.end();

        // `cleaned` holds exactly the bracket-stripped text preceding this
        // match, so its word count is the estimate input.
        let words_before = word_count(&cleaned);
        effects.push(EffectMention {
            marker: caps[1].trim().to_string(),
            position: m.start(),
            original: m.as_str().to_string(),
            timestamp: round_1dp(words_before as f64 * 60.0 / WORDS_PER_MINUTE),
        });
    }
    cleaned.push_str(&raw[last..]);

    ProcessedScript {
        original_text: raw.to_string(),
        cleaned_text: cleaned,
        effects,
    }
}

/// Whether `script` contains `[marker]`, case-insensitively, allowing
/// whitespace inside the brackets around the name.
pub fn has_marker(script: &str, marker: &str) -> bool {
    let pattern = format!(r"\[\s*{}\s*\]", regex::escape(marker.trim()));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .expect("escaped marker name always forms a valid pattern")
        .is_match(script)
}

/// Distinct trimmed marker names in order of first appearance.
pub fn unique_markers(script: &str) -> Vec<String> {
    let mut markers: Vec<String> = Vec::new();
    for caps in MARKER_RE.captures_iter(script) {
        let marker = caps[1].trim();
        if !markers.iter().any(|m| m == marker) {
            markers.push(marker.to_string());
        }
    }
    markers
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn round_1dp(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}
