/// One occurrence of a bracketed sound-effect marker in a script.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectMention {
    /// Trimmed text inside the brackets, e.g. "Audience laughs".
    pub marker: String,
    /// Byte offset of the `[` in the original (uncleaned) text.
    pub position: usize,
    /// The full matched token including brackets, e.g. "[Audience laughs]".
    pub original: String,
    /// Estimated playback time in seconds, derived from the word count of
    /// the narration preceding the mention at a fixed speaking rate. A
    /// sequencing hint only — never measured from generated audio.
    pub timestamp: f64,
}

/// Result of parsing a raw script once, immutable thereafter.
///
/// `cleaned_text` is `original_text` with every bracketed span removed;
/// `effects` preserves the left-to-right order of appearance.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessedScript {
    pub original_text: String,
    pub cleaned_text: String,
    pub effects: Vec<EffectMention>,
}
