use scape_script::EffectMention;

use crate::SoundEffect;

/// Decision for a single mention. Each mention is classified independently;
/// the same fallback effect may back any number of unmatched mentions.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    /// An effect whose marker equals the mention's, case-insensitively.
    Matched(&'a SoundEffect),
    /// No exact match; the first uploaded effect substitutes.
    Fallback(&'a SoundEffect),
    /// No effects uploaded at all. The caller must block generation.
    Missing,
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedMention<'a> {
    pub mention: &'a EffectMention,
    pub resolution: Resolution<'a>,
}

/// Per-category counts for user-facing reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub matched: usize,
    pub fallback: usize,
    pub missing: usize,
}

impl ResolutionSummary {
    /// At least one mention has nothing to play. A hard precondition
    /// failure — generation must not start.
    pub fn is_blocked(&self) -> bool {
        self.missing > 0
    }
}

impl std::fmt::Display for ResolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} matched, {} fallback, {} missing",
            self.matched, self.fallback, self.missing
        )
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedTimeline<'a> {
    /// One entry per mention, in document order.
    pub entries: Vec<ResolvedMention<'a>>,
    pub summary: ResolutionSummary,
}

/// Classify every mention against the uploaded effect library.
///
/// Pure: no audio is touched and the library is not reordered. Matching is
/// case-insensitive exact equality on the already-trimmed marker text.
pub fn resolve<'a>(
    mentions: &'a [EffectMention],
    library: &'a [SoundEffect],
) -> ResolvedTimeline<'a> {
    let fallback = library.first();
    let mut summary = ResolutionSummary::default();

    let entries = mentions
        .iter()
        .map(|mention| {
            let exact = library.iter().find(|e| markers_eq(&e.marker, &mention.marker));
            let resolution = match (exact, fallback) {
                (Some(effect), _) => {
                    summary.matched += 1;
                    Resolution::Matched(effect)
                }
                (None, Some(first)) => {
                    summary.fallback += 1;
                    Resolution::Fallback(first)
                }
                (None, None) => {
                    summary.missing += 1;
                    Resolution::Missing
                }
            };
            ResolvedMention { mention, resolution }
        })
        .collect();

    ResolvedTimeline { entries, summary }
}

/// Unique script markers with no exact match in the library, in order of
/// first appearance. These are the ones that will play the fallback.
pub fn missing_markers(script_text: &str, library: &[SoundEffect]) -> Vec<String> {
    scape_script::unique_markers(script_text)
        .into_iter()
        .filter(|marker| !library.iter().any(|e| markers_eq(&e.marker, marker)))
        .collect()
}

fn markers_eq(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn mention(marker: &str, position: usize) -> EffectMention {
        EffectMention {
            marker: marker.to_string(),
            position,
            original: format!("[{marker}]"),
            timestamp: 0.0,
        }
    }

    fn effect(marker: &str) -> SoundEffect {
        SoundEffect::new(format!("{marker}.mp3"), marker, Bytes::from_static(b"\xffaudio"))
    }

    #[test]
    fn case_insensitive_match_with_fallback_for_the_rest() {
        let mentions = [mention("laugh", 0), mention("clap", 10), mention("laugh", 20)];
        let library = [effect("Laugh")];

        let timeline = resolve(&mentions, &library);

        assert_eq!(
            timeline.summary,
            ResolutionSummary { matched: 2, fallback: 1, missing: 0 }
        );
        assert!(matches!(
            timeline.entries[0].resolution,
            Resolution::Matched(e) if e.marker == "Laugh"
        ));
        // The sole effect doubles as the fallback for "clap".
        assert!(matches!(
            timeline.entries[1].resolution,
            Resolution::Fallback(e) if e.marker == "Laugh"
        ));
        assert!(matches!(timeline.entries[2].resolution, Resolution::Matched(_)));
        assert!(!timeline.summary.is_blocked());
    }

    #[test]
    fn fallback_is_the_first_uploaded_effect() {
        let mentions = [mention("explosion", 0)];
        let library = [effect("Laugh"), effect("Clap")];

        let timeline = resolve(&mentions, &library);

        assert!(matches!(
            timeline.entries[0].resolution,
            Resolution::Fallback(e) if e.marker == "Laugh"
        ));
    }

    #[test]
    fn zero_effects_blocks_generation() {
        let mentions = [mention("laugh", 0)];

        let timeline = resolve(&mentions, &[]);

        assert!(matches!(timeline.entries[0].resolution, Resolution::Missing));
        assert_eq!(timeline.summary.missing, 1);
        assert!(timeline.summary.is_blocked());
    }

    #[test]
    fn no_mentions_is_never_blocked() {
        let timeline = resolve(&[], &[]);
        assert!(timeline.entries.is_empty());
        assert!(!timeline.summary.is_blocked());
    }

    #[test]
    fn summary_display_reads_like_a_report() {
        let summary = ResolutionSummary { matched: 3, fallback: 2, missing: 0 };
        assert_eq!(summary.to_string(), "3 matched, 2 fallback, 0 missing");
    }

    #[test]
    fn missing_markers_reports_unmatched_unique_markers() {
        let script = "a [Laugh] b [Clap] c [laugh]";
        let library = [effect("LAUGH")];
        assert_eq!(missing_markers(script, &library), vec!["Clap"]);
    }
}
