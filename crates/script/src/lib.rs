mod parse;
mod types;

pub use parse::{has_marker, parse, unique_markers, word_count};
pub use types::{EffectMention, ProcessedScript};
