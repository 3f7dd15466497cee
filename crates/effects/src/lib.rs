mod resolve;
mod types;

pub use resolve::{
    Resolution, ResolutionSummary, ResolvedMention, ResolvedTimeline, missing_markers, resolve,
};
pub use types::SoundEffect;
