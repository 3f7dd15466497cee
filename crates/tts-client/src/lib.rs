mod client;
mod error;
mod log;
mod types;

pub use client::{SpeechClient, SpeechClientBuilder};
pub use error::Error;
pub use log::{EventLevel, EventLog, NullEventLog, TracingEventLog};
pub use types::{DEFAULT_VOICE, TaskState};
