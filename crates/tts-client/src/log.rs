/// Severity of a generation event, mirroring the debug panel this port
/// feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Injectable sink for human-readable generation events.
///
/// The client never reaches for process-global state; callers that want
/// the event stream hand an implementation to the builder.
pub trait EventLog: Send + Sync {
    fn log(&self, level: EventLevel, message: &str);
}

/// Drops every event. The default when no sink is configured.
pub struct NullEventLog;

impl EventLog for NullEventLog {
    fn log(&self, _level: EventLevel, _message: &str) {}
}

/// Forwards events to `tracing` at the matching level.
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn log(&self, level: EventLevel, message: &str) {
        match level {
            EventLevel::Info | EventLevel::Success => tracing::info!("{message}"),
            EventLevel::Warning => tracing::warn!("{message}"),
            EventLevel::Error => tracing::error!("{message}"),
        }
    }
}
