use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned {status}: {detail}")]
    Api {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// The provider reported the task as failed.
    #[error("speech generation failed: {0}")]
    Failed(String),

    /// The poll budget ran out without a terminal status. Distinct from a
    /// provider failure; any retry happens above this client.
    #[error("no terminal status after {attempts} polls")]
    TimedOut { attempts: u32 },

    #[error("completed task carried no audio url")]
    MissingAudioUrl,
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}
