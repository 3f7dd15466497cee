use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Error;
use crate::log::{EventLevel, EventLog, NullEventLog};
use crate::types::{DEFAULT_VOICE, GenerateRequest, GenerateResponse, StatusResponse, TaskState};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 20;

pub struct SpeechClientBuilder {
    api_base: Option<String>,
    voice: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
    event_log: Arc<dyn EventLog>,
}

impl Default for SpeechClientBuilder {
    fn default() -> Self {
        Self {
            api_base: None,
            voice: DEFAULT_VOICE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            event_log: Arc::new(NullEventLog),
        }
    }
}

impl SpeechClientBuilder {
    /// Gateway base URL, e.g. `http://localhost:3001`.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    pub fn event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    pub fn build(self) -> SpeechClient {
        SpeechClient {
            client: reqwest::Client::new(),
            api_base: self.api_base.expect("api_base is required"),
            voice: self.voice,
            poll_interval: self.poll_interval,
            max_poll_attempts: self.max_poll_attempts,
            event_log: self.event_log,
        }
    }
}

/// Drives one remote generation job through the gateway: submit the
/// narration text, poll the task until it terminates, then fetch the audio
/// bytes through the download proxy.
pub struct SpeechClient {
    client: reqwest::Client,
    api_base: String,
    voice: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
    event_log: Arc<dyn EventLog>,
}

impl SpeechClient {
    pub fn builder() -> SpeechClientBuilder {
        SpeechClientBuilder::default()
    }

    pub async fn generate(&self, text: &str) -> Result<Bytes, Error> {
        self.generate_with_progress(text, |_| {}).await
    }

    /// Full submit → poll → fetch flow. `on_progress` receives advisory
    /// percentages; delivery is best-effort and callers must tolerate
    /// ragged or absent reporting.
    pub async fn generate_with_progress(
        &self,
        text: &str,
        on_progress: impl Fn(u8),
    ) -> Result<Bytes, Error> {
        on_progress(10);
        let task_id = self.submit(text).await?;
        on_progress(40);

        let audio_url = self.poll(&task_id, &on_progress).await?;

        on_progress(85);
        let bytes = self.fetch(&audio_url).await?;
        on_progress(95);
        on_progress(100);

        Ok(bytes)
    }

    async fn submit(&self, text: &str) -> Result<String, Error> {
        self.event_log.log(
            EventLevel::Info,
            &format!("starting speech generation via {}", self.api_base),
        );

        let url = format!("{}/api/generate-speech", self.api_base);
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                text,
                voice_id: &self.voice,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            self.event_log.log(
                EventLevel::Error,
                &format!("generation request rejected: {status}"),
            );
            return Err(Error::Api { status, detail });
        }

        let created: GenerateResponse = response.json().await?;
        tracing::info!(task_id = %created.task_id, "generation_task_created");
        self.event_log
            .log(EventLevel::Success, &format!("task {} created", created.task_id));

        Ok(created.task_id)
    }

    /// Bounded fixed-interval poll. Every iteration consumes one attempt,
    /// including transport hiccups and unparseable bodies; only a terminal
    /// status ends the loop early.
    async fn poll(&self, task_id: &str, on_progress: &impl Fn(u8)) -> Result<String, Error> {
        let url = format!("{}/api/speech-status/{}", self.api_base, task_id);

        for attempt in 0..self.max_poll_attempts {
            let percent = 40 + (attempt * 40 / self.max_poll_attempts).min(40);
            on_progress(percent as u8);

            tokio::time::sleep(self.poll_interval).await;

            self.event_log.log(
                EventLevel::Info,
                &format!(
                    "polling status, attempt {}/{}",
                    attempt + 1,
                    self.max_poll_attempts
                ),
            );

            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    self.event_log
                        .log(EventLevel::Warning, &format!("status check failed: {e}"));
                    continue;
                }
            };

            if !response.status().is_success() {
                self.event_log.log(
                    EventLevel::Warning,
                    &format!("status check returned {}", response.status()),
                );
                continue;
            }

            let status: StatusResponse = match response.json().await {
                Ok(status) => status,
                Err(e) => {
                    self.event_log
                        .log(EventLevel::Warning, &format!("unreadable status body: {e}"));
                    continue;
                }
            };

            match status.status {
                TaskState::Completed => {
                    let audio_url = status.audio_url.ok_or(Error::MissingAudioUrl)?;
                    tracing::info!(task_id = %task_id, "generation_completed");
                    self.event_log
                        .log(EventLevel::Success, "speech generation complete");
                    return Ok(audio_url);
                }
                TaskState::Failed => {
                    let reason = status
                        .error
                        .unwrap_or_else(|| "unknown error".to_string());
                    self.event_log
                        .log(EventLevel::Error, &format!("generation failed: {reason}"));
                    return Err(Error::Failed(reason));
                }
                TaskState::Pending | TaskState::Processing => {}
            }
        }

        self.event_log.log(
            EventLevel::Error,
            "timed out waiting for speech generation to finish",
        );
        Err(Error::TimedOut {
            attempts: self.max_poll_attempts,
        })
    }

    async fn fetch(&self, audio_url: &str) -> Result<Bytes, Error> {
        let url = format!(
            "{}/api/download-audio?url={}",
            self.api_base,
            urlencoding::encode(audio_url)
        );
        self.event_log
            .log(EventLevel::Info, "downloading generated audio");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, detail });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(bytes = bytes.len(), "audio_downloaded");
        self.event_log.log(
            EventLevel::Success,
            &format!("received {} bytes of audio", bytes.len()),
        );

        Ok(bytes)
    }
}
