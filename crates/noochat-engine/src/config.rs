use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_timeout_ms() -> u64 {
    12_000
}

/// Configuration for one conversational surface.
///
/// The same engine serves every surface of the product — onboarding,
/// briefing, the per-agent dashboards — differing only in this configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Webhook endpoint for text messages.
    pub webhook_url: String,
    /// Webhook endpoint for audio messages; text endpoint when absent.
    #[serde(default)]
    pub audio_webhook_url: Option<String>,
    /// Stage tag identifying the conversational flow (e.g. `briefing_chat`).
    pub stage: String,
    /// Stage tag for the audio path; `stage` when absent.
    #[serde(default)]
    pub audio_stage: Option<String>,
    /// Numeric agent id, for flows that address a named agent.
    #[serde(default)]
    pub agent_id: Option<i64>,
    /// Milliseconds to wait before a hung request counts as a transport
    /// failure.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl EngineConfig {
    /// Creates a configuration with default timeout and no audio overrides.
    pub fn new(webhook_url: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            audio_webhook_url: None,
            stage: stage.into(),
            audio_stage: None,
            agent_id: None,
            request_timeout_ms: default_timeout_ms(),
        }
    }

    /// Sets the dedicated audio endpoint and stage tag.
    pub fn with_audio(mut self, url: impl Into<String>, stage: impl Into<String>) -> Self {
        self.audio_webhook_url = Some(url.into());
        self.audio_stage = Some(stage.into());
        self
    }

    /// Sets the numeric agent id sent alongside every request.
    pub fn with_agent_id(mut self, agent_id: i64) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Endpoint used for the audio path.
    pub fn audio_url(&self) -> &str {
        self.audio_webhook_url.as_deref().unwrap_or(&self.webhook_url)
    }

    /// Stage tag used for the audio path.
    pub fn audio_stage(&self) -> &str {
        self.audio_stage.as_deref().unwrap_or(&self.stage)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
