use crate::config::EngineConfig;
use crate::envelope::{self, Envelope};
use crate::fallback;
use chrono::Utc;
use noochat_core::{AudioPayload, ChatError, ChatResult, Message, QuickReply};
use noochat_session::Session;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Timeline placeholder for the user's side of a voice message.
const VOICE_PLACEHOLDER: &str = "🎤 Голосовое сообщение";

/// The request orchestrator for one conversational surface.
///
/// Owns the surface's [`Session`] and enforces the one-in-flight-request
/// invariant: a send attempted while another is pending is rejected with
/// [`ChatError::Busy`] instead of queued, which keeps assistant replies in
/// request order by construction. Transport and parse failures never escape
/// `send_text`/`send_audio` — they are recovered into a deterministic local
/// fallback reply, and the session always settles with `composing == false`.
pub struct ChatEngine {
    config: EngineConfig,
    http: reqwest::Client,
    session: Mutex<Session>,
    in_flight: AtomicBool,
}

impl ChatEngine {
    /// Creates an engine with a fresh session for the configured stage.
    pub fn new(config: EngineConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "http client build failed, default client has no request timeout");
                reqwest::Client::new()
            });
        let session = Session::new(config.stage.clone());
        Self {
            config,
            http,
            session: Mutex::new(session),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The immutable correlation id of the current session.
    pub fn session_id(&self) -> String {
        self.session.lock().session_id.clone()
    }

    /// Snapshot of the message timeline.
    pub fn messages(&self) -> Vec<Message> {
        self.session.lock().messages.clone()
    }

    /// Whether the assistant is currently composing a reply.
    pub fn is_composing(&self) -> bool {
        self.session.lock().composing
    }

    /// Snapshot of the active quick-reply set.
    pub fn quick_replies(&self) -> Vec<QuickReply> {
        self.session.lock().quick_replies.clone()
    }

    /// Resets the session; see [`Session::reset`].
    pub fn reset(&self, keep_id: bool) {
        self.session.lock().reset(keep_id);
    }

    /// Sends a text utterance and resolves to the assistant's reply.
    ///
    /// Blank utterances are rejected with [`ChatError::EmptyUtterance`] and a
    /// concurrent call with [`ChatError::Busy`]; neither appends anything to
    /// the timeline. Every other outcome appends exactly one user and one
    /// assistant message.
    pub async fn send_text(&self, utterance: &str) -> ChatResult<Message> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(ChatError::EmptyUtterance);
        }
        let _guard = self.begin_flight()?;

        let session_id = {
            let mut session = self.session.lock();
            session.set_composing(true);
            session.append_user_message(utterance);
            session.session_id.clone()
        };

        let mut payload = serde_json::json!({
            "question": utterance,
            "sessionId": session_id,
            "stage": self.config.stage,
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(agent_id) = self.config.agent_id {
            payload["agentId"] = serde_json::json!(agent_id);
        }

        let outcome = self.post_text(&payload).await;
        Ok(self.settle(outcome, utterance, &self.config.stage))
    }

    /// Sends a recorded voice clip and resolves to the assistant's reply.
    ///
    /// The timeline gets a fixed voice-message placeholder referencing the
    /// payload; the payload bytes are consumed by the multipart upload.
    pub async fn send_audio(&self, payload: AudioPayload) -> ChatResult<Message> {
        let _guard = self.begin_flight()?;

        let session_id = {
            let mut session = self.session.lock();
            session.set_composing(true);
            session.append_user_audio_message(VOICE_PLACEHOLDER, payload.attachment());
            session.session_id.clone()
        };

        let outcome = self.post_audio(payload, &session_id).await;
        Ok(self.settle(outcome, VOICE_PLACEHOLDER, self.config.audio_stage()))
    }

    /// Claims the single in-flight slot, or reports `Busy`.
    fn begin_flight(&self) -> ChatResult<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ChatError::Busy)?;
        Ok(FlightGuard { engine: self })
    }

    /// Resolves the network outcome into the final assistant message.
    ///
    /// The success path installs any quick replies the envelope carried; the
    /// failure path substitutes the local fallback so the caller never sees a
    /// transport or parse error.
    fn settle(&self, outcome: ChatResult<Envelope>, utterance: &str, stage: &str) -> Message {
        match outcome {
            Ok(envelope) => {
                debug!(stage, "webhook reply normalized");
                let mut session = self.session.lock();
                if let Some(replies) = envelope.quick_replies {
                    session.set_quick_replies(replies);
                }
                session.append_assistant_message(envelope.text)
            }
            Err(e) => {
                warn!(stage, error = %e, "webhook request failed, using local fallback");
                let text = fallback::respond(utterance, stage);
                self.session.lock().append_assistant_message(text)
            }
        }
    }

    async fn post_text(&self, payload: &serde_json::Value) -> ChatResult<Envelope> {
        let response = self
            .http
            .post(&self.config.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Self::read_envelope(response).await
    }

    async fn post_audio(&self, payload: AudioPayload, session_id: &str) -> ChatResult<Envelope> {
        let part = reqwest::multipart::Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.mime_type)
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("audio", part)
            .text("sessionId", session_id.to_string())
            .text("stage", self.config.audio_stage().to_string())
            .text("timestamp", Utc::now().to_rfc3339());
        if let Some(agent_id) = self.config.agent_id {
            form = form.text("agentId", agent_id.to_string());
        }

        let response = self
            .http
            .post(self.config.audio_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Self::read_envelope(response).await
    }

    async fn read_envelope(response: reqwest::Response) -> ChatResult<Envelope> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ChatError::Transport(format!("webhook returned {status}")));
        }
        envelope::normalize(&body)
    }
}

/// Scope guard for one request: releases the in-flight slot and clears the
/// composing flag on every exit path, early returns and panics included.
struct FlightGuard<'a> {
    engine: &'a ChatEngine,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.engine.session.lock().set_composing(false);
        self.engine.in_flight.store(false, Ordering::SeqCst);
    }
}
