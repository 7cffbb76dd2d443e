//! Core types and error definitions for the noochat conversational engine.
//!
//! This crate provides the foundational types shared across all noochat
//! crates: the message timeline element, quick-reply chips, audio payloads
//! and the unified error enum.
//!
//! # Main types
//!
//! - [`ChatError`] — Unified error enum for all noochat subsystems.
//! - [`ChatResult`] — Convenience alias for `Result<T, ChatError>`.
//! - [`Role`] — Message author (user or assistant).
//! - [`Message`] — A single message within a conversation session.
//! - [`QuickReply`] — A pre-canned, user-selectable reply chip.
//! - [`AudioPayload`] — One completed voice recording, ready for dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Error types ---

/// Top-level error type for the noochat engine.
///
/// `Transport` and `EnvelopeParse` never escape the request orchestrator —
/// both are recovered into a local fallback reply. `PermissionDenied` and
/// `Busy` are surfaced to the UI so it can prompt or disable controls.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The webhook call failed: network error, timeout, or non-2xx status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The webhook returned a body none of the known envelope shapes match.
    #[error("Envelope parse error: {0}")]
    EnvelopeParse(String),

    /// Microphone access was refused by the platform or the user.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A send was attempted while another request is still in flight.
    #[error("A request is already in flight for this session")]
    Busy,

    /// A send was attempted with a blank utterance.
    #[error("Utterance is empty")]
    EmptyUtterance,

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`ChatError`].
pub type ChatResult<T> = Result<T, ChatError>;

// --- Message types ---

/// The role of the participant that authored a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human end-user.
    User,
    /// The AI assistant.
    Assistant,
}

/// Metadata for the audio payload attached to a voice message.
///
/// The payload bytes themselves are consumed by the outbound request; the
/// timeline only keeps this reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttachment {
    /// File name the payload was shipped under (e.g. `voice-message.webm`).
    pub file_name: String,
    /// MIME type of the recorded container.
    pub mime_type: String,
    /// Size of the payload in bytes.
    pub size_bytes: usize,
}

/// A single message within a conversation session.
///
/// Messages are immutable once appended; insertion order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: Uuid,
    /// The role of the message author.
    pub role: Role,
    /// The textual content; assistant bodies may contain markdown.
    pub body: String,
    /// UTC timestamp of when the message was created.
    pub created_at: DateTime<Utc>,
    /// Reference to the audio payload, for voice messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AudioAttachment>,
}

impl Message {
    /// Creates a new message with the given role and body.
    pub fn new(role: Role, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            body: body.into(),
            created_at: Utc::now(),
            attachment: None,
        }
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(body: impl Into<String>) -> Self {
        Self::new(Role::User, body)
    }

    /// Creates a new message with [`Role::Assistant`].
    pub fn assistant(body: impl Into<String>) -> Self {
        Self::new(Role::Assistant, body)
    }

    /// Creates a user voice message carrying an attachment reference.
    pub fn user_audio(body: impl Into<String>, attachment: AudioAttachment) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::new(Role::User, body)
        }
    }
}

// --- Quick replies ---

/// A pre-canned, user-selectable reply chip surfaced by an assistant turn.
///
/// `text` is the label shown on the chip; `value` is the utterance sent when
/// the chip is tapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    /// Chip identifier, unique within one assistant turn.
    pub id: String,
    /// Label displayed to the user.
    pub text: String,
    /// Utterance submitted when the chip is selected.
    pub value: String,
}

// --- Audio payload ---

/// One completed voice recording, produced by the recording controller and
/// consumed by the request orchestrator's multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    /// Concatenated audio chunks in the recorded container format.
    pub bytes: Vec<u8>,
    /// MIME type of the container.
    pub mime_type: String,
    /// File name used for the multipart `audio` part.
    pub file_name: String,
}

impl AudioPayload {
    /// Creates a payload with the default webm container naming.
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "audio/webm".to_string(),
            file_name: "voice-message.webm".to_string(),
        }
    }

    /// Attachment metadata referencing this payload.
    pub fn attachment(&self) -> AudioAttachment {
        AudioAttachment {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.bytes.len(),
        }
    }
}
