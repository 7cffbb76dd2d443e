use chrono::{DateTime, Utc};
use noochat_core::{AudioAttachment, Message, QuickReply};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State for one conversational surface.
///
/// A dashboard may host several surfaces at once; each owns exactly one
/// `Session`. All mutations are synchronous and total — error handling lives
/// with the callers that produce the arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Correlation key sent with every webhook request; minted once at
    /// creation and never changed for the session's lifetime.
    pub session_id: String,
    /// Ordered message timeline; insertion order is display order.
    pub messages: Vec<Message>,
    /// Whether the assistant is currently composing a reply.
    pub composing: bool,
    /// The active quick-reply set for the latest assistant turn.
    pub quick_replies: Vec<QuickReply>,
    /// Conversation topic tag, used for fallback reply selection.
    pub topic_tag: String,
    /// UTC timestamp of session creation.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session for the given topic tag.
    pub fn new(topic_tag: impl Into<String>) -> Self {
        Self {
            session_id: mint_session_id(),
            messages: Vec::new(),
            composing: false,
            quick_replies: Vec::new(),
            topic_tag: topic_tag.into(),
            created_at: Utc::now(),
        }
    }

    /// Appends a user message and returns a clone of it.
    ///
    /// A new utterance always invalidates the quick-reply menu of the
    /// previous assistant turn, so the set is cleared unconditionally.
    pub fn append_user_message(&mut self, body: impl Into<String>) -> Message {
        let message = Message::user(body);
        self.quick_replies.clear();
        self.messages.push(message.clone());
        message
    }

    /// Appends a user voice-message placeholder carrying an audio reference.
    ///
    /// Clears the quick-reply set just like [`Self::append_user_message`].
    pub fn append_user_audio_message(
        &mut self,
        body: impl Into<String>,
        attachment: AudioAttachment,
    ) -> Message {
        let message = Message::user_audio(body, attachment);
        self.quick_replies.clear();
        self.messages.push(message.clone());
        message
    }

    /// Appends an assistant message and returns a clone of it.
    pub fn append_assistant_message(&mut self, body: impl Into<String>) -> Message {
        let message = Message::assistant(body);
        self.messages.push(message.clone());
        message
    }

    /// Sets the assistant-is-composing flag.
    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    /// Replaces the active quick-reply set.
    pub fn set_quick_replies(&mut self, replies: Vec<QuickReply>) {
        self.quick_replies = replies;
    }

    /// Clears messages, quick replies and the composing flag.
    ///
    /// With `keep_id == false` a fresh session id is minted; pass `true` to
    /// keep correlating follow-up requests with the existing backend state.
    pub fn reset(&mut self, keep_id: bool) {
        self.messages.clear();
        self.quick_replies.clear();
        self.composing = false;
        if !keep_id {
            self.session_id = mint_session_id();
        }
    }

    /// Number of messages in the timeline.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Mints a session id in the `session_<unix-millis>_<suffix>` shape the
/// backend's workflows key on.
fn mint_session_id() -> String {
    format!(
        "session_{}_{}",
        Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..9]
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use noochat_core::{AudioPayload, Role};

    fn some_replies() -> Vec<QuickReply> {
        vec![QuickReply {
            id: "1".into(),
            text: "Хроническая усталость".into(),
            value: "fatigue".into(),
        }]
    }

    #[test]
    fn session_id_shape() {
        let session = Session::new("chat");
        assert!(session.session_id.starts_with("session_"));
        assert_eq!(session.session_id.split('_').count(), 3);
    }

    #[test]
    fn append_user_message_clears_quick_replies() {
        let mut session = Session::new("chat");
        session.set_quick_replies(some_replies());
        assert_eq!(session.quick_replies.len(), 1);

        session.append_user_message("у меня болит голова");
        assert!(session.quick_replies.is_empty());
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages[0].role, Role::User);
    }

    #[test]
    fn append_assistant_message_keeps_quick_replies() {
        let mut session = Session::new("chat");
        session.set_quick_replies(some_replies());
        session.append_assistant_message("Здравствуйте!");
        assert_eq!(session.quick_replies.len(), 1);
    }

    #[test]
    fn audio_message_carries_attachment_and_clears_menu() {
        let mut session = Session::new("briefing_chat");
        session.set_quick_replies(some_replies());

        let payload = AudioPayload::webm(vec![0u8; 128]);
        let msg = session.append_user_audio_message("🎤 Голосовое сообщение", payload.attachment());
        assert!(session.quick_replies.is_empty());
        assert_eq!(msg.attachment.unwrap().size_bytes, 128);
    }

    #[test]
    fn reset_mints_fresh_id_by_default() {
        let mut session = Session::new("chat");
        let original_id = session.session_id.clone();
        session.append_user_message("привет");
        session.set_composing(true);

        session.reset(false);
        assert!(session.messages.is_empty());
        assert!(session.quick_replies.is_empty());
        assert!(!session.composing);
        assert_ne!(session.session_id, original_id);
    }

    #[test]
    fn reset_can_preserve_id() {
        let mut session = Session::new("chat");
        let original_id = session.session_id.clone();
        session.append_user_message("привет");

        session.reset(true);
        assert!(session.messages.is_empty());
        assert_eq!(session.session_id, original_id);
    }

    #[test]
    fn ordering_is_insertion_order() {
        let mut session = Session::new("chat");
        session.append_user_message("первый");
        session.append_assistant_message("второй");
        session.append_user_message("третий");

        let bodies: Vec<_> = session.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["первый", "второй", "третий"]);
    }
}
