//! Normalization of the webhook's response envelopes.
//!
//! The automation backend emits at least four shapes for the same logical
//! reply: a bare `{"comment": …}` or `{"response": …}` object, a
//! single-element array whose element carries either `comment` directly or a
//! second JSON document string-encoded inside an `output` field, and plain
//! empty or non-JSON bodies. The client does not control that tool, so the
//! layered parse below is a load-bearing contract — the branches must be kept
//! exactly as observed, not "cleaned up".

use noochat_core::{ChatError, ChatResult, QuickReply};

/// A normalized assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// The assistant's reply text.
    pub text: String,
    /// Quick replies carried by the envelope. `None` means "no menu update",
    /// not "clear the menu" — clearing is driven only by new user input.
    pub quick_replies: Option<Vec<QuickReply>>,
}

/// Normalizes a raw response body into an [`Envelope`].
///
/// Priority order: empty bodies fail; then a JSON parse; then the
/// nested double-encoded `output` branch for array envelopes; then a direct
/// `comment`/`response` field on the array element or bare object; anything
/// else fails. Failures land in [`ChatError::EnvelopeParse`].
pub fn normalize(raw: &str) -> ChatResult<Envelope> {
    if raw.trim().is_empty() {
        return Err(ChatError::EnvelopeParse("empty body".into()));
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ChatError::EnvelopeParse(format!("body is not JSON: {e}")))?;

    let element = match value.as_array() {
        Some(array) => array
            .first()
            .ok_or_else(|| ChatError::EnvelopeParse("empty array envelope".into()))?,
        None => &value,
    };

    // Array envelopes may string-encode a second JSON document in `output`.
    if value.is_array() {
        if let Some(output) = element.get("output").and_then(|v| v.as_str()) {
            let nested: serde_json::Value = serde_json::from_str(output)
                .map_err(|e| ChatError::EnvelopeParse(format!("nested output is not JSON: {e}")))?;
            let text = reply_text(&nested).ok_or_else(|| {
                ChatError::EnvelopeParse("nested output has neither comment nor response".into())
            })?;
            return Ok(Envelope {
                text,
                quick_replies: quick_replies_of(&nested).or_else(|| quick_replies_of(element)),
            });
        }
    }

    let text = reply_text(element).ok_or_else(|| {
        ChatError::EnvelopeParse("envelope has neither comment nor response".into())
    })?;
    Ok(Envelope {
        text,
        quick_replies: quick_replies_of(element),
    })
}

/// `comment` wins over `response` when both are present.
fn reply_text(value: &serde_json::Value) -> Option<String> {
    value
        .get("comment")
        .or_else(|| value.get("response"))
        .and_then(|v| v.as_str())
        .map(ToOwned::to_owned)
}

/// A malformed `quickReplies` field is treated as absent rather than failing
/// a normalization whose text already succeeded.
fn quick_replies_of(value: &serde_json::Value) -> Option<Vec<QuickReply>> {
    let field = value.get("quickReplies")?;
    serde_json::from_value(field.clone()).ok()
}
