//! The noochat conversational session engine.
//!
//! One [`ChatEngine`] per conversational surface, parameterized by
//! [`EngineConfig`]. The engine turns a user utterance or recorded voice clip
//! into a request against the automation webhook, normalizes the webhook's
//! inconsistent response envelopes, and substitutes a deterministic local
//! fallback reply when the network path fails — the UI never sees a raw
//! backend error, only a degraded conversational turn.

/// Engine configuration: webhook endpoints, stage tags, timeout.
pub mod config;
/// The request orchestrator.
pub mod engine;
/// Response-envelope normalization.
pub mod envelope;
/// Deterministic local fallback replies.
pub mod fallback;
/// The cosmetic typewriter reveal for finalized assistant messages.
pub mod typewriter;

pub use config::EngineConfig;
pub use engine::ChatEngine;
pub use envelope::{normalize, Envelope};
pub use typewriter::Typewriter;
