//! Session state and local artifact storage for the noochat engine.
//!
//! [`Session`] is the single source of truth for one conversational surface:
//! the ordered message timeline, the assistant-is-composing flag and the
//! active quick-reply set. [`ArtifactStore`] persists the single most-recent
//! analysis record as an opaque blob.

/// Artifact persistence for the most-recent analysis record.
pub mod artifact;
/// The per-surface conversation session.
pub mod session;

pub use artifact::{ArtifactStore, FileArtifactStore};
pub use session::Session;
