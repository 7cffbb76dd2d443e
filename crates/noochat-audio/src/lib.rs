//! Audio capture for voice messages.
//!
//! The platform microphone is consumed through the [`MicrophoneSource`] /
//! [`AudioStream`] seam so the [`Recorder`] state machine stays testable
//! without hardware. One completed recording yields one
//! [`noochat_core::AudioPayload`].

/// The microphone capture seam.
pub mod capture;
/// The recording controller state machine.
pub mod recorder;

pub use capture::{AudioStream, MicrophoneSource};
pub use recorder::{Recorder, RecorderState};
