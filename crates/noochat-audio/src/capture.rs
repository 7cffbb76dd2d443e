use async_trait::async_trait;
use noochat_core::ChatResult;

/// A platform microphone that can open capture streams.
///
/// `open` suspends on the asynchronous device-permission grant and fails
/// with [`noochat_core::ChatError::PermissionDenied`] when access is refused.
#[async_trait]
pub trait MicrophoneSource: Send + Sync {
    /// Requests permission and opens a capture stream.
    async fn open(&self) -> ChatResult<Box<dyn AudioStream>>;
}

/// An open capture stream owned exclusively by the recorder.
#[async_trait]
pub trait AudioStream: Send {
    /// The next recorded chunk, or `None` once the stream has been stopped
    /// and its buffer drained.
    async fn next_chunk(&mut self) -> Option<Vec<u8>>;

    /// Signals the device to finalize; already-buffered chunks remain
    /// readable through [`Self::next_chunk`].
    fn stop(&mut self);

    /// Stops all underlying device tracks. Must be idempotent.
    fn release(&mut self);

    /// MIME type of the recorded container.
    fn mime_type(&self) -> &str {
        "audio/webm"
    }
}
