use crate::capture::{AudioStream, MicrophoneSource};
use noochat_core::{AudioPayload, ChatError, ChatResult};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Lifecycle of one recording attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No recording in progress.
    Idle,
    /// Waiting on the device-permission grant.
    Requesting,
    /// Capturing audio from the device.
    Recording,
    /// Assembling captured chunks into a payload.
    Encoding,
    /// Permission was refused; waiting for the caller to acknowledge.
    Failed,
}

/// The recording controller.
///
/// Wraps a [`MicrophoneSource`] and enforces the single-active-recording
/// invariant: `start` while recording and `stop` while idle are no-ops.
/// Each completed recording is fully consumed — converted into one
/// [`AudioPayload`] — before the next attempt may begin.
pub struct Recorder<S: MicrophoneSource> {
    source: S,
    state: RecorderState,
    stream: Option<Box<dyn AudioStream>>,
    started_at: Option<Instant>,
}

impl<S: MicrophoneSource> Recorder<S> {
    /// Creates an idle recorder over the given microphone.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RecorderState::Idle,
            stream: None,
            started_at: None,
        }
    }

    /// Current state of the recording attempt.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Time spent recording so far; zero in every other state.
    pub fn elapsed(&self) -> Duration {
        match (self.state, self.started_at) {
            (RecorderState::Recording, Some(started_at)) => started_at.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Starts a recording.
    ///
    /// No-op while already recording. From `Idle` this requests device
    /// permission; refusal moves the recorder to `Failed` and surfaces
    /// [`ChatError::PermissionDenied`] so the UI can prompt. A `Failed`
    /// recorder must be acknowledged before the next attempt.
    pub async fn start(&mut self) -> ChatResult<()> {
        match self.state {
            RecorderState::Recording => {
                debug!("start ignored, already recording");
                return Ok(());
            }
            RecorderState::Failed => {
                return Err(ChatError::PermissionDenied(
                    "previous permission failure not acknowledged".into(),
                ));
            }
            RecorderState::Requesting | RecorderState::Encoding => {
                debug!(state = ?self.state, "start ignored, attempt in progress");
                return Ok(());
            }
            RecorderState::Idle => {}
        }

        self.state = RecorderState::Requesting;
        match self.source.open().await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.started_at = Some(Instant::now());
                self.state = RecorderState::Recording;
                debug!("recording started");
                Ok(())
            }
            Err(e) => {
                self.state = RecorderState::Failed;
                warn!(error = %e, "microphone permission refused");
                Err(e)
            }
        }
    }

    /// Stops the active recording and returns the assembled payload.
    ///
    /// No-op returning `None` while idle. The device tracks are released
    /// unconditionally, whether or not any audio was captured.
    pub async fn stop(&mut self) -> Option<AudioPayload> {
        if self.state != RecorderState::Recording {
            debug!(state = ?self.state, "stop ignored, not recording");
            return None;
        }

        self.state = RecorderState::Encoding;
        self.started_at = None;

        // The stream is always present while Recording.
        let Some(mut stream) = self.stream.take() else {
            self.state = RecorderState::Idle;
            return None;
        };
        stream.stop();

        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next_chunk().await {
            bytes.extend_from_slice(&chunk);
        }
        let mime_type = stream.mime_type().to_string();
        stream.release();

        self.state = RecorderState::Idle;
        debug!(size_bytes = bytes.len(), "recording encoded");
        Some(AudioPayload {
            bytes,
            mime_type,
            file_name: "voice-message.webm".to_string(),
        })
    }

    /// Acknowledges a permission failure, returning the recorder to `Idle`.
    pub fn acknowledge_failure(&mut self) {
        if self.state == RecorderState::Failed {
            self.state = RecorderState::Idle;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// A scripted microphone: either refuses permission or yields a fixed
    /// set of chunks, counting how often tracks are released.
    struct MockMicrophone {
        deny: bool,
        chunks: Vec<Vec<u8>>,
        opens: Arc<AtomicU32>,
        releases: Arc<AtomicU32>,
    }

    impl MockMicrophone {
        fn granting(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                deny: false,
                chunks,
                opens: Arc::new(AtomicU32::new(0)),
                releases: Arc::new(AtomicU32::new(0)),
            }
        }

        fn denying() -> Self {
            Self {
                deny: true,
                chunks: Vec::new(),
                opens: Arc::new(AtomicU32::new(0)),
                releases: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    struct MockStream {
        buffered: Vec<Vec<u8>>,
        stopped: bool,
        releases: Arc<AtomicU32>,
    }

    #[async_trait]
    impl MicrophoneSource for MockMicrophone {
        async fn open(&self) -> ChatResult<Box<dyn AudioStream>> {
            if self.deny {
                return Err(ChatError::PermissionDenied("user refused".into()));
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockStream {
                buffered: self.chunks.clone(),
                stopped: false,
                releases: Arc::clone(&self.releases),
            }))
        }
    }

    #[async_trait]
    impl AudioStream for MockStream {
        async fn next_chunk(&mut self) -> Option<Vec<u8>> {
            assert!(self.stopped, "recorder must stop the stream before draining");
            if self.buffered.is_empty() {
                None
            } else {
                Some(self.buffered.remove(0))
            }
        }

        fn stop(&mut self) {
            self.stopped = true;
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_noop() {
        let mut recorder = Recorder::new(MockMicrophone::granting(vec![]));
        assert!(recorder.stop().await.is_none());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn start_while_recording_is_a_noop() {
        let mic = MockMicrophone::granting(vec![vec![1]]);
        let opens = Arc::clone(&mic.opens);
        let mut recorder = Recorder::new(mic);

        recorder.start().await.unwrap();
        assert_eq!(recorder.state(), RecorderState::Recording);
        recorder.start().await.unwrap();
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_concatenates_chunks_and_releases_once() {
        let mic = MockMicrophone::granting(vec![vec![1, 2], vec![3], vec![4, 5, 6]]);
        let releases = Arc::clone(&mic.releases);
        let mut recorder = Recorder::new(mic);

        recorder.start().await.unwrap();
        let payload = recorder.stop().await.unwrap();

        assert_eq!(payload.bytes, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(payload.mime_type, "audio/webm");
        assert_eq!(payload.file_name, "voice-message.webm");
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.state(), RecorderState::Idle);

        // A late stop does not release a second time.
        assert!(recorder.stop().await.is_none());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn permission_denied_surfaces_and_requires_acknowledgement() {
        let mut recorder = Recorder::new(MockMicrophone::denying());

        let err = recorder.start().await.unwrap_err();
        assert!(matches!(err, ChatError::PermissionDenied(_)));
        assert_eq!(recorder.state(), RecorderState::Failed);

        // Further starts are rejected until the failure is acknowledged.
        assert!(recorder.start().await.is_err());
        recorder.acknowledge_failure();
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn elapsed_runs_only_while_recording() {
        let mut recorder = Recorder::new(MockMicrophone::granting(vec![vec![1]]));
        assert_eq!(recorder.elapsed(), Duration::ZERO);

        recorder.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(recorder.elapsed() > Duration::ZERO);

        recorder.stop().await.unwrap();
        assert_eq!(recorder.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn empty_recording_still_releases_and_yields_payload() {
        let mic = MockMicrophone::granting(vec![]);
        let releases = Arc::clone(&mic.releases);
        let mut recorder = Recorder::new(mic);

        recorder.start().await.unwrap();
        let payload = recorder.stop().await.unwrap();
        assert!(payload.bytes.is_empty());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
