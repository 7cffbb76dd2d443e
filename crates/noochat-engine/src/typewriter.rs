use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cosmetic typewriter reveal for a finalized assistant message.
///
/// Emits growing prefixes of the message over a channel, one character per
/// tick, always on UTF-8 character boundaries. Starting a new reveal cancels
/// the previous one, and dropping the presenter cancels the timer task — the
/// reveal never outlives its owner or its source message.
pub struct Typewriter {
    speed: Duration,
    task: Option<JoinHandle<()>>,
}

impl Typewriter {
    /// Creates a presenter emitting one character every `speed`.
    pub fn new(speed: Duration) -> Self {
        Self { speed, task: None }
    }

    /// Starts revealing `text`, cancelling any reveal in progress.
    ///
    /// The returned receiver yields each prefix in order and closes after the
    /// full text has been delivered, or early if the reveal is cancelled.
    pub fn reveal(&mut self, text: impl Into<String>) -> mpsc::Receiver<String> {
        self.cancel();

        let text = text.into();
        let speed = self.speed;
        let (tx, rx) = mpsc::channel(64);

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(speed);
            let ends: Vec<usize> = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
            for end in ends {
                interval.tick().await;
                // Receiver dropped: the surface went away, stop quietly.
                if tx.send(text[..end].to_string()).await.is_err() {
                    return;
                }
            }
        }));

        rx
    }

    /// Cancels the reveal in progress, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.cancel();
    }
}
