//! Process lifecycle: starts the feed reader and shuts it down.
//!
//! ```text
//! Idle ──start──▶ Running ──shutdown──▶ ShuttingDown ──terminate──▶ Terminated
//!   └──────────────────────terminate─────────────────────────────────▲
//! ```
//!
//! Shutdown is cooperative. The reader checks the cancellation token once
//! per read, so it exits within one read timeout. The reader is never
//! joined: it is a background task whose exit is best effort.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::LifecycleError;
use crate::feed::FeedReader;

/// Process-level phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Reader active, display ticking.
    Running,
    /// Cancellation requested, display stopped.
    ShuttingDown,
    Terminated,
}

/// Owns the cancellation token and the reader task.
#[derive(Debug)]
pub struct Lifecycle {
    phase: Phase,
    cancel: CancellationToken,
    reader: Option<JoinHandle<()>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            cancel: CancellationToken::new(),
            reader: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The token the reader must observe.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the reader. Must be called inside a tokio runtime.
    pub fn start(&mut self, reader: FeedReader) -> Result<(), LifecycleError> {
        self.transition(Phase::Running)?;
        self.reader = Some(reader.spawn());
        info!("feed reader started");
        Ok(())
    }

    /// Request shutdown. Does not wait for the reader.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        self.transition(Phase::ShuttingDown)?;
        self.cancel.cancel();
        info!("shutdown requested");
        Ok(())
    }

    /// Mark the process finished and detach the reader task.
    pub fn terminate(&mut self) -> Result<(), LifecycleError> {
        self.transition(Phase::Terminated)?;
        if let Some(handle) = self.reader.take() {
            info!(reader_finished = handle.is_finished(), "terminated");
        }
        Ok(())
    }

    /// `true` once the reader task has returned (or was never started).
    pub fn reader_finished(&self) -> bool {
        self.reader.as_ref().is_none_or(|h| h.is_finished())
    }

    fn transition(&mut self, to: Phase) -> Result<(), LifecycleError> {
        let allowed = matches!(
            (self.phase, to),
            (Phase::Idle, Phase::Running)
                | (Phase::Running, Phase::ShuttingDown)
                | (Phase::ShuttingDown, Phase::Terminated)
                | (Phase::Idle, Phase::Terminated)
        );
        if !allowed {
            return Err(LifecycleError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::latest_wins;
    use crate::feed::{ClassifiedMessage, LineTransport, Opener, Transport};
    use std::io::Cursor;
    use std::time::Duration;

    fn cursor_opener(data: &'static str) -> Opener {
        Box::new(move || {
            Ok(Box::new(LineTransport::new(Cursor::new(data), "test")) as Box<dyn Transport>)
        })
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), Phase::Idle);

        let (publisher, drain) = latest_wins();
        let reader = FeedReader::new(cursor_opener("70.4\n"), publisher, lifecycle.token());
        lifecycle.start(reader).unwrap();
        assert_eq!(lifecycle.phase(), Phase::Running);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(drain.try_take(), Some(ClassifiedMessage::Value(70.4)));

        lifecycle.shutdown().unwrap();
        assert_eq!(lifecycle.phase(), Phase::ShuttingDown);
        assert!(lifecycle.token().is_cancelled());

        // The reader notices within one read (end-of-input pause here)
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(lifecycle.reader_finished());

        lifecycle.terminate().unwrap();
        assert_eq!(lifecycle.phase(), Phase::Terminated);
    }

    #[tokio::test]
    async fn test_no_restart_after_terminate() {
        let mut lifecycle = Lifecycle::new();
        let (publisher, _drain) = latest_wins();
        lifecycle.terminate().unwrap();

        let reader = FeedReader::new(cursor_opener(""), publisher, lifecycle.token());
        assert_eq!(
            lifecycle.start(reader),
            Err(LifecycleError::InvalidTransition {
                from: Phase::Terminated,
                to: Phase::Running,
            })
        );
    }

    #[test]
    fn test_shutdown_requires_running() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(
            lifecycle.shutdown(),
            Err(LifecycleError::InvalidTransition {
                from: Phase::Idle,
                to: Phase::ShuttingDown,
            })
        );
        assert!(!lifecycle.token().is_cancelled());
    }

    #[test]
    fn test_reader_finished_when_never_started() {
        let lifecycle = Lifecycle::new();
        assert!(lifecycle.reader_finished());
    }
}
