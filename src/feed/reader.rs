//! Background feed reader.
//!
//! Opens the transport once, then reads, classifies and publishes lines
//! until cancelled. Cancellation is checked once per read, so shutdown
//! takes at most one read timeout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::parser::{classify_line, decode_line, ClassifiedMessage};
use super::{Opener, Transport};
use crate::channel::Publisher;
use crate::error::ReadFailure;

/// Default pause after a transient read failure.
pub const DEFAULT_RETRY_PAUSE: Duration = Duration::from_millis(100);

/// Counters kept by the reader.
#[derive(Debug, Default)]
pub struct ReaderStats {
    lines: AtomicU64,
    values: AtomicU64,
    statuses: AtomicU64,
    read_errors: AtomicU64,
}

impl ReaderStats {
    /// Lines received, including blank ones.
    pub fn lines(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn values(&self) -> u64 {
        self.values.load(Ordering::Relaxed)
    }

    pub fn statuses(&self) -> u64 {
        self.statuses.load(Ordering::Relaxed)
    }

    /// Transient read failures that were retried.
    pub fn read_errors(&self) -> u64 {
        self.read_errors.load(Ordering::Relaxed)
    }

    fn record(&self, message: &ClassifiedMessage) {
        let counter = match message {
            ClassifiedMessage::Value(_) => &self.values,
            _ => &self.statuses,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owns the transport and feeds classified messages into the channel.
pub struct FeedReader {
    opener: Opener,
    publisher: Publisher<ClassifiedMessage>,
    cancel: CancellationToken,
    retry_pause: Duration,
    stats: Arc<ReaderStats>,
}

/// Closes the transport however the read loop ends.
struct TransportGuard(Option<Box<dyn Transport>>);

impl Drop for TransportGuard {
    fn drop(&mut self) {
        if let Some(transport) = self.0.take() {
            let description = transport.description().to_string();
            match transport.close() {
                Ok(()) => info!(transport = %description, "transport closed"),
                Err(e) => warn!(transport = %description, error = %e, "closing transport failed"),
            }
        }
    }
}

impl FeedReader {
    pub fn new(
        opener: Opener,
        publisher: Publisher<ClassifiedMessage>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            opener,
            publisher,
            cancel,
            retry_pause: DEFAULT_RETRY_PAUSE,
            stats: Arc::new(ReaderStats::default()),
        }
    }

    /// Set the pause after a transient read failure.
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    /// Shared handle to the reader's counters.
    pub fn stats(&self) -> Arc<ReaderStats> {
        self.stats.clone()
    }

    /// Run the reader on a blocking worker and return without waiting for it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || self.run())
    }

    /// Run the read loop on the current thread until cancelled.
    pub fn run(self) {
        let FeedReader {
            opener,
            publisher,
            cancel,
            retry_pause,
            stats,
        } = self;

        let transport = match opener() {
            Ok(transport) => transport,
            Err(e) => {
                warn!(error = %e, "transport unavailable, reader stopping");
                publisher.publish(ClassifiedMessage::TransportError(e.to_string()));
                return;
            }
        };

        let mut guard = TransportGuard(Some(transport));

        while !cancel.is_cancelled() {
            let Some(transport) = guard.0.as_deref_mut() else {
                break;
            };
            match transport.read_line() {
                Ok(None) => continue,
                Ok(Some(bytes)) => {
                    stats.lines.fetch_add(1, Ordering::Relaxed);
                    let line = decode_line(&bytes);
                    let Some(message) = classify_line(&line) else {
                        continue;
                    };
                    stats.record(&message);
                    debug!(kind = message.kind(), line = %line.trim(), "line classified");
                    publisher.publish(message);
                }
                Err(e) => match ReadFailure::classify(&e) {
                    ReadFailure::Idle => continue,
                    ReadFailure::Transient => {
                        stats.read_errors.fetch_add(1, Ordering::Relaxed);
                        debug!(error = %e, "transient read failure, retrying");
                        std::thread::sleep(retry_pause);
                    }
                },
            }
        }

        info!(
            lines = stats.lines(),
            values = stats.values(),
            statuses = stats.statuses(),
            read_errors = stats.read_errors(),
            superseded = publisher.superseded(),
            "feed reader stopped"
        );
    }
}
