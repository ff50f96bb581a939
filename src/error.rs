//! Error types for the feed pipeline and process lifecycle.

use std::io;

use thiserror::Error;

use crate::lifecycle::Phase;

/// Errors raised by a transport.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The transport could not be opened. Fatal for the reader.
    #[error("could not open {port}: {reason}")]
    Open { port: String, reason: String },
}

/// How the reader treats a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    /// Nothing arrived before the read timeout. Retry immediately.
    Idle,
    /// A recoverable hiccup. Pause briefly, then retry.
    Transient,
}

impl ReadFailure {
    /// Classify an I/O error from an open transport.
    ///
    /// Reads from an open transport never end the reader: the only
    /// distinction is whether to pause before retrying.
    pub fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ReadFailure::Idle,
            _ => ReadFailure::Transient,
        }
    }
}

/// Errors raised by the lifecycle controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested phase change is not allowed from the current phase.
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: Phase, to: Phase },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_idle() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "timeout");
        assert_eq!(ReadFailure::classify(&err), ReadFailure::Idle);
        let err = io::Error::new(io::ErrorKind::WouldBlock, "again");
        assert_eq!(ReadFailure::classify(&err), ReadFailure::Idle);
    }

    #[test]
    fn test_device_hiccups_are_transient() {
        for kind in [
            io::ErrorKind::Interrupted,
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::InvalidData,
            io::ErrorKind::Other,
        ] {
            let err = io::Error::new(kind, "hiccup");
            assert_eq!(ReadFailure::classify(&err), ReadFailure::Transient);
        }
    }

    #[test]
    fn test_open_error_message() {
        let err = FeedError::Open {
            port: "COM3".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(err.to_string(), "could not open COM3: No such file or directory");
    }
}
