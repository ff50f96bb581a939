//! Device feed: transports, line classification and the background reader.
//!
//! The reader owns a [`Transport`] for its whole lifetime. Transports are
//! opened inside the reader so that a failed open is reported through the
//! channel like any other message.

mod lines;
pub mod parser;
mod reader;
mod serial;

pub use lines::LineTransport;
pub use parser::{classify_line, decode_line, ClassifiedMessage};
pub use reader::{FeedReader, ReaderStats};
pub use serial::{default_port, SerialSettings, SerialTransport};

use std::fmt::Debug;
use std::io;

use crate::error::FeedError;

/// A line-oriented byte stream from the measuring device.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use dbwatch::{LineTransport, Transport};
///
/// let mut transport = LineTransport::new(Cursor::new(b"42.5\n".to_vec()), "test");
/// let line = transport.read_line().unwrap();
/// assert_eq!(line.as_deref(), Some(&b"42.5\n"[..]));
/// ```
pub trait Transport: Send + Debug {
    /// Read one line, including its terminator if one arrived.
    ///
    /// Returns `Ok(None)` when nothing arrived before the read timeout.
    /// This is not an error; the caller simply reads again.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Returns a human-readable description of the transport.
    fn description(&self) -> &str;

    /// Release the underlying handle.
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Opens a transport from inside the reader.
pub type Opener = Box<dyn FnOnce() -> Result<Box<dyn Transport>, FeedError> + Send>;

/// Build an [`Opener`] for a port name.
///
/// The name `-` reads lines from standard input instead of a serial port.
pub fn opener_for(settings: SerialSettings) -> Opener {
    if settings.port == "-" {
        return Box::new(|| {
            let stdin = io::BufReader::new(io::stdin());
            Ok(Box::new(LineTransport::new(stdin, "stdin")) as Box<dyn Transport>)
        });
    }
    Box::new(move || Ok(Box::new(SerialTransport::open(&settings)?) as Box<dyn Transport>))
}
