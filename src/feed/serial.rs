//! Serial port transport.

use std::fmt;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::SerialPort;
use tracing::info;

use super::Transport;
use crate::error::FeedError;

/// Longest partial line kept while waiting for a terminator.
const MAX_LINE_BYTES: usize = 4096;

/// Serial connection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialSettings {
    /// Port name, e.g. `/dev/ttyUSB0` or `COM3`. `-` means standard input.
    pub port: String,
    pub baud: u32,
    /// Upper bound for a single read. Also bounds shutdown latency.
    pub read_timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: default_port().to_string(),
            baud: 115_200,
            read_timeout: Duration::from_secs(1),
        }
    }
}

/// Platform default port name.
pub fn default_port() -> &'static str {
    if cfg!(windows) {
        "COM3"
    } else {
        "/dev/ttyUSB0"
    }
}

/// Assembles lines from a byte stream, bounding each call to one read timeout.
#[derive(Debug)]
struct LineBuffer {
    pending: Vec<u8>,
    read_timeout: Duration,
}

impl LineBuffer {
    fn new(read_timeout: Duration) -> Self {
        Self {
            pending: Vec::with_capacity(64),
            read_timeout,
        }
    }

    /// Read until a line is complete or the read timeout has elapsed.
    ///
    /// On timeout whatever arrived so far is returned as the line, so a
    /// reading sent without a terminator still reaches the display.
    fn read_line<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<Option<Vec<u8>>> {
        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }

        let deadline = Instant::now() + self.read_timeout;
        let mut buf = [0u8; 256];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => return Ok(self.take_pending()),
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e)
                    if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) =>
                {
                    return Ok(self.take_pending())
                }
                Err(e) => return Err(e),
            }

            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            if Instant::now() >= deadline {
                return Ok(self.take_pending());
            }
        }
    }

    /// Split off the first complete line in the buffer, if any.
    fn take_line(&mut self) -> Option<Vec<u8>> {
        if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            return Some(self.pending.drain(..=pos).collect());
        }
        // A device that never sends a terminator must not grow the buffer forever
        if self.pending.len() >= MAX_LINE_BYTES {
            return Some(std::mem::take(&mut self.pending));
        }
        None
    }

    fn take_pending(&mut self) -> Option<Vec<u8>> {
        (!self.pending.is_empty()).then(|| std::mem::take(&mut self.pending))
    }
}

/// A serial port read line by line.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    description: String,
    lines: LineBuffer,
}

impl SerialTransport {
    /// Open the port described by `settings`.
    pub fn open(settings: &SerialSettings) -> Result<Self, FeedError> {
        let port = serialport::new(&settings.port, settings.baud)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| FeedError::Open {
                port: settings.port.clone(),
                reason: e.description,
            })?;

        info!(port = %settings.port, baud = settings.baud, "serial port opened");

        Ok(Self {
            port,
            description: format!("serial: {} @ {}", settings.port, settings.baud),
            lines: LineBuffer::new(settings.read_timeout),
        })
    }
}

impl fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransport")
            .field("description", &self.description)
            .field("pending", &self.lines.pending.len())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.lines.read_line(&mut *self.port)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.port.flush()
    }
}
