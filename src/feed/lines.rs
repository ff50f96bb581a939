//! Transport over any buffered reader.
//!
//! Used for standard input (`--port -`) and for feeding recorded lines in
//! tests.

use std::fmt;
use std::io::{self, BufRead};
use std::time::Duration;

use super::Transport;

/// Pause after end of input so an exhausted reader does not spin.
const EOF_PAUSE: Duration = Duration::from_millis(100);

/// A transport that reads newline-terminated lines from a [`BufRead`].
pub struct LineTransport<R> {
    reader: R,
    description: String,
    exhausted: bool,
}

impl<R: BufRead> LineTransport<R> {
    pub fn new(reader: R, description: &str) -> Self {
        Self {
            reader,
            description: format!("lines: {}", description),
            exhausted: false,
        }
    }
}

impl<R> fmt::Debug for LineTransport<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineTransport")
            .field("description", &self.description)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

impl<R: BufRead + Send> Transport for LineTransport<R> {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.exhausted {
            std::thread::sleep(EOF_PAUSE);
            return Ok(None);
        }

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line)? {
            0 => {
                self.exhausted = true;
                Ok(None)
            }
            _ => Ok(Some(line)),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_in_order() {
        let mut transport = LineTransport::new(Cursor::new("1.0\nhello\n2,5"), "test");
        assert_eq!(transport.read_line().unwrap(), Some(b"1.0\n".to_vec()));
        assert_eq!(transport.read_line().unwrap(), Some(b"hello\n".to_vec()));
        // Last line without a terminator is still delivered
        assert_eq!(transport.read_line().unwrap(), Some(b"2,5".to_vec()));
        assert_eq!(transport.read_line().unwrap(), None);
    }

    #[test]
    fn test_end_of_input_keeps_returning_none() {
        let mut transport = LineTransport::new(Cursor::new(""), "test");
        assert_eq!(transport.read_line().unwrap(), None);
        assert_eq!(transport.read_line().unwrap(), None);
    }

    #[test]
    fn test_description() {
        let transport = LineTransport::new(Cursor::new(""), "stdin");
        assert_eq!(transport.description(), "lines: stdin");
    }
}
