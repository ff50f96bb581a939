//! Line classification.
//!
//! Every non-empty line from the device becomes exactly one
//! [`ClassifiedMessage`]. Numbers become values, anything else is kept as
//! informational status text.

use std::borrow::Cow;

/// A message published by the feed reader.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedMessage {
    /// A finite numeric reading.
    Value(f64),
    /// A non-numeric line, kept verbatim.
    Status(String),
    /// The transport could not be opened or is unusable.
    TransportError(String),
}

impl ClassifiedMessage {
    /// Short label used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifiedMessage::Value(_) => "value",
            ClassifiedMessage::Status(_) => "status",
            ClassifiedMessage::TransportError(_) => "transport-error",
        }
    }
}

/// Decode raw bytes from the device, replacing anything that is not UTF-8.
pub fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Classify a raw line.
///
/// Returns `None` for empty or whitespace-only lines. A line that parses
/// as a number (with `.` or `,` as decimal separator) becomes a
/// [`ClassifiedMessage::Value`]; anything else becomes a
/// [`ClassifiedMessage::Status`] holding the trimmed line.
pub fn classify_line(line: &str) -> Option<ClassifiedMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match parse_reading(line) {
        Some(value) => Some(ClassifiedMessage::Value(value)),
        None => Some(ClassifiedMessage::Status(line.to_string())),
    }
}

fn parse_reading(line: &str) -> Option<f64> {
    let value = line
        .parse::<f64>()
        .ok()
        .or_else(|| line.replace(',', ".").parse::<f64>().ok())?;

    // "NaN" and "inf" parse fine but are not readings
    value.is_finite().then_some(value)
}
