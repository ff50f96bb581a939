//! Display state and the values handed to the renderer.
//!
//! ## Submodules
//!
//! - [`coalescer`]: periodic drain-and-fold of channel messages
//! - [`level`]: noise level classification used to color the reading
//!
//! ## Data Flow
//!
//! ```text
//! ClassifiedMessage (from channel)
//!        │
//!        ▼
//! DisplayState::apply()   (last value wins, status side channel)
//!        │
//!        ▼
//! DisplayState::readout() ──▶ Readout (strings + styles for the UI)
//! ```

pub mod coalescer;
pub mod level;

pub use coalescer::{Coalescer, DisplaySettings};
pub use level::{LevelThresholds, NoiseLevel};

use chrono::{DateTime, Local};

use crate::feed::ClassifiedMessage;

/// Placeholder shown for the time of day before the first reading.
const NO_TIME: &str = "--:--:--";

/// Out-of-band text shown next to the reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusText {
    /// A non-numeric line from the device.
    Info(String),
    /// The transport failed.
    Error(String),
}

/// How the status line should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    None,
    Info,
    Error,
}

/// The consumer's working state.
///
/// Mutated only by the coalescer that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    latest_value: Option<f64>,
    last_update: Option<DateTime<Local>>,
    status: Option<StatusText>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_value(&self) -> Option<f64> {
        self.latest_value
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn status(&self) -> Option<&StatusText> {
        self.status.as_ref()
    }

    /// Raw status text, empty when there is none.
    pub fn status_text(&self) -> &str {
        match &self.status {
            Some(StatusText::Info(text) | StatusText::Error(text)) => text.as_str(),
            None => "",
        }
    }

    /// Fold one message into the state.
    ///
    /// A value replaces the reading and its timestamp together and clears
    /// the status. Status and transport errors only overwrite the status.
    pub fn apply(&mut self, message: ClassifiedMessage, at: DateTime<Local>) {
        match message {
            ClassifiedMessage::Value(value) => {
                self.latest_value = Some(value);
                self.last_update = Some(at);
                self.status = None;
            }
            ClassifiedMessage::Status(text) => self.status = Some(StatusText::Info(text)),
            ClassifiedMessage::TransportError(text) => self.status = Some(StatusText::Error(text)),
        }
    }

    /// Format the state for the renderer.
    pub fn readout(&self, unit: &str, thresholds: &LevelThresholds) -> Readout {
        let value = match self.latest_value {
            Some(v) => format!("{:.1} {}", v, unit),
            None => format!("--.- {}", unit),
        };
        let timestamp = self
            .last_update
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| NO_TIME.to_string());
        let (status, status_style) = match &self.status {
            Some(StatusText::Info(text)) => (format!("msg: {}", text), StatusStyle::Info),
            Some(StatusText::Error(text)) => (format!("serial error: {}", text), StatusStyle::Error),
            None => (String::new(), StatusStyle::None),
        };

        Readout {
            value,
            timestamp,
            status,
            status_style,
            level: self.latest_value.map(|v| thresholds.classify(v)),
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// Reading with one decimal and unit, or the placeholder.
    pub value: String,
    /// Local time of day of the last reading, or `--:--:--`.
    pub timestamp: String,
    /// Status line text, empty when there is none.
    pub status: String,
    pub status_style: StatusStyle,
    /// Noise level of the reading, if there is one.
    pub level: Option<NoiseLevel>,
}

impl Readout {
    /// `true` while no reading has been received.
    pub fn is_placeholder(&self) -> bool {
        self.level.is_none()
    }
}
