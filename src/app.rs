//! Application state for the terminal display.

use std::time::Instant;

use crate::display::{Coalescer, Readout};
use crate::feed::SerialSettings;
use crate::ui::Theme;

/// Main application state.
///
/// Owns the coalescer, and with it the display state. Everything here is
/// touched only from the render loop.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    coalescer: Coalescer,
    /// Shown in the info line, e.g. `Port: COM3 @ 115200`.
    pub source_label: String,

    // UI
    pub theme: Theme,
}

impl App {
    pub fn new(coalescer: Coalescer, serial: &SerialSettings, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            coalescer,
            source_label: format!("Port: {} @ {}", serial.port, serial.baud),
            theme,
        }
    }

    /// The readout from the most recent display tick.
    pub fn readout(&self) -> &Readout {
        self.coalescer.readout()
    }

    pub fn coalescer(&self) -> &Coalescer {
        &self.coalescer
    }

    /// Run a display tick if one is due.
    ///
    /// Returns `true` if the readout was refreshed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.coalescer.poll(now).is_some()
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit. No further display ticks run.
    pub fn quit(&mut self) {
        self.running = false;
        self.coalescer.stop();
    }
}
