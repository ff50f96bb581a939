//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::display::{NoiseLevel, StatusStyle};

/// Orange, used for loud readings and informational status text.
const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for the title and overlay borders.
    pub highlight: Color,
    /// Reading at or below the loud threshold.
    pub quiet: Color,
    /// Reading above the loud threshold.
    pub loud: Color,
    /// Reading above the harmful threshold.
    pub harmful: Color,
    /// Informational status text.
    pub info: Color,
    /// Transport errors.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for the title line.
    pub header: Style,
    /// Reading shown before any value arrived.
    pub placeholder: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            quiet: Color::Green,
            loud: ORANGE,
            harmful: Color::Red,
            info: ORANGE,
            error: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            quiet: Color::Green,
            loud: ORANGE,
            harmful: Color::Red,
            info: ORANGE,
            error: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for the reading, by noise level. `None` is the placeholder.
    pub fn level_style(&self, level: Option<NoiseLevel>) -> Style {
        match level {
            None => self.placeholder,
            Some(NoiseLevel::Quiet) => Style::default().fg(self.quiet).add_modifier(Modifier::BOLD),
            Some(NoiseLevel::Loud) => Style::default().fg(self.loud).add_modifier(Modifier::BOLD),
            Some(NoiseLevel::Harmful) => Style::default()
                .fg(self.harmful)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        }
    }

    /// Style for the status line.
    pub fn status_style(&self, style: StatusStyle) -> Style {
        match style {
            StatusStyle::None => Style::default(),
            StatusStyle::Info => Style::default().fg(self.info),
            StatusStyle::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
        }
    }
}
