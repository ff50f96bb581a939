//! Terminal rendering.
//!
//! - [`meter`]: the reading, last-update line and status line
//! - [`common`]: footer and help overlay
//! - [`theme`]: colors

pub mod common;
pub mod meter;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let y = area.height.saturating_sub(2) / 2;
        let centered = Rect::new(0, y, area.width, area.height.min(2));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Min(8),    // Meter
        Constraint::Length(1), // Footer
    ])
    .split(area);

    meter::render(frame, app, chunks[0]);
    common::render_footer(frame, app, chunks[1]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::feed::ClassifiedMessage;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_placeholder_before_first_reading() {
        let (_publisher, app) = test_app();
        let text = screen(&app, 60, 14);
        assert!(text.contains("Sound Level Meter"));
        assert!(text.contains("--.- dB"));
        assert!(text.contains("Last update: --:--:--"));
    }

    #[test]
    fn test_reading_and_status_rendered() {
        let (publisher, mut app) = test_app();
        publisher.publish(ClassifiedMessage::Value(55.3));
        app.on_tick(Instant::now() + Duration::from_millis(200));
        let text = screen(&app, 60, 14);
        assert!(text.contains("55.3 dB"));
        assert!(text.contains("Port: COM3 @ 115200"));

        publisher.publish(ClassifiedMessage::TransportError("gone".to_string()));
        app.on_tick(Instant::now() + Duration::from_secs(2));
        let text = screen(&app, 60, 14);
        assert!(text.contains("55.3 dB"));
        assert!(text.contains("serial error: gone"));
    }

    #[test]
    fn test_small_terminal_warning() {
        let (_publisher, app) = test_app();
        let text = screen(&app, 30, 6);
        assert!(text.contains("Terminal too small"));
    }
}
