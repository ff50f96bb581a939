//! Footer and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::duration::format_duration;

/// Render the footer with the refresh cadence and available controls.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.coalescer().settings();
    let text = format!(
        " Refresh every {} | ?:help q:quit",
        format_duration(settings.refresh_interval)
    );
    let paragraph = Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts and level thresholds.
///
/// Displayed as a centered modal on top of the meter.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let thresholds = &app.coalescer().settings().thresholds;
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  ?           Toggle this help"),
        Line::from("  q / Esc     Quit"),
        Line::from("  Ctrl-C      Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Levels",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(format!("  loud        above {:.1}", thresholds.loud_db)),
        Line::from(format!("  harmful     above {:.1}", thresholds.harmful_db)),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 13u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
