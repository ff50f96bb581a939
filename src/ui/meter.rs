//! Meter view: title, reading, last-update line and status line.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the meter into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let readout = app.readout();
    let theme = &app.theme;

    let chunks = Layout::vertical([
        Constraint::Length(1), // Top margin
        Constraint::Length(1), // Title
        Constraint::Length(1), // Gap
        Constraint::Length(3), // Reading
        Constraint::Length(1), // Port and last update
        Constraint::Length(1), // Status
        Constraint::Min(0),
    ])
    .split(area);

    let title = Paragraph::new(Line::styled("Sound Level Meter", theme.header))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[1]);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    if let Some(level) = readout.level {
        block = block.title(Line::from(format!(" {} ", level.label())).centered());
    }
    let reading = Paragraph::new(Line::from(Span::styled(
        readout.value.as_str(),
        theme.level_style(readout.level),
    )))
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(reading, centered_width(chunks[3], 28));

    let info = Paragraph::new(format!(
        "{}  |  Last update: {}",
        app.source_label, readout.timestamp
    ))
    .alignment(Alignment::Center);
    frame.render_widget(info, chunks[4]);

    let status = Paragraph::new(readout.status.as_str())
        .style(theme.status_style(readout.status_style))
        .alignment(Alignment::Center);
    frame.render_widget(status, chunks[5]);
}

/// A horizontally centered slice of `area`, at most `width` wide.
fn centered_width(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}
