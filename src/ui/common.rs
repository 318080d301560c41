//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::session::SessionState;

/// Render the header bar with connection status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.session.state();

    let (status_icon, status_style) = match state {
        SessionState::Live => (
            "●",
            Style::default().fg(app.theme.healthy).add_modifier(Modifier::BOLD),
        ),
        SessionState::Connecting => ("◌", Style::default().fg(app.theme.warning)),
        SessionState::Error => ("●", Style::default().fg(app.theme.critical)),
        SessionState::Idle | SessionState::Closed => {
            ("○", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let action = if app.session.has_connection() {
        "s:Stop Session"
    } else {
        "s:Start Tracking"
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("EYEGUARD ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(state.label(), status_style),
        Span::raw(" │ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(action, Style::default().fg(app.theme.highlight)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows time since last update, message counters and available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let view = app.session.view();
    let controls = "s:start/stop e:export f:save frame ?:help q:quit";

    let status = match (app.session.state(), view.last_updated()) {
        (SessionState::Connecting, _) => format!(" Connecting... | {}", controls),
        (SessionState::Live, Some(updated)) => format!(
            " Updated {:.1}s ago | {} received, {} dropped | {}",
            updated.elapsed().as_secs_f64(),
            view.received(),
            view.dropped(),
            controls,
        ),
        (SessionState::Live, None) => format!(" Waiting for telemetry... | {}", controls),
        (SessionState::Error, _) => format!(" Connection failed, closing... | {}", controls),
        (SessionState::Idle | SessionState::Closed, _) => format!(" Idle | {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Session",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s/Enter   Start or stop tracking"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e         Export metrics to JSON"),
        Line::from("  f         Save camera frame (JPEG)"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q/Esc     Quit"),
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
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 14u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
