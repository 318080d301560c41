//! Dashboard rendering.
//!
//! Shows the error banner, the alert banner, and while the session is live
//! the camera panel, status lights, stat cards, eye-openness bar, trends
//! and the advisory tip.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::derived::{BASELINE_BPM, EAR_CLOSED_THRESHOLD};
use crate::data::{AlertPresentation, Dashboard, Indicator, Tier};
use crate::session::SessionView;
use crate::source::MetricsSnapshot;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the dashboard into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.session.view();
    let dashboard = view.dashboard();
    let alert = dashboard.as_ref().and_then(|d| d.alert.as_ref());

    let mut constraints = Vec::new();
    if view.error().is_some() {
        constraints.push(Constraint::Length(3));
    }
    if alert.is_some() {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Min(8));
    let chunks = Layout::vertical(constraints).split(area);

    let mut next = 0;
    if let Some(text) = view.error_text() {
        render_error_banner(frame, app, &text, chunks[next]);
        next += 1;
    }
    if let Some(alert) = alert {
        render_alert_banner(frame, app, alert, chunks[next]);
        next += 1;
    }

    let content = chunks[next];
    match (&dashboard, view.metrics()) {
        (Some(dashboard), Some(metrics)) if view.running() => {
            render_live(frame, app, view, metrics, dashboard, content)
        }
        _ if view.running() => render_live_waiting(frame, app, view, content),
        _ => render_idle(frame, app, view.metrics(), content),
    }
}

fn render_error_banner(frame: &mut Frame, app: &App, text: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.critical));
    let paragraph = Paragraph::new(format!("⚠ {}", text))
        .style(Style::default().fg(app.theme.critical))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_alert_banner(frame: &mut Frame, app: &App, alert: &AlertPresentation, area: Rect) {
    let color = app.theme.alert_color(alert.color);
    let icon = match alert.icon {
        "eye-off" => "◌",
        _ => "▲",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::styled(alert.label, Style::default().add_modifier(Modifier::BOLD)),
    ])];
    if let Some(ref tip) = alert.tip {
        lines.push(Line::from(tip.clone()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_idle(frame: &mut Frame, app: &App, last: Option<&MetricsSnapshot>, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled(
                "s",
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to start tracking"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "The backend's webcam will activate and your eye health is monitored in real time.",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    if let Some(metrics) = last {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Last reading: {} blinks in {}, {} blinks/min",
                metrics.blink_count,
                crate::data::format_elapsed(Some(metrics.session_seconds)),
                format_number(metrics.bpm),
            ),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_live_waiting(frame: &mut Frame, app: &App, view: &SessionView, area: Rect) {
    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    render_camera(frame, app, view, columns[0]);
}

fn render_live(
    frame: &mut Frame,
    app: &App,
    view: &SessionView,
    metrics: &MetricsSnapshot,
    dashboard: &Dashboard,
    area: Rect,
) {
    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left: camera + status lights
    let left = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(columns[0]);
    render_camera(frame, app, view, left[0]);
    render_indicators(
        frame,
        app,
        &[dashboard.face, dashboard.distance, dashboard.alertness],
        left[1],
    );

    // Right: stats
    let right = Layout::vertical([
        Constraint::Length(4), // Blink rate / total blinks
        Constraint::Length(4), // Session time / drop
        Constraint::Length(3), // Eye openness
        Constraint::Length(4), // Trends
        Constraint::Min(0),    // Tip
    ])
    .split(columns[1]);

    let row1 = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[0]);
    let row2 = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);

    let bpm_color = app.theme.tier_color(dashboard.bpm_tier);
    render_stat_card(
        frame,
        app,
        "Blink Rate",
        format_number(metrics.bpm),
        &format!("blinks / min (normal: {})", format_number(BASELINE_BPM)),
        bpm_color,
        row1[0],
    );
    render_stat_card(
        frame,
        app,
        "Total Blinks",
        metrics.blink_count.to_string(),
        "this session",
        app.theme.counter,
        row1[1],
    );
    render_stat_card(
        frame,
        app,
        "Session Time",
        dashboard.elapsed.clone(),
        "mm:ss",
        app.theme.tier_color(Tier::Neutral),
        row2[0],
    );
    render_stat_card(
        frame,
        app,
        "BPM Drop",
        format!("{}%", format_number(metrics.bpm_drop_pct)),
        "vs normal baseline",
        app.theme.tier_color(dashboard.drop_tier),
        row2[1],
    );

    render_openness(frame, app, metrics.ear, dashboard.openness, right[2]);
    render_trends(frame, app, view, right[3]);

    if let Some(ref tip) = dashboard.standalone_tip {
        render_tip(frame, app, tip, right[4]);
    }
}

fn render_camera(frame: &mut Frame, app: &App, view: &SessionView, area: Rect) {
    let block = Block::default()
        .title(" Camera ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = match view.frame() {
        Some(current) => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(app.theme.healthy)),
                Span::raw("Receiving frames"),
            ]),
            Line::from(Span::styled(
                format!("latest: {} JPEG", format_bytes(current.approx_len())),
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(Span::styled(
                "f: save current frame",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for camera...",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ],
    };

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn render_indicators(frame: &mut Frame, app: &App, indicators: &[Indicator], area: Rect) {
    let constraints: Vec<Constraint> = indicators
        .iter()
        .map(|_| Constraint::Ratio(1, indicators.len() as u32))
        .collect();
    let cells = Layout::horizontal(constraints).split(area);

    for (indicator, cell) in indicators.iter().zip(cells.iter()) {
        let color = app.theme.tier_color(indicator.tier);
        let mark = if indicator.tier == Tier::Healthy { "✓" } else { "⚠" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(color));
        let paragraph = Paragraph::new(format!("{} {}", mark, indicator.label))
            .alignment(Alignment::Center)
            .style(app.theme.tier_style(indicator.tier))
            .block(block);
        frame.render_widget(paragraph, *cell);
    }
}

fn render_stat_card(
    frame: &mut Frame,
    app: &App,
    label: &str,
    value: String,
    caption: &str,
    color: ratatui::style::Color,
    area: Rect,
) {
    let block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(color));

    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            caption.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_openness(frame: &mut Frame, app: &App, ear: f64, fill: f64, area: Rect) {
    let block = Block::default()
        .title(format!(
            " Eye Openness (EAR) · below {} = eye closed ",
            EAR_CLOSED_THRESHOLD
        ))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(app.theme.tier_color(Tier::Neutral)))
        .ratio((fill / 100.0).clamp(0.0, 1.0))
        .label(format!("{}", ear));
    frame.render_widget(gauge, area);
}

fn render_trends(frame: &mut Frame, app: &App, view: &SessionView, area: Rect) {
    let block = Block::default()
        .title(" Trend ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    // Label column plus borders
    let width = area.width.saturating_sub(8) as usize;
    let history = view.history();
    let lines = vec![
        Line::from(vec![
            Span::styled("BPM  ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                render_sparkline(&history.bpm_levels(), width),
                Style::default().fg(app.theme.highlight),
            ),
        ]),
        Line::from(vec![
            Span::styled("EAR  ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                render_sparkline(&history.ear_levels(), width),
                Style::default().fg(app.theme.neutral),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tip(frame: &mut Frame, app: &App, tip: &str, area: Rect) {
    if area.height < 3 {
        return;
    }
    let block = Block::default()
        .title(Span::styled(" ⚡ AI Health Tip ", Style::default().fg(app.theme.neutral)))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.neutral));
    let paragraph = Paragraph::new(tip.to_string())
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Render the last `width` levels as sparkline characters.
fn render_sparkline(levels: &[u8], width: usize) -> String {
    let start = levels.len().saturating_sub(width);
    levels[start..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

/// Format a metric without a trailing `.0` for whole numbers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Format a byte count for display (e.g., 1234 -> "1.2 KB").
fn format_bytes(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1} MB", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1} KB", n as f64 / 1_000.0)
    } else {
        format!("{} B", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use ratatui::{backend::TestBackend, Terminal};

    use crate::session::Session;
    use crate::source::{ChannelConnector, ChannelFeed};
    use crate::ui::Theme;

    fn app() -> (ChannelFeed, App) {
        let (feed, connector) = ChannelConnector::create("test");
        let session = Session::new(Box::new(connector));
        (feed, App::new(session, Theme::dark(), PathBuf::from(".")))
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(6.0), "6");
        assert_eq!(format_number(61.3), "61.3");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(12_345), "12.3 KB");
        assert_eq!(format_bytes(2_500_000), "2.5 MB");
    }

    #[test]
    fn test_render_sparkline_keeps_latest() {
        assert_eq!(render_sparkline(&[0, 7, 3], 8), "▁█▄");
        assert_eq!(render_sparkline(&[0, 7, 3], 2), "█▄");
        assert_eq!(render_sparkline(&[], 4), "");
    }

    #[test]
    fn test_idle_screen() {
        let (_feed, app) = app();
        let screen = draw(&app);
        assert!(screen.contains("to start tracking"));
    }

    #[test]
    fn test_live_screen_shows_alert_and_stats() {
        let (feed, mut app) = app();
        app.toggle_session();
        let peer = feed.latest().unwrap();
        peer.open();
        peer.message(
            r#"{"bpm":6,"blink_count":3,"session_seconds":65,"alert":"drowsy","tip":"take a break","frame":"/9j/4A=="}"#,
        );
        app.tick();

        let screen = draw(&app);
        assert!(screen.contains("Drowsiness Detected"));
        assert!(screen.contains("take a break"));
        assert!(screen.contains("Blink Rate"));
        assert!(screen.contains("1:05"));
        assert!(screen.contains("Receiving frames"));
    }

    #[test]
    fn test_error_banner() {
        let (feed, mut app) = app();
        app.toggle_session();
        let peer = feed.latest().unwrap();
        peer.fail("refused");
        peer.close();
        app.tick();

        let screen = draw(&app);
        assert!(screen.contains("cannot reach backend"));
    }
}
