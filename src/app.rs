//! Application state and user actions.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::session::Session;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    /// The telemetry session. Dropping the app closes its connection.
    pub session: Session,

    // UI
    pub theme: Theme,

    /// Directory for exports and saved frames.
    pub export_dir: PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around a session.
    pub fn new(session: Session, theme: Theme, export_dir: PathBuf) -> Self {
        Self {
            running: true,
            show_help: false,
            session,
            theme,
            export_dir,
            status_message: None,
        }
    }

    /// Returns a description of the telemetry endpoint.
    pub fn source_description(&self) -> &str {
        self.session.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Apply pending telemetry events.
    pub fn tick(&mut self) -> usize {
        self.session.pump()
    }

    /// Start the session if it has no connection, otherwise stop it.
    pub fn toggle_session(&mut self) {
        if self.session.has_connection() {
            self.session.stop();
        } else {
            self.session.start();
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Stop the session and signal the application to quit.
    pub fn quit(&mut self) {
        self.session.stop();
        self.running = false;
    }

    /// Export the current metrics and derived values to a JSON file.
    pub fn export_metrics(&self, path: &Path) -> Result<()> {
        let view = self.session.view();
        let (Some(metrics), Some(dashboard)) = (view.metrics(), view.dashboard()) else {
            anyhow::bail!("No metrics to export");
        };

        let export = serde_json::json!({
            "endpoint": self.session.description(),
            "state": self.session.state().label(),
            "metrics": metrics,
            "derived": {
                "session_time": dashboard.elapsed,
                "bpm_tier": format!("{:?}", dashboard.bpm_tier),
                "bpm_drop_tier": format!("{:?}", dashboard.drop_tier),
                "eye_openness_pct": dashboard.openness,
                "alert": dashboard.alert.as_ref().map(|a| a.label),
            },
            "error": view.error_text(),
            "messages_received": view.received(),
            "messages_dropped": view.dropped(),
        });

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Save the current camera frame as a JPEG file.
    pub fn save_frame(&self, path: &Path) -> Result<()> {
        let Some(frame) = self.session.view().frame() else {
            anyhow::bail!("No frame to save");
        };
        let bytes = frame.decode()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelConnector, ChannelFeed, ChannelPeer};

    fn app() -> (ChannelFeed, App) {
        let (feed, connector) = ChannelConnector::create("test");
        let session = Session::new(Box::new(connector));
        (feed, App::new(session, Theme::dark(), PathBuf::from(".")))
    }

    fn live_app() -> (ChannelFeed, ChannelPeer, App) {
        let (feed, mut app) = app();
        app.toggle_session();
        let peer = feed.latest().unwrap();
        peer.open();
        app.tick();
        (feed, peer, app)
    }

    #[test]
    fn test_toggle_session() {
        let (feed, peer, mut app) = live_app();
        assert!(app.session.view().running());

        app.toggle_session();
        assert!(!app.session.view().running());
        assert!(peer.is_closed());

        app.toggle_session();
        assert_eq!(feed.opened(), 2);
    }

    #[test]
    fn test_quit_closes_connection() {
        let (_feed, peer, mut app) = live_app();
        app.quit();
        assert!(!app.running);
        assert!(peer.is_closed());
    }

    #[test]
    fn test_export_metrics() {
        let (_feed, peer, mut app) = live_app();
        peer.message(r#"{"bpm":6,"blink_count":3,"session_seconds":65,"alert":"drowsy"}"#);
        app.tick();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_metrics(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["metrics"]["blink_count"], 3);
        assert_eq!(value["derived"]["session_time"], "1:05");
        assert_eq!(value["derived"]["bpm_tier"], "Critical");
        assert_eq!(value["derived"]["alert"], "Drowsiness Detected");
        assert_eq!(value["state"], "Live");
    }

    #[test]
    fn test_export_without_metrics_fails() {
        let (_feed, app) = app();
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_metrics(&dir.path().join("export.json")).is_err());
    }

    #[test]
    fn test_save_frame_writes_jpeg_bytes() {
        let (_feed, peer, mut app) = live_app();
        peer.message(r#"{"bpm":14,"frame":"/9j/4A=="}"#);
        app.tick();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        app.save_frame(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_status_message() {
        let (_feed, mut app) = app();
        assert!(app.get_status_message().is_none());
        app.set_status_message("Exported".to_string());
        assert_eq!(app.get_status_message(), Some("Exported"));
    }
}
