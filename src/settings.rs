//! Client settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `EYEGUARD_*` environment variables. Command-line flags are applied on top
//! by the binary.
//!
//! ```toml
//! endpoint = "ws://192.168.1.20:8000/ws/track"
//! connect_timeout_secs = 10
//! theme = "dark"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// The backend's telemetry endpoint when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws/track";

/// Colour theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Detect from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

/// Resolved client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// WebSocket URL of the telemetry endpoint.
    pub endpoint: String,
    /// Seconds to wait for the connection to be established.
    pub connect_timeout_secs: u64,
    /// UI refresh interval in milliseconds.
    pub tick_ms: u64,
    /// Delay between replayed messages in milliseconds.
    pub replay_interval_ms: u64,
    /// Start the session as soon as the UI opens.
    pub autostart: bool,
    pub theme: ThemeChoice,
    /// Where to write logs. No logging when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Directory for exported metrics and saved frames.
    pub export_dir: PathBuf,
}

impl Settings {
    /// Load settings, reading `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("connect_timeout_secs", 5_i64)?
            .set_default("tick_ms", 100_i64)?
            .set_default("replay_interval_ms", 50_i64)?
            .set_default("autostart", true)?
            .set_default("theme", "auto")?
            .set_default("export_dir", ".")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder.add_source(Environment::with_prefix("EYEGUARD")).build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.connect_timeout(), Duration::from_secs(5));
        assert_eq!(settings.tick(), Duration::from_millis(100));
        assert_eq!(settings.replay_interval(), Duration::from_millis(50));
        assert!(settings.autostart);
        assert_eq!(settings.theme, ThemeChoice::Auto);
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
endpoint = "ws://10.0.0.2:9000/ws/track"
connect_timeout_secs = 12
theme = "light"
autostart = false
log_file = "eyeguard.log"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.endpoint, "ws://10.0.0.2:9000/ws/track");
        assert_eq!(settings.connect_timeout(), Duration::from_secs(12));
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert!(!settings.autostart);
        assert_eq!(settings.log_file, Some(PathBuf::from("eyeguard.log")));
        // Untouched keys keep their defaults
        assert_eq!(settings.tick_ms, 100);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/eyeguard.toml"))).is_err());
    }

    #[test]
    fn test_invalid_theme_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"theme = "purple""#).unwrap();
        file.flush().unwrap();

        assert!(Settings::load(Some(file.path())).is_err());
    }
}
