// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod data;
mod error;
mod events;
mod session;
mod settings;
mod source;
mod ui;

use app::App;
use session::Session;
use settings::{Settings, ThemeChoice};
use source::{Connector, ReplayConnector, WebSocketConnector};
use ui::Theme;

#[derive(Parser, Debug)]
#[command(name = "eyeguard")]
#[command(about = "Terminal client for a live EyeGuard eye-health telemetry stream")]
struct Args {
    /// WebSocket URL of the telemetry endpoint
    #[arg(short, long, conflicts_with = "replay")]
    url: Option<String>,

    /// Replay a recorded stream (one JSON message per line) instead of connecting
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Delay between replayed messages in milliseconds
    #[arg(long, requires = "replay")]
    replay_interval: Option<u64>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds to wait for the connection to open
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Colour theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Wait for `s` instead of connecting on startup
    #[arg(long)]
    no_autostart: bool,
}

impl Args {
    /// Apply command-line overrides on top of loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref url) = self.url {
            settings.endpoint = url.clone();
        }
        if let Some(interval) = self.replay_interval {
            settings.replay_interval_ms = interval;
        }
        if let Some(timeout) = self.connect_timeout {
            settings.connect_timeout_secs = timeout;
        }
        if let Some(ref path) = self.log_file {
            settings.log_file = Some(path.clone());
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if self.no_autostart {
            settings.autostart = false;
        }
    }

    /// Build the connector for the selected source.
    fn connector(&self, settings: &Settings) -> Box<dyn Connector> {
        match self.replay {
            Some(ref path) => Box::new(ReplayConnector::new(path, settings.replay_interval())),
            None => Box::new(WebSocketConnector::new(
                &settings.endpoint,
                settings.connect_timeout(),
            )),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    if let Some(ref path) = settings.log_file {
        init_logging(path)?;
    }

    // Connections run on this runtime while the UI loop owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let session = Session::new(args.connector(&settings));
    info!(source = session.description(), "starting");

    let result = run_tui(session, &settings);

    info!("shutting down");
    result
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: &std::path::Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Run the TUI around the given session
fn run_tui(session: Session, settings: &Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let theme = Theme::from_choice(settings.theme);
    let mut app = App::new(session, theme, settings.export_dir.clone());
    if settings.autostart {
        app.session.start();
    }

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, settings.tick());

    // Dropping the app would close it too; stop explicitly before restoring
    app.session.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    while app.running {
        // Apply whatever arrived since the last frame
        app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(tick)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
