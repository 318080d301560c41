use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Default file name for metric exports.
const EXPORT_FILE: &str = "eyeguard_export.json";
/// Default file name for saved frames.
const FRAME_FILE: &str = "eyeguard_frame.jpg";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Start / stop
        KeyCode::Char('s') | KeyCode::Enter => app.toggle_session(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = app.export_dir.join(EXPORT_FILE);
            match app.export_metrics(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        // Save frame
        KeyCode::Char('f') => {
            let frame_path = app.export_dir.join(FRAME_FILE);
            match app.save_frame(&frame_path) {
                Ok(()) => {
                    app.set_status_message(format!("Saved frame to {}", frame_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Save failed: {}", e));
                }
            }
        }

        _ => {}
    }
}
