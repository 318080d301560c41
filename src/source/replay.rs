//! Replay connector.
//!
//! Plays back a recorded telemetry session from a file of newline-delimited
//! JSON messages, one message per line, at a fixed pace. Useful for demos
//! and for debugging the dashboard without a camera.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::{Connection, ConnectionEvent, Connector};

/// A connector that replays recorded telemetry from a file.
#[derive(Debug, Clone)]
pub struct ReplayConnector {
    path: PathBuf,
    interval: Duration,
    description: String,
}

impl ReplayConnector {
    /// Create a replay connector for the given file.
    ///
    /// One line is delivered every `interval`.
    pub fn new<P: AsRef<Path>>(path: P, interval: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("replay: {}", path.display());
        Self {
            path,
            interval,
            description,
        }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for ReplayConnector {
    fn open(&self) -> Connection {
        let path = self.path.clone();
        let interval = self.interval;
        Connection::spawn(move |events, shutdown| run(path, interval, events, shutdown))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

async fn run(
    path: PathBuf,
    interval: Duration,
    events: mpsc::Sender<ConnectionEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open replay file");
            let _ = events.send(ConnectionEvent::Failed(e.to_string())).await;
            let _ = events.send(ConnectionEvent::Closed).await;
            return;
        }
    };

    info!(path = %path.display(), "replaying telemetry");
    if events.send(ConnectionEvent::Opened).await.is_err() {
        return;
    }

    let mut lines = BufReader::new(file).lines();
    loop {
        let line = tokio::select! {
            _ = &mut shutdown => {
                debug!("replay stopped");
                return;
            }
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if events.send(ConnectionEvent::Message(line.to_string())).await.is_err() {
                    return;
                }
            }
            Ok(None) => {
                debug!("replay reached end of file");
                break;
            }
            Err(e) => {
                warn!(error = %e, "replay read failed");
                let _ = events.send(ConnectionEvent::Failed(e.to_string())).await;
                break;
            }
        }

        tokio::select! {
            _ = &mut shutdown => {
                debug!("replay stopped");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    let _ = events.send(ConnectionEvent::Closed).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    async fn collect(connection: &mut Connection) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();
        for _ in 0..200 {
            while let Some(event) = connection.poll() {
                let done = event == ConnectionEvent::Closed;
                events.push(event);
                if done {
                    return events;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        events
    }

    #[tokio::test]
    async fn test_replay_delivers_lines_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"bpm":10}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"bpm":11}}"#).unwrap();
        file.flush().unwrap();

        let connector = ReplayConnector::new(file.path(), Duration::from_millis(1));
        let mut connection = connector.open();
        let events = collect(&mut connection).await;

        assert_eq!(
            events,
            vec![
                ConnectionEvent::Opened,
                ConnectionEvent::Message(r#"{"bpm":10}"#.to_string()),
                ConnectionEvent::Message(r#"{"bpm":11}"#.to_string()),
                ConnectionEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn test_replay_missing_file_fails() {
        let connector =
            ReplayConnector::new("/nonexistent/eyeguard/replay.jsonl", Duration::from_millis(1));
        let mut connection = connector.open();
        let events = collect(&mut connection).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ConnectionEvent::Failed(_)));
        assert_eq!(events[1], ConnectionEvent::Closed);
    }

    #[test]
    fn test_replay_description() {
        let connector = ReplayConnector::new("session.jsonl", Duration::from_millis(50));
        assert_eq!(connector.description(), "replay: session.jsonl");
        assert_eq!(connector.path(), Path::new("session.jsonl"));
    }
}
