//! Telemetry connections.
//!
//! A [`Connector`] knows how to reach a telemetry producer. Each call to
//! [`Connector::open`] yields a [`Connection`]: an owned handle whose events
//! (`Opened`, `Message`, `Failed`, `Closed`) are drained without blocking
//! from the UI thread.
//!
//! The socket I/O runs in a background task that only forwards events. The
//! task stops, closing its transport, as soon as the handle is closed or
//! dropped, including while a connect attempt is still in flight.

mod channel;
mod replay;
mod snapshot;
pub mod telemetry;
mod websocket;

pub use channel::{ChannelConnector, ChannelFeed, ChannelPeer};
pub use replay::ReplayConnector;
pub use snapshot::{DisplayFrame, FrameError, MetricsSnapshot, JPEG_DATA_URI_PREFIX};
pub use telemetry::{decode, DecodeError, Decoded, ErrorSignal, TelemetryUpdate};
pub use websocket::WebSocketConnector;

use std::fmt::Debug;
use std::future::Future;

use tokio::sync::{mpsc, oneshot};

/// Capacity of the per-connection event channel.
const EVENT_BUFFER: usize = 64;

/// Lifecycle and data events emitted by one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The transport is established.
    Opened,
    /// One inbound text message.
    Message(String),
    /// The transport could not be established or broke.
    Failed(String),
    /// The transport is gone. Always the last event of a connection.
    Closed,
}

/// Trait for opening telemetry connections.
///
/// # Example
///
/// ```
/// use eyeguard_monitor::{ChannelConnector, Connector};
///
/// let (feed, connector) = ChannelConnector::create("test");
/// let _connection = connector.open();
/// assert_eq!(feed.opened(), 1);
/// ```
pub trait Connector: Send + Debug {
    /// Start opening a new connection.
    ///
    /// Must not block; progress is reported through the returned handle.
    fn open(&self) -> Connection;

    /// Returns a human-readable description of the endpoint.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Owned handle to one live connection.
///
/// Closing or dropping the handle tells the background task to shut down.
#[derive(Debug)]
pub struct Connection {
    events: mpsc::Receiver<ConnectionEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    finished: bool,
}

impl Connection {
    /// Spawn a background task driving a connection.
    ///
    /// The task receives the event sender and a shutdown signal that
    /// resolves when the handle is closed or dropped. Must be called from
    /// within a tokio runtime.
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(mpsc::Sender<ConnectionEvent>, oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(run(tx, shutdown_rx));
        Self {
            events: rx,
            shutdown: Some(shutdown_tx),
            finished: false,
        }
    }

    /// Wrap an event channel fed by something other than a spawned task.
    pub fn from_receiver(events: mpsc::Receiver<ConnectionEvent>) -> Self {
        Self {
            events,
            shutdown: None,
            finished: false,
        }
    }

    /// Take the next pending event without blocking.
    ///
    /// If the producer goes away without reporting `Closed`, a single
    /// `Closed` is synthesized so the session always sees the end.
    pub fn poll(&mut self) -> Option<ConnectionEvent> {
        if self.finished {
            return None;
        }
        match self.events.try_recv() {
            Ok(event) => {
                if event == ConnectionEvent::Closed {
                    self.finished = true;
                }
                Some(event)
            }
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.finished = true;
                Some(ConnectionEvent::Closed)
            }
        }
    }

    /// Close the connection.
    pub fn close(mut self) {
        self.signal_shutdown();
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.events.close();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_drains_in_order() {
        let (tx, rx) = mpsc::channel(8);
        let mut connection = Connection::from_receiver(rx);

        tx.try_send(ConnectionEvent::Opened).unwrap();
        tx.try_send(ConnectionEvent::Message("a".into())).unwrap();
        tx.try_send(ConnectionEvent::Message("b".into())).unwrap();

        assert_eq!(connection.poll(), Some(ConnectionEvent::Opened));
        assert_eq!(connection.poll(), Some(ConnectionEvent::Message("a".into())));
        assert_eq!(connection.poll(), Some(ConnectionEvent::Message("b".into())));
        assert_eq!(connection.poll(), None);
    }

    #[test]
    fn test_disconnect_synthesizes_single_close() {
        let (tx, rx) = mpsc::channel(8);
        let mut connection = Connection::from_receiver(rx);
        drop(tx);

        assert_eq!(connection.poll(), Some(ConnectionEvent::Closed));
        assert_eq!(connection.poll(), None);
    }

    #[test]
    fn test_nothing_after_closed() {
        let (tx, rx) = mpsc::channel(8);
        let mut connection = Connection::from_receiver(rx);
        tx.try_send(ConnectionEvent::Closed).unwrap();
        tx.try_send(ConnectionEvent::Message("late".into())).unwrap();

        assert_eq!(connection.poll(), Some(ConnectionEvent::Closed));
        assert_eq!(connection.poll(), None);
    }

    #[tokio::test]
    async fn test_drop_signals_spawned_task() {
        let (done_tx, done_rx) = oneshot::channel();
        let connection = Connection::spawn(move |_events, shutdown| async move {
            let _ = shutdown.await;
            let _ = done_tx.send(());
        });

        drop(connection);

        tokio::time::timeout(std::time::Duration::from_secs(1), done_rx)
            .await
            .expect("task should observe shutdown")
            .unwrap();
    }
}
