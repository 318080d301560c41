//! Channel-based connector.
//!
//! Connections are backed by in-process channels instead of a socket. This
//! is useful for embedding the session in another program that already
//! receives telemetry, and for driving the session deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use super::{Connection, ConnectionEvent, Connector, EVENT_BUFFER};

/// The producer side of one channel-backed connection.
#[derive(Debug, Clone)]
pub struct ChannelPeer {
    events: mpsc::Sender<ConnectionEvent>,
}

impl ChannelPeer {
    /// Report the connection as established.
    pub fn open(&self) -> bool {
        self.push(ConnectionEvent::Opened)
    }

    /// Deliver one inbound text message.
    pub fn message(&self, text: impl Into<String>) -> bool {
        self.push(ConnectionEvent::Message(text.into()))
    }

    /// Report a transport failure.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.push(ConnectionEvent::Failed(reason.into()))
    }

    /// Close the connection from the producer side.
    pub fn close(&self) -> bool {
        self.push(ConnectionEvent::Closed)
    }

    /// Returns true once the consumer closed or dropped its handle.
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }

    fn push(&self, event: ConnectionEvent) -> bool {
        self.events.try_send(event).is_ok()
    }
}

/// Access to the peers of connections a [`ChannelConnector`] opened.
///
/// Peers whose handle was closed are forgotten on the next open.
#[derive(Debug, Clone)]
pub struct ChannelFeed {
    peers: Arc<Mutex<Vec<ChannelPeer>>>,
    opened: Arc<AtomicUsize>,
}

impl ChannelFeed {
    /// Number of connections opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// The peer of the most recently opened connection.
    pub fn latest(&self) -> Option<ChannelPeer> {
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of opened connections whose handle is still alive.
    pub fn active(&self) -> usize {
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|peer| !peer.is_closed())
            .count()
    }
}

/// A connector whose connections are fed through a [`ChannelFeed`].
///
/// # Example
///
/// ```
/// use eyeguard_monitor::{ChannelConnector, Connector};
///
/// let (feed, connector) = ChannelConnector::create("embedded");
/// let mut connection = connector.open();
///
/// let peer = feed.latest().unwrap();
/// peer.open();
/// peer.message(r#"{"bpm": 14}"#);
///
/// assert!(connection.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelConnector {
    description: String,
    feed: ChannelFeed,
}

impl ChannelConnector {
    /// Create a connector and the feed used to drive its connections.
    pub fn create(source_description: &str) -> (ChannelFeed, Self) {
        let feed = ChannelFeed {
            peers: Arc::new(Mutex::new(Vec::new())),
            opened: Arc::new(AtomicUsize::new(0)),
        };
        let connector = Self {
            description: format!("channel: {}", source_description),
            feed: feed.clone(),
        };
        (feed, connector)
    }
}

impl Connector for ChannelConnector {
    fn open(&self) -> Connection {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let mut peers = self
            .feed
            .peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Forget connections whose handle is gone
        peers.retain(|peer| !peer.is_closed());
        peers.push(ChannelPeer { events: tx });
        drop(peers);
        self.feed.opened.fetch_add(1, Ordering::SeqCst);
        Connection::from_receiver(rx)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_connector_open() {
        let (feed, connector) = ChannelConnector::create("test");
        assert_eq!(feed.opened(), 0);
        assert!(feed.latest().is_none());

        let mut connection = connector.open();
        assert_eq!(feed.opened(), 1);
        assert_eq!(feed.active(), 1);

        let peer = feed.latest().unwrap();
        assert!(peer.open());
        assert!(peer.message("{}"));
        assert_eq!(connection.poll(), Some(ConnectionEvent::Opened));
        assert_eq!(
            connection.poll(),
            Some(ConnectionEvent::Message("{}".to_string()))
        );
    }

    #[test]
    fn test_peer_sees_consumer_close() {
        let (feed, connector) = ChannelConnector::create("test");
        let connection = connector.open();
        let peer = feed.latest().unwrap();
        assert!(!peer.is_closed());

        connection.close();

        assert!(peer.is_closed());
        assert!(!peer.message("{}"));
        assert_eq!(feed.active(), 0);
    }

    #[test]
    fn test_channel_connector_description() {
        let (_feed, connector) = ChannelConnector::create("embedded");
        assert_eq!(connector.description(), "channel: embedded");
    }

    #[test]
    fn test_open_forgets_closed_peers() {
        let (feed, connector) = ChannelConnector::create("test");
        for _ in 0..10 {
            connector.open().close();
        }
        let _live = connector.open();

        assert_eq!(feed.opened(), 11);
        assert_eq!(feed.active(), 1);
        assert_eq!(feed.peers.lock().unwrap().len(), 1);
        assert!(!feed.latest().unwrap().is_closed());
    }
}
