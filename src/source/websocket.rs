//! WebSocket connector.
//!
//! Connects to the backend's push endpoint and forwards every text frame
//! as a [`ConnectionEvent::Message`].

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::{Connection, ConnectionEvent, Connector};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A connector for a `ws://` or `wss://` telemetry endpoint.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: String,
    connect_timeout: Duration,
    description: String,
}

impl WebSocketConnector {
    /// Create a connector for the given URL.
    ///
    /// A connect attempt that has not completed within `connect_timeout`
    /// is reported as a transport failure.
    pub fn new(url: &str, connect_timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            connect_timeout,
            description: format!("ws: {}", url),
        }
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for WebSocketConnector {
    fn open(&self) -> Connection {
        let url = self.url.clone();
        let connect_timeout = self.connect_timeout;
        Connection::spawn(move |events, shutdown| run(url, connect_timeout, events, shutdown))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

async fn run(
    url: String,
    connect_timeout: Duration,
    events: mpsc::Sender<ConnectionEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    debug!(%url, "connecting to telemetry endpoint");

    let connect = tokio::time::timeout(connect_timeout, connect_async(url.as_str()));
    let mut ws = tokio::select! {
        _ = &mut shutdown => {
            // Dropping the pending connect future abandons the attempt.
            debug!(%url, "connect cancelled");
            return;
        }
        result = connect => match result {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => {
                warn!(%url, error = %e, "telemetry connect failed");
                fail(&events, e.to_string()).await;
                return;
            }
            Err(_) => {
                warn!(%url, timeout = ?connect_timeout, "telemetry connect timed out");
                fail(&events, format!("connect timed out after {:?}", connect_timeout)).await;
                return;
            }
        }
    };

    info!(%url, "telemetry connection open");
    if events.send(ConnectionEvent::Opened).await.is_err() {
        close_quietly(&mut ws).await;
        return;
    }

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!(%url, "closing telemetry connection");
                close_quietly(&mut ws).await;
                return;
            }
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let text = text.as_str().to_owned();
                    if events.send(ConnectionEvent::Message(text)).await.is_err() {
                        close_quietly(&mut ws).await;
                        return;
                    }
                }
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => {
                        if events.send(ConnectionEvent::Message(text)).await.is_err() {
                            close_quietly(&mut ws).await;
                            return;
                        }
                    }
                    Err(_) => debug!(len = bytes.len(), "ignoring non-UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "telemetry connection closed by backend");
                    break;
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "telemetry connection dropped");
                    let _ = events.send(ConnectionEvent::Failed(e.to_string())).await;
                    break;
                }
                None => {
                    info!("telemetry stream ended");
                    break;
                }
            }
        }
    }

    let _ = events.send(ConnectionEvent::Closed).await;
}

async fn fail(events: &mpsc::Sender<ConnectionEvent>, reason: String) {
    let _ = events.send(ConnectionEvent::Failed(reason)).await;
    let _ = events.send(ConnectionEvent::Closed).await;
}

async fn close_quietly(ws: &mut WsStream) {
    if let Err(e) = ws.close(None).await {
        debug!(error = %e, "error while closing telemetry socket");
    }
}
