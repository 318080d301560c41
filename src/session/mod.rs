//! The live telemetry session.
//!
//! A [`Session`] exclusively owns at most one [`Connection`] and drives the
//! [`SessionState`] machine from the connection's events. All transitions
//! happen inside [`Session::start`], [`Session::stop`] and
//! [`Session::pump`], on the caller's thread, in arrival order.
//!
//! ```text
//!  Connector::open() ──▶ Connection ──poll()──▶ Session::pump()
//!                                                   │
//!                              telemetry::decode() ◀┤
//!                                                   ▼
//!                                              SessionView ──▶ ui
//! ```

mod state;
mod view;

pub use state::{SessionState, Transition};
pub use view::SessionView;

use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::source::{decode, Connection, ConnectionEvent, Connector, Decoded};

/// Upper bound on events applied per [`Session::pump`] call, so a flooding
/// producer cannot starve the UI loop.
const MAX_EVENTS_PER_PUMP: usize = 256;

/// One telemetry session and its view model.
///
/// Dropping the session closes its connection.
///
/// # Example
///
/// ```
/// use eyeguard_monitor::{ChannelConnector, Session};
///
/// let (feed, connector) = ChannelConnector::create("example");
/// let mut session = Session::new(Box::new(connector));
///
/// session.start();
/// let peer = feed.latest().unwrap();
/// peer.open();
/// peer.message(r#"{"bpm": 14, "blink_count": 9}"#);
/// session.pump();
///
/// assert!(session.view().running());
/// assert_eq!(session.view().metrics().unwrap().blink_count, 9);
/// ```
#[derive(Debug)]
pub struct Session {
    connector: Box<dyn Connector>,
    connection: Option<Connection>,
    state: SessionState,
    view: SessionView,
    last_seq: Option<u64>,
}

impl Session {
    /// Create an idle session that connects through `connector`.
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            connection: None,
            state: SessionState::Idle,
            view: SessionView::default(),
            last_seq: None,
        }
    }

    /// Returns a description of the telemetry endpoint.
    pub fn description(&self) -> &str {
        self.connector.description()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The view model for rendering.
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    /// Whether a connection handle is held.
    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// Open a connection unless one already exists.
    ///
    /// Returns true if a new connection attempt was started.
    pub fn start(&mut self) -> bool {
        if self.connection.is_some() {
            debug!(state = ?self.state, "start ignored: connection already active");
            return false;
        }
        if !self.transition(Transition::Start) {
            return false;
        }

        info!(endpoint = %self.connector.description(), "starting telemetry session");
        self.view.begin();
        self.last_seq = None;
        self.connection = Some(self.connector.open());
        true
    }

    /// Close the connection, if any, and clear telemetry. Idempotent.
    pub fn stop(&mut self) {
        if let Some(connection) = self.connection.take() {
            info!("stopping telemetry session");
            connection.close();
        }
        self.transition(Transition::Stop);
        self.view.clear_telemetry();
        self.last_seq = None;
    }

    /// Apply pending connection events in arrival order.
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while applied < MAX_EVENTS_PER_PUMP {
            let Some(event) = self.connection.as_mut().and_then(Connection::poll) else {
                break;
            };
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => {
                if self.transition(Transition::Opened) {
                    info!("telemetry session live");
                }
            }
            ConnectionEvent::Message(text) => {
                if self.state == SessionState::Live {
                    self.handle_message(&text);
                } else {
                    debug!(state = ?self.state, "ignoring message outside live state");
                }
            }
            ConnectionEvent::Failed(detail) => {
                if self.transition(Transition::Failed) {
                    warn!(%detail, "telemetry transport failed");
                    self.view.set_error(SessionError::Transport { detail });
                }
            }
            ConnectionEvent::Closed => {
                if self.transition(Transition::Closed) {
                    info!("telemetry connection closed");
                    self.connection = None;
                    self.transition(Transition::Release);
                }
            }
        }
    }

    fn handle_message(&mut self, text: &str) {
        match decode(text) {
            Ok(Decoded::Update(update)) => {
                if let (Some(seq), Some(last)) = (update.seq, self.last_seq) {
                    if seq <= last {
                        debug!(seq, last, "dropping stale telemetry message");
                        self.view.record_dropped();
                        return;
                    }
                }
                if update.seq.is_some() {
                    self.last_seq = update.seq;
                }
                self.view.apply_update(update.metrics, update.frame);
            }
            Ok(Decoded::Error(signal)) => {
                warn!(message = %signal.message, "backend reported an error");
                self.view.set_error(SessionError::Remote(signal.message));
            }
            Err(e) => {
                warn!(error = %e, "dropping malformed telemetry message");
                self.view.record_dropped();
            }
        }
    }

    /// Apply a transition, keeping `running` in step with the state.
    fn transition(&mut self, transition: Transition) -> bool {
        match self.state.next(transition) {
            Some(next) => {
                debug!(from = ?self.state, to = ?next, ?transition, "session transition");
                self.state = next;
                self.view.set_running(next.is_running());
                true
            }
            None => {
                debug!(state = ?self.state, ?transition, "ignoring transition");
                false
            }
        }
    }
}
