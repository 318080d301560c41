// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # eyeguard-monitor
//!
//! A terminal client and library for watching a live EyeGuard eye-health
//! telemetry stream.
//!
//! The EyeGuard backend watches the user through a webcam and pushes JSON
//! messages (blink rate, eye aspect ratio, alerts, an advisory tip and an
//! optional JPEG frame) over a WebSocket. This crate connects on demand,
//! decodes each message, derives presentation values and renders them in
//! an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│ session  │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (keys)  │    │ (state)  │    │(render) │    │         │ │
//! │  └─────────┘    └────┬─────┘    └────▲────┘    └─────────┘ │
//! │                      │               │                      │
//! │                      ▼               │                      │
//! │                 ┌─────────┐     ┌────┴────┐                 │
//! │                 │ source  │     │  data   │                 │
//! │                 │ (input) │     │(derived)│                 │
//! │                 └─────────┘     └─────────┘                 │
//! │       WebSocketConnector | ReplayConnector | ChannelConnector
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: The [`Connector`] trait and its connections, plus the
//!   wire decoder that turns a JSON text into an update or an error signal
//! - **[`session`]**: The session state machine and the [`SessionView`] the
//!   renderer reads
//! - **[`data`]**: Tiers, alert banners, elapsed-time formatting and the
//!   sample history behind the sparklines
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`settings`]**: Layered configuration (defaults, TOML file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Connect to the default endpoint (ws://localhost:8000/ws/track)
//! eyeguard
//!
//! # Connect to another backend
//! eyeguard --url ws://192.168.1.20:8000/ws/track
//!
//! # Replay a recorded stream (one JSON message per line)
//! eyeguard --replay session.ndjson
//! ```
//!
//! ### As a library with a channel connector
//!
//! ```
//! use eyeguard_monitor::{ChannelConnector, Session, SessionState};
//!
//! let (feed, connector) = ChannelConnector::create("demo");
//! let mut session = Session::new(Box::new(connector));
//!
//! session.start();
//! let peer = feed.latest().unwrap();
//! peer.open();
//! peer.message(r#"{"bpm": 14, "blink_count": 9, "session_seconds": 40}"#);
//! session.pump();
//!
//! assert_eq!(session.state(), SessionState::Live);
//! assert_eq!(session.view().metrics().unwrap().blink_count, 9);
//!
//! session.stop();
//! assert!(peer.is_closed());
//! ```
//!
//! ### Decoding a single message
//!
//! ```
//! use eyeguard_monitor::source::{decode, Decoded};
//!
//! match decode(r#"{"error": "camera unavailable"}"#).unwrap() {
//!     Decoded::Error(signal) => assert_eq!(signal.message, "camera unavailable"),
//!     Decoded::Update(_) => unreachable!(),
//! }
//! ```
//!
//! ### Connecting to a backend
//!
//! ```no_run
//! use std::time::Duration;
//! use eyeguard_monitor::{Session, WebSocketConnector};
//!
//! # tokio_test::block_on(async {
//! let connector = WebSocketConnector::new("ws://localhost:8000/ws/track", Duration::from_secs(5));
//! let mut session = Session::new(Box::new(connector));
//! session.start();
//! # });
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod session;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    AlertColor, AlertKind, AlertPresentation, Dashboard, Indicator, TelemetryHistory, Tier,
};
pub use error::SessionError;
pub use session::{Session, SessionState, SessionView, Transition};
pub use settings::{Settings, ThemeChoice};
pub use source::{
    ChannelConnector, ChannelFeed, ChannelPeer, Connection, ConnectionEvent, Connector,
    DisplayFrame, MetricsSnapshot, ReplayConnector, WebSocketConnector,
};
