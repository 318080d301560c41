//! The state the rendering layer observes.

use std::time::Instant;

use crate::data::{Dashboard, TelemetryHistory};
use crate::error::SessionError;
use crate::source::{DisplayFrame, MetricsSnapshot};

/// Snapshot of everything the dashboard draws.
///
/// Only the owning [`Session`](super::Session) mutates it, and every
/// mutation is a single method call, so a renderer never sees metrics from
/// one message paired with the frame from another.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    running: bool,
    metrics: Option<MetricsSnapshot>,
    frame: Option<DisplayFrame>,
    error: Option<SessionError>,
    history: TelemetryHistory,
    last_updated: Option<Instant>,
    received: u64,
    dropped: u64,
}

impl SessionView {
    /// Whether telemetry is flowing.
    pub fn running(&self) -> bool {
        self.running
    }

    /// The latest metrics, if any arrived.
    pub fn metrics(&self) -> Option<&MetricsSnapshot> {
        self.metrics.as_ref()
    }

    /// The latest camera frame. Only present while running.
    pub fn frame(&self) -> Option<&DisplayFrame> {
        self.frame.as_ref()
    }

    /// The error shown in the banner.
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// The banner text for [`Self::error`].
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Recent samples for sparklines.
    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    /// When the metrics were last replaced.
    pub fn last_updated(&self) -> Option<Instant> {
        self.last_updated
    }

    /// Telemetry updates applied since the last start.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Messages dropped as malformed or stale since the last start.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Presentation values for the current metrics.
    pub fn dashboard(&self) -> Option<Dashboard> {
        self.metrics.as_ref().map(Dashboard::from_snapshot)
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
        if !running {
            self.frame = None;
        }
    }

    /// Replace metrics and, when the message carried one, the frame.
    pub(crate) fn apply_update(&mut self, metrics: MetricsSnapshot, frame: Option<DisplayFrame>) {
        self.history.record(&metrics);
        self.metrics = Some(metrics);
        if let Some(frame) = frame {
            self.frame = Some(frame);
        }
        self.last_updated = Some(Instant::now());
        self.received += 1;
    }

    pub(crate) fn set_error(&mut self, error: SessionError) {
        self.error = Some(error);
    }

    pub(crate) fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    /// Reset for a fresh connection attempt.
    pub(crate) fn begin(&mut self) {
        self.clear_telemetry();
        self.error = None;
        self.received = 0;
        self.dropped = 0;
    }

    /// Clear all telemetry. The error banner is left alone.
    pub(crate) fn clear_telemetry(&mut self) {
        self.running = false;
        self.metrics = None;
        self.frame = None;
        self.history.clear();
        self.last_updated = None;
    }
}
