//! Derived presentation data.
//!
//! This module turns raw telemetry into the values the dashboard shows.
//!
//! ## Submodules
//!
//! - [`derived`]: Pure functions for tiers, alert banners and time formatting,
//!   plus [`Dashboard`] which bundles them for one snapshot
//! - [`history`]: Recent samples for sparklines
//!
//! ## Data Flow
//!
//! ```text
//! MetricsSnapshot (decoded JSON)
//!        │
//!        ├──▶ Dashboard::from_snapshot() (recomputed on every render)
//!        │
//!        └──▶ TelemetryHistory::record() (for sparklines)
//! ```

pub mod derived;
pub mod history;

pub use derived::{
    alert_presentation, blink_rate_tier, bpm_drop_tier, format_elapsed, openness_fill, AlertColor,
    AlertKind, AlertPresentation, Dashboard, Indicator, Tier,
};
pub use history::TelemetryHistory;
