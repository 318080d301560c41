//! Presentation values derived from a metrics snapshot.
//!
//! Everything here is a pure function of the latest [`MetricsSnapshot`] and
//! is recomputed on every render. Thresholds are fixed constants.

use crate::source::MetricsSnapshot;

/// Healthy blink rate, in blinks per minute.
pub const BASELINE_BPM: f64 = 15.0;

/// Below this blink rate the tier is critical.
pub const CRITICAL_BPM: f64 = 8.0;

/// Below this blink rate (and at or above [`CRITICAL_BPM`]) the tier is warning.
pub const WARNING_BPM: f64 = 12.0;

/// A blink-rate drop above this percentage is critical.
pub const CRITICAL_DROP_PCT: f64 = 50.0;

/// EAR below which the backend counts the eye as closed.
pub const EAR_CLOSED_THRESHOLD: f64 = 0.21;

/// Scale from EAR to openness-bar percent; an EAR of 0.25 fills the bar.
const OPENNESS_SCALE: f64 = 400.0;

/// Colour tier for a displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// No data yet.
    Neutral,
    Healthy,
    Warning,
    Critical,
}

/// Format session seconds as `m:ss`.
///
/// Zero or absent input yields `"0:00"`. Minutes keep counting past 59; there
/// is no hour field.
pub fn format_elapsed(seconds: Option<u64>) -> String {
    match seconds {
        None | Some(0) => "0:00".to_string(),
        Some(s) => format!("{}:{:02}", s / 60, s % 60),
    }
}

/// Colour tier for a blink rate.
pub fn blink_rate_tier(bpm: Option<f64>) -> Tier {
    match bpm {
        None => Tier::Neutral,
        Some(bpm) if bpm.is_nan() || bpm == 0.0 => Tier::Neutral,
        Some(bpm) if bpm < CRITICAL_BPM => Tier::Critical,
        Some(bpm) if bpm < WARNING_BPM => Tier::Warning,
        Some(_) => Tier::Healthy,
    }
}

/// Colour tier for the blink-rate drop percentage.
pub fn bpm_drop_tier(drop_pct: f64) -> Tier {
    if drop_pct > CRITICAL_DROP_PCT {
        Tier::Critical
    } else {
        Tier::Healthy
    }
}

/// Eye-openness bar fill, in percent (0–100).
pub fn openness_fill(ear: f64) -> f64 {
    if ear.is_nan() {
        return 0.0;
    }
    (ear * OPENNESS_SCALE).clamp(0.0, 100.0)
}

/// The adverse condition reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    DryEyes,
    Drowsy,
    TooClose,
}

impl AlertKind {
    /// Map an alert code to its kind.
    ///
    /// Empty codes and `"none"` mean no alert. Codes this client does not
    /// know are shown as dry eyes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "" | "none" => None,
            "drowsy" => Some(AlertKind::Drowsy),
            "too_close" => Some(AlertKind::TooClose),
            _ => Some(AlertKind::DryEyes),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::DryEyes => "Dry Eyes Detected",
            AlertKind::Drowsy => "Drowsiness Detected",
            AlertKind::TooClose => "Too Close to Screen",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::DryEyes => "eye-off",
            AlertKind::Drowsy | AlertKind::TooClose => "alert-triangle",
        }
    }

    pub fn color(&self) -> AlertColor {
        match self {
            AlertKind::DryEyes => AlertColor::Yellow,
            AlertKind::Drowsy => AlertColor::Red,
            AlertKind::TooClose => AlertColor::Orange,
        }
    }
}

/// Colour category of an alert banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertColor {
    Yellow,
    Orange,
    Red,
}

/// What the alert banner shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertPresentation {
    pub kind: AlertKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: AlertColor,
    pub tip: Option<String>,
}

/// Build the alert banner for an alert code and optional tip.
///
/// Returns `None` when there is no alert.
pub fn alert_presentation(alert: Option<&str>, tip: Option<&str>) -> Option<AlertPresentation> {
    let kind = AlertKind::from_code(alert?)?;
    Some(AlertPresentation {
        kind,
        label: kind.label(),
        icon: kind.icon(),
        color: kind.color(),
        tip: tip.filter(|t| !t.trim().is_empty()).map(str::to_string),
    })
}

/// A labelled yes/no status light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub label: &'static str,
    pub tier: Tier,
}

impl Indicator {
    pub const fn new(label: &'static str, tier: Tier) -> Self {
        Self { label, tier }
    }
}

/// Everything the dashboard needs from one snapshot, precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub elapsed: String,
    pub bpm_tier: Tier,
    pub drop_tier: Tier,
    pub openness: f64,
    pub alert: Option<AlertPresentation>,
    /// Tip shown on its own when there is no alert to attach it to.
    pub standalone_tip: Option<String>,
    pub face: Indicator,
    pub distance: Indicator,
    pub alertness: Indicator,
}

impl Dashboard {
    /// Derive the dashboard values from a snapshot.
    pub fn from_snapshot(metrics: &MetricsSnapshot) -> Self {
        let alert = alert_presentation(metrics.alert_code(), metrics.tip_text());
        let standalone_tip = if alert.is_none() {
            metrics.tip_text().map(str::to_string)
        } else {
            None
        };

        Self {
            elapsed: format_elapsed(Some(metrics.session_seconds)),
            bpm_tier: blink_rate_tier(Some(metrics.bpm)),
            drop_tier: bpm_drop_tier(metrics.bpm_drop_pct),
            openness: openness_fill(metrics.ear),
            alert,
            standalone_tip,
            face: if metrics.face_detected {
                Indicator::new("Face Detected", Tier::Healthy)
            } else {
                Indicator::new("No Face", Tier::Critical)
            },
            distance: if metrics.too_close {
                Indicator::new("Too Close", Tier::Warning)
            } else {
                Indicator::new("Good Distance", Tier::Healthy)
            },
            alertness: if metrics.drowsy {
                Indicator::new("Drowsy", Tier::Critical)
            } else {
                Indicator::new("Alert", Tier::Healthy)
            },
        }
    }
}
