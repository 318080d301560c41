//! Recent telemetry samples for sparklines.
//!
//! History is in-memory only and belongs to the current session; it is
//! cleared whenever the session starts or stops.

use std::collections::VecDeque;

use crate::source::MetricsSnapshot;

/// Maximum number of samples to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent blink-rate and eye-openness samples.
#[derive(Debug, Clone, Default)]
pub struct TelemetryHistory {
    pub bpm: VecDeque<f64>,
    pub ear: VecDeque<f64>,
}

impl TelemetryHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new snapshot.
    pub fn record(&mut self, metrics: &MetricsSnapshot) {
        push_bounded(&mut self.bpm, metrics.bpm);
        push_bounded(&mut self.ear, metrics.ear);
    }

    /// Forget every sample.
    pub fn clear(&mut self) {
        self.bpm.clear();
        self.ear.clear();
    }

    pub fn len(&self) -> usize {
        self.bpm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bpm.is_empty()
    }

    /// Blink-rate samples scaled to 8 levels (0-7).
    pub fn bpm_levels(&self) -> Vec<u8> {
        scale_levels(&self.bpm)
    }

    /// Eye-openness samples scaled to 8 levels (0-7).
    pub fn ear_levels(&self) -> Vec<u8> {
        scale_levels(&self.ear)
    }
}

fn push_bounded(samples: &mut VecDeque<f64>, value: f64) {
    samples.push_back(value);
    if samples.len() > MAX_HISTORY_SIZE {
        samples.pop_front();
    }
}

/// Scale samples to 0-7 relative to the largest sample.
fn scale_levels(samples: &VecDeque<f64>) -> Vec<u8> {
    let max = samples.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0; samples.len()];
    }
    samples
        .iter()
        .map(|&v| ((v.max(0.0) / max) * 7.0).round() as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(bpm: f64, ear: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            bpm,
            ear,
            ..Default::default()
        }
    }

    #[test]
    fn test_history_record_and_clear() {
        let mut history = TelemetryHistory::new();
        assert!(history.is_empty());

        history.record(&snapshot(10.0, 0.3));
        history.record(&snapshot(12.0, 0.2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.bpm, VecDeque::from(vec![10.0, 12.0]));

        history.clear();
        assert!(history.is_empty());
        assert!(history.ear.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = TelemetryHistory::new();
        for i in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&snapshot(i as f64, 0.0));
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.bpm.front().copied(), Some(10.0));
    }

    #[test]
    fn test_levels_are_relative_to_max() {
        let mut history = TelemetryHistory::new();
        history.record(&snapshot(0.0, 0.0));
        history.record(&snapshot(7.0, 0.0));
        history.record(&snapshot(14.0, 0.0));

        assert_eq!(history.bpm_levels(), vec![0, 4, 7]);
        assert_eq!(history.ear_levels(), vec![0, 0, 0]);
    }
}
