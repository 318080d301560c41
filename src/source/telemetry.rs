//! Decoding of inbound telemetry messages.
//!
//! Each text message from the backend is a JSON object. It is either an
//! error report (an `error` field is set) or a metrics update that may carry
//! a camera frame alongside the metrics.

use serde::Deserialize;
use thiserror::Error;

use super::snapshot::{DisplayFrame, MetricsSnapshot};

/// A message that could not be interpreted as telemetry.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed telemetry message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An explicit error report from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSignal {
    pub message: String,
}

/// A metrics update, split into the metrics and the optional frame.
///
/// Both halves come from the same message and are applied together.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryUpdate {
    /// Optional delivery sequence number.
    pub seq: Option<u64>,
    pub metrics: MetricsSnapshot,
    pub frame: Option<DisplayFrame>,
}

/// Result of decoding one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Error(ErrorSignal),
    Update(TelemetryUpdate),
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    seq: Option<u64>,
    #[serde(default)]
    frame: Option<String>,
    #[serde(flatten)]
    metrics: MetricsSnapshot,
}

/// Decode one raw text message.
///
/// A non-empty `error` field wins over everything else in the message: the
/// rest of the payload is ignored so an error report never reaches the
/// metrics state.
pub fn decode(text: &str) -> Result<Decoded, DecodeError> {
    let wire: WireMessage = serde_json::from_str(text)?;

    if let Some(message) = wire.error.filter(|m| !m.is_empty()) {
        return Ok(Decoded::Error(ErrorSignal { message }));
    }

    Ok(Decoded::Update(TelemetryUpdate {
        seq: wire.seq,
        metrics: wire.metrics,
        frame: wire.frame.and_then(DisplayFrame::from_base64),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_metrics_update() {
        let decoded =
            decode(r#"{"bpm":6,"blink_count":3,"alert":"drowsy","tip":"take a break"}"#).unwrap();

        let Decoded::Update(update) = decoded else {
            panic!("expected an update");
        };
        assert_eq!(update.metrics.bpm, 6.0);
        assert_eq!(update.metrics.blink_count, 3);
        assert_eq!(update.metrics.alert.as_deref(), Some("drowsy"));
        assert_eq!(update.metrics.tip.as_deref(), Some("take a break"));
        assert!(update.frame.is_none());
        assert!(update.seq.is_none());
    }

    #[test]
    fn test_decode_error_signal() {
        let decoded = decode(r#"{"error":"camera unavailable"}"#).unwrap();
        assert_eq!(
            decoded,
            Decoded::Error(ErrorSignal {
                message: "camera unavailable".to_string()
            })
        );
    }

    #[test]
    fn test_error_wins_over_metrics() {
        let decoded = decode(r#"{"error":"Camera not found","bpm":20}"#).unwrap();
        assert!(matches!(decoded, Decoded::Error(_)));
    }

    #[test]
    fn test_empty_or_null_error_is_not_an_error() {
        assert!(matches!(
            decode(r#"{"error":"","bpm":12}"#).unwrap(),
            Decoded::Update(_)
        ));
        assert!(matches!(
            decode(r#"{"error":null,"bpm":12}"#).unwrap(),
            Decoded::Update(_)
        ));
    }

    #[test]
    fn test_frame_is_split_from_metrics() {
        let decoded = decode(r#"{"bpm":14,"ear":0.3,"frame":"/9j/4A==","seq":7}"#).unwrap();

        let Decoded::Update(update) = decoded else {
            panic!("expected an update");
        };
        assert_eq!(update.metrics.bpm, 14.0);
        assert_eq!(update.frame.unwrap().encoded(), "/9j/4A==");
        assert_eq!(update.seq, Some(7));
    }

    #[test]
    fn test_empty_frame_is_dropped() {
        let Decoded::Update(update) = decode(r#"{"frame":""}"#).unwrap() else {
            panic!("expected an update");
        };
        assert!(update.frame.is_none());
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(decode("not json").is_err());
        assert!(decode("").is_err());
        assert!(decode("[1,2,3]").is_err());
        assert!(decode(r#"{"blink_count":"three"}"#).is_err());
    }
}
