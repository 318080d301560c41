//! Telemetry types shared with the detection backend.
//!
//! These types match the JSON objects the backend pushes over the telemetry
//! socket. Every field is optional on the wire and falls back to its zero
//! value, so a sparse message still produces a complete snapshot.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// URI prefix used when handing a frame to something that renders data URIs.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// One telemetry update describing the user's current eye-health state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Blinks per minute over the backend's rolling window.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bpm: f64,

    /// Blinks counted since the backend session started.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blink_count: u64,

    /// Seconds since the backend session started.
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_seconds: u64,

    /// How far `bpm` sits below the healthy baseline, in percent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bpm_drop_pct: f64,

    /// Eye aspect ratio. Lower means more closed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ear: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub face_detected: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub too_close: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub drowsy: bool,

    /// Backend-assigned alert code (`dry_eyes`, `drowsy`, `too_close`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,

    /// Advisory text from the tip generator. Opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl MetricsSnapshot {
    /// The alert code, with empty strings and `"none"` treated as no alert.
    pub fn alert_code(&self) -> Option<&str> {
        self.alert
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty() && !code.eq_ignore_ascii_case("none"))
    }

    /// The advisory tip, with empty strings treated as absent.
    pub fn tip_text(&self) -> Option<&str> {
        self.tip.as_deref().filter(|tip| !tip.trim().is_empty())
    }
}

/// Errors from decoding a frame payload into image bytes.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// The most recent camera frame, kept in its base64 wire encoding.
///
/// Decoding is deferred until a consumer actually needs the bytes; the
/// terminal dashboard only shows the frame's size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    encoded: String,
}

impl DisplayFrame {
    /// Wrap a base64-encoded JPEG. Returns `None` for an empty payload.
    pub fn from_base64(encoded: impl Into<String>) -> Option<Self> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            None
        } else {
            Some(Self { encoded })
        }
    }

    /// The payload as received.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The frame as a `data:image/jpeg;base64,...` URI.
    pub fn data_uri(&self) -> String {
        format!("{}{}", JPEG_DATA_URI_PREFIX, self.encoded)
    }

    /// Decode the payload into raw JPEG bytes.
    pub fn decode(&self) -> Result<Vec<u8>, FrameError> {
        Ok(STANDARD.decode(self.encoded.trim())?)
    }

    /// Approximate decoded size in bytes, without decoding.
    pub fn approx_len(&self) -> usize {
        let trimmed = self.encoded.trim();
        let padding = trimmed.bytes().rev().take_while(|b| *b == b'=').count();
        (trimmed.len() / 4 * 3).saturating_sub(padding)
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_snapshot_uses_defaults() {
        let snapshot: MetricsSnapshot = serde_json::from_str(r#"{"bpm": 6}"#).unwrap();
        assert_eq!(snapshot.bpm, 6.0);
        assert_eq!(snapshot.blink_count, 0);
        assert!(!snapshot.face_detected);
        assert!(snapshot.alert.is_none());
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let snapshot: MetricsSnapshot =
            serde_json::from_str(r#"{"bpm": null, "ear": null, "alert": null}"#).unwrap();
        assert_eq!(snapshot.bpm, 0.0);
        assert_eq!(snapshot.ear, 0.0);
        assert!(snapshot.alert_code().is_none());
    }

    #[test]
    fn test_alert_code_ignores_empty_and_none() {
        let mut snapshot = MetricsSnapshot {
            alert: Some(String::new()),
            ..Default::default()
        };
        assert!(snapshot.alert_code().is_none());

        snapshot.alert = Some("none".to_string());
        assert!(snapshot.alert_code().is_none());

        snapshot.alert = Some("drowsy".to_string());
        assert_eq!(snapshot.alert_code(), Some("drowsy"));
    }

    #[test]
    fn test_frame_data_uri_and_decode() {
        let frame = DisplayFrame::from_base64("/9j/4A==").unwrap();
        assert_eq!(frame.data_uri(), "data:image/jpeg;base64,/9j/4A==");
        assert_eq!(frame.decode().unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(frame.approx_len(), 4);
    }

    #[test]
    fn test_empty_frame_is_absent() {
        assert!(DisplayFrame::from_base64("").is_none());
        assert!(DisplayFrame::from_base64("  ").is_none());
    }

    #[test]
    fn test_invalid_frame_fails_to_decode() {
        let frame = DisplayFrame::from_base64("not base64!").unwrap();
        assert!(matches!(frame.decode(), Err(FrameError::Base64(_))));
    }
}
