//! Errors surfaced to the user by a session.

use thiserror::Error;

/// Banner text shown for any transport failure.
pub const TRANSPORT_ERROR_TEXT: &str = "cannot reach backend";

/// A failure shown in the session's error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The connection could not be established or was dropped.
    ///
    /// Always displayed with the fixed banner text; `detail` is kept for
    /// logs and the status bar.
    #[error("{}", TRANSPORT_ERROR_TEXT)]
    Transport { detail: String },

    /// The backend reported an error. Displayed verbatim.
    #[error("{0}")]
    Remote(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_uses_fixed_text() {
        let err = SessionError::Transport {
            detail: "Connection refused (os error 111)".to_string(),
        };
        assert_eq!(err.to_string(), "cannot reach backend");
    }

    #[test]
    fn test_remote_error_is_verbatim() {
        let err = SessionError::Remote("camera unavailable".to_string());
        assert_eq!(err.to_string(), "camera unavailable");
    }
}
