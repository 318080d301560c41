//! Session lifecycle state machine.
//!
//! ```text
//!          Start             Opened
//!   Idle ────────▶ Connecting ──────▶ Live
//!    ▲                 │    │          │  │
//!    │                 │    └─Failed─┐ │  │
//!    │                 │             ▼ ▼  │
//!    │                 │  Closed    Error │ Closed
//!    │                 ▼             │    ▼
//!    └───Release─── Closed ◀──Closed─┴────┘
//!
//!   Stop: any state ──▶ Idle
//! ```

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No connection.
    #[default]
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// Connected and receiving telemetry.
    Live,
    /// The transport failed; waiting for it to finish closing.
    Error,
    /// The transport closed; the handle is about to be released.
    Closed,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Opened,
    Failed,
    Closed,
    Release,
    Stop,
}

impl SessionState {
    /// Apply a transition.
    ///
    /// Returns `None` when the transition is not valid from this state; the
    /// caller ignores such inputs.
    pub fn next(self, transition: Transition) -> Option<SessionState> {
        use SessionState::*;

        match (self, transition) {
            (_, Transition::Stop) => Some(Idle),
            (Idle, Transition::Start) => Some(Connecting),
            (Connecting, Transition::Opened) => Some(Live),
            (Connecting | Live, Transition::Failed) => Some(Error),
            (Connecting | Live | Error, Transition::Closed) => Some(Closed),
            (Closed, Transition::Release) => Some(Idle),
            _ => None,
        }
    }

    /// Whether telemetry is flowing.
    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Live)
    }

    /// Returns the display label for this state.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Connecting => "Connecting",
            SessionState::Live => "Live",
            SessionState::Error => "Error",
            SessionState::Closed => "Closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = SessionState::Idle;
        let state = state.next(Transition::Start).unwrap();
        assert_eq!(state, SessionState::Connecting);
        let state = state.next(Transition::Opened).unwrap();
        assert_eq!(state, SessionState::Live);
        assert!(state.is_running());
        let state = state.next(Transition::Closed).unwrap();
        assert_eq!(state, SessionState::Closed);
        let state = state.next(Transition::Release).unwrap();
        assert_eq!(state, SessionState::Idle);
    }

    #[test]
    fn test_failure_path() {
        let state = SessionState::Connecting.next(Transition::Failed).unwrap();
        assert_eq!(state, SessionState::Error);
        assert!(!state.is_running());
        assert_eq!(state.next(Transition::Closed), Some(SessionState::Closed));
    }

    #[test]
    fn test_stop_from_anywhere() {
        for state in [
            SessionState::Idle,
            SessionState::Connecting,
            SessionState::Live,
            SessionState::Error,
            SessionState::Closed,
        ] {
            assert_eq!(state.next(Transition::Stop), Some(SessionState::Idle));
        }
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        assert_eq!(SessionState::Live.next(Transition::Start), None);
        assert_eq!(SessionState::Connecting.next(Transition::Start), None);
        assert_eq!(SessionState::Idle.next(Transition::Opened), None);
        assert_eq!(SessionState::Idle.next(Transition::Closed), None);
        assert_eq!(SessionState::Live.next(Transition::Opened), None);
        assert_eq!(SessionState::Error.next(Transition::Failed), None);
        assert_eq!(SessionState::Live.next(Transition::Release), None);
    }
}
