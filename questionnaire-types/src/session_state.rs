use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted lifecycle state of a response session.
///
/// Transitions only move forward: `Pending -> InProgress -> Completed`.
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Assigned but never saved.
    #[default]
    #[serde(alias = "pendiente")]
    Pending,

    /// At least one save has been persisted.
    #[serde(alias = "en_progreso")]
    InProgress,

    /// Submitted; answers can no longer change.
    #[serde(alias = "completado")]
    Completed,
}

impl SessionState {
    /// Check if this state is terminal.
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }

    /// The state after `next` has been observed, never moving backwards.
    pub fn advance_to(self, next: SessionState) -> SessionState {
        self.max(next)
    }

    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_moves_backwards() {
        assert_eq!(
            SessionState::Completed.advance_to(SessionState::InProgress),
            SessionState::Completed
        );
        assert_eq!(
            SessionState::Pending.advance_to(SessionState::InProgress),
            SessionState::InProgress
        );
    }

    #[test]
    fn accepts_backend_names() {
        let state: SessionState = serde_json::from_str("\"en_progreso\"").unwrap();
        assert_eq!(state, SessionState::InProgress);
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"in_progress\"");
    }
}
