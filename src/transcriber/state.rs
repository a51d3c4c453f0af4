//! Processing state of a project as reported by the service.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a project. Transitions happen remotely; the client only observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProcessingState {
    #[default]
    None,
    InProgress,
    Canceled,
    Completed,
    Failed,
}

impl ProcessingState {
    pub fn id(&self) -> &'static str {
        match self {
            ProcessingState::None => "None",
            ProcessingState::InProgress => "InProgress",
            ProcessingState::Canceled => "Canceled",
            ProcessingState::Completed => "Completed",
            ProcessingState::Failed => "Failed",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProcessingState::None => "not started",
            ProcessingState::InProgress => "in progress",
            ProcessingState::Canceled => "canceled",
            ProcessingState::Completed => "completed",
            ProcessingState::Failed => "failed",
        }
    }

    /// True once the service will no longer change this project's state on its own.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            ProcessingState::Canceled | ProcessingState::Completed | ProcessingState::Failed
        )
    }
}

impl std::fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_wire_names() {
        for state in [
            ProcessingState::None,
            ProcessingState::InProgress,
            ProcessingState::Canceled,
            ProcessingState::Completed,
            ProcessingState::Failed,
        ] {
            assert_eq!(serde_json::to_value(state).unwrap(), serde_json::json!(state.id()));
        }
    }

    #[test]
    fn test_wire_names_match_ids() {
        let json = serde_json::to_value(ProcessingState::InProgress).unwrap();
        assert_eq!(json, serde_json::json!("InProgress"));
        let parsed: ProcessingState = serde_json::from_str("\"Failed\"").unwrap();
        assert_eq!(parsed, ProcessingState::Failed);
    }

    #[test]
    fn test_finished_states() {
        assert!(!ProcessingState::None.is_finished());
        assert!(!ProcessingState::InProgress.is_finished());
        assert!(ProcessingState::Canceled.is_finished());
        assert!(ProcessingState::Completed.is_finished());
        assert!(ProcessingState::Failed.is_finished());
    }
}
