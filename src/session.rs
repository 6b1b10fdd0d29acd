//! Per-screen interaction state
//!
//! Everything the screen needs to remember between user actions lives here,
//! owned by the controller and serializable with serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::explainer::FailureKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScreenState {
    NoSelection,
    Selected {
        category: String,
    },
    ExplanationPending {
        category: String,
    },
    ExplanationShown {
        category: String,
        text: String,
        received_at: DateTime<Utc>,
    },
    ExplanationFailed {
        category: String,
        kind: FailureKind,
        message: String,
    },
}

impl ScreenState {
    /// Currently selected category, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            ScreenState::NoSelection => None,
            ScreenState::Selected { category }
            | ScreenState::ExplanationPending { category }
            | ScreenState::ExplanationShown { category, .. }
            | ScreenState::ExplanationFailed { category, .. } => Some(category),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ScreenState::ExplanationPending { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub state: ScreenState,
    /// Non-fatal notice for the user, cleared by the next successful action
    pub warning: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            state: ScreenState::NoSelection,
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_tagged() {
        let s = SessionState {
            state: ScreenState::ExplanationFailed {
                category: "Toys".into(),
                kind: FailureKind::Auth,
                message: "HTTP 401".into(),
            },
            warning: None,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["state"]["state"], "explanation_failed");
        assert_eq!(v["state"]["kind"], "auth");
        let back: SessionState = serde_json::from_value(v).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_category_accessor() {
        assert_eq!(ScreenState::NoSelection.category(), None);
        let pending = ScreenState::ExplanationPending {
            category: "Beauty".into(),
        };
        assert_eq!(pending.category(), Some("Beauty"));
        assert!(pending.is_pending());
    }
}
