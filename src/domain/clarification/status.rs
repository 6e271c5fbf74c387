//! QueryStatus enum and the resolution transition graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Position of a query record in the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryStatus {
    #[default]
    Initial,
    CheckingAmbiguity,
    NotAmbiguous,
    Ambiguous,
    AwaitingClarification,
    ClarificationReceived,
    ValidatingClarification,
    ClarificationInvalid,
    Reformulating,
    AwaitingConfirmation,
    Completed,
    Error,
}

impl QueryStatus {
    /// Wire tag of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Initial => "INITIAL",
            QueryStatus::CheckingAmbiguity => "CHECKING_AMBIGUITY",
            QueryStatus::NotAmbiguous => "NOT_AMBIGUOUS",
            QueryStatus::Ambiguous => "AMBIGUOUS",
            QueryStatus::AwaitingClarification => "AWAITING_CLARIFICATION",
            QueryStatus::ClarificationReceived => "CLARIFICATION_RECEIVED",
            QueryStatus::ValidatingClarification => "VALIDATING_CLARIFICATION",
            QueryStatus::ClarificationInvalid => "CLARIFICATION_INVALID",
            QueryStatus::Reformulating => "REFORMULATING",
            QueryStatus::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            QueryStatus::Completed => "COMPLETED",
            QueryStatus::Error => "ERROR",
        }
    }

    /// Returns true when the pipeline is paused waiting on the caller.
    pub fn awaits_caller(&self) -> bool {
        matches!(
            self,
            QueryStatus::AwaitingClarification | QueryStatus::AwaitingConfirmation
        )
    }
}

impl StateMachine for QueryStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use QueryStatus::*;
        match self {
            Initial => vec![CheckingAmbiguity, Error],
            CheckingAmbiguity => vec![NotAmbiguous, Ambiguous, Error],
            NotAmbiguous => vec![Completed, Error],
            Ambiguous => vec![AwaitingClarification, Error],
            AwaitingClarification => vec![ClarificationReceived, Error],
            // Reformulating directly when the validation phase is disabled
            ClarificationReceived => vec![ValidatingClarification, Reformulating, Error],
            ValidatingClarification => vec![Reformulating, ClarificationInvalid, Error],
            ClarificationInvalid => vec![AwaitingClarification, Error],
            // Completed directly in flows without a confirmation phase
            Reformulating => vec![AwaitingConfirmation, Completed, Error],
            AwaitingConfirmation => vec![Completed, Error],
            Completed => vec![],
            Error => vec![],
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [QueryStatus; 12] = [
        QueryStatus::Initial,
        QueryStatus::CheckingAmbiguity,
        QueryStatus::NotAmbiguous,
        QueryStatus::Ambiguous,
        QueryStatus::AwaitingClarification,
        QueryStatus::ClarificationReceived,
        QueryStatus::ValidatingClarification,
        QueryStatus::ClarificationInvalid,
        QueryStatus::Reformulating,
        QueryStatus::AwaitingConfirmation,
        QueryStatus::Completed,
        QueryStatus::Error,
    ];

    #[test]
    fn default_is_initial() {
        assert_eq!(QueryStatus::default(), QueryStatus::Initial);
    }

    #[test]
    fn only_completed_and_error_are_terminal() {
        for status in ALL {
            let expected = matches!(status, QueryStatus::Completed | QueryStatus::Error);
            assert_eq!(status.is_terminal(), expected, "{status}");
        }
    }

    #[test]
    fn every_non_terminal_state_can_fail() {
        for status in ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(&QueryStatus::Error), "{status}");
        }
    }

    #[test]
    fn retry_loop_edges_exist() {
        assert!(QueryStatus::ValidatingClarification
            .can_transition_to(&QueryStatus::ClarificationInvalid));
        assert!(QueryStatus::ClarificationInvalid
            .can_transition_to(&QueryStatus::AwaitingClarification));
    }

    #[test]
    fn clarification_cannot_skip_to_completion() {
        assert!(!QueryStatus::AwaitingClarification.can_transition_to(&QueryStatus::Completed));
        assert!(!QueryStatus::Ambiguous.can_transition_to(&QueryStatus::Reformulating));
    }

    #[test]
    fn serializes_as_screaming_tag() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn awaits_caller_only_for_pause_points() {
        let paused: Vec<_> = ALL.into_iter().filter(QueryStatus::awaits_caller).collect();
        assert_eq!(
            paused,
            vec![QueryStatus::AwaitingClarification, QueryStatus::AwaitingConfirmation]
        );
    }
}
