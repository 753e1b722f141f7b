//! Data model shared between the poll loop and transport implementations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Conclusion string the reduction rule treats as fatal. Every other
/// conclusion is opaque to the state machine.
pub const CONCLUSION_FAILURE: &str = "failure";

/// Lifecycle status of a check run as reported by the remote source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Terminal; a conclusion is available.
    Completed,
    /// Currently executing.
    InProgress,
    /// Waiting for a runner.
    Queued,
    /// Parked, e.g. behind a deployment protection rule.
    Waiting,
    /// Requested but not yet queued.
    Requested,
    /// Reported by some providers before queueing.
    Pending,
}

impl CheckStatus {
    /// True when the run is terminal and carries a conclusion.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// One status/conclusion snapshot for a named check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Remote identifier, used for log correlation only.
    pub id: u64,
    /// Lifecycle status.
    pub status: CheckStatus,
    /// Terminal outcome. Only present once `status` is `completed`.
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// Response to one transport query: the runs recorded for one check name,
/// in the order the remote source returned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRunList {
    /// Reported runs; may be empty when the check has not been created yet.
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

/// Tracked state of one check between poll rounds.
///
/// Starts as `Pending` and moves to `Concluded` once a completed record is
/// observed. A later round that observes a different completed record
/// overwrites the stored conclusion; a round that observes no completed
/// record leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedOutcome {
    /// No completed record observed yet.
    Pending,
    /// Conclusion of the most recently observed completed record.
    Concluded(String),
}

impl TrackedOutcome {
    /// True until a completed record has been observed.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// True when the stored conclusion is the fatal `failure` string.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Concluded(c) if c == CONCLUSION_FAILURE)
    }
}

impl fmt::Display for TrackedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Concluded(conclusion) => f.write_str(conclusion),
        }
    }
}

/// Overall verdict of one poll invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// Every tracked check concluded with a non-failure conclusion.
    Success,
    /// At least one tracked check concluded `failure`.
    Failure,
    /// The deadline passed with at least one check still pending.
    TimedOut,
}

impl PollOutcome {
    /// Stable string form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_status_serde() {
        let completed = CheckStatus::Completed;
        let serialized = serde_json::to_string(&completed).unwrap();
        assert_eq!(serialized, r#""completed""#);
        let deserialized: CheckStatus = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, completed);

        let in_progress: CheckStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(in_progress, CheckStatus::InProgress);
        assert!(!in_progress.is_completed());
    }

    #[test]
    fn poll_outcome_forms() {
        assert_eq!(PollOutcome::Success.as_str(), "success");
        assert_eq!(PollOutcome::Failure.as_str(), "failure");
        assert_eq!(PollOutcome::TimedOut.as_str(), "timed_out");

        let serialized = serde_json::to_string(&PollOutcome::TimedOut).unwrap();
        assert_eq!(serialized, r#""timed_out""#);
        assert_eq!(PollOutcome::TimedOut.to_string(), "timed_out");
    }

    #[test]
    fn tracked_outcome_display_and_predicates() {
        assert_eq!(TrackedOutcome::Pending.to_string(), "pending");
        assert!(TrackedOutcome::Pending.is_pending());

        let failed = TrackedOutcome::Concluded("failure".into());
        assert!(failed.is_failure());
        assert!(!failed.is_pending());

        let odd = TrackedOutcome::Concluded("action_required".into());
        assert_eq!(odd.to_string(), "action_required");
        assert!(!odd.is_failure());
    }

    #[test]
    fn check_run_list_decodes_rest_payload() {
        // Trimmed-down capture of the REST check-runs response; unknown
        // fields must be ignored and a null conclusion must decode.
        let payload = r#"{
            "total_count": 2,
            "check_runs": [
                {
                    "id": 4,
                    "name": "build",
                    "head_sha": "ce587453ced02b1526dfb4cb910479d431683101",
                    "status": "in_progress",
                    "conclusion": null
                },
                {
                    "id": 7,
                    "name": "build",
                    "status": "completed",
                    "conclusion": "neutral"
                }
            ]
        }"#;

        let list: CheckRunList = serde_json::from_str(payload).unwrap();
        assert_eq!(list.check_runs.len(), 2);
        assert_eq!(list.check_runs[0].conclusion, None);
        assert!(!list.check_runs[0].status.is_completed());
        assert_eq!(list.check_runs[1].conclusion.as_deref(), Some("neutral"));
        assert!(list.check_runs[1].status.is_completed());
    }

    #[test]
    fn empty_payload_decodes_to_empty_list() {
        let list: CheckRunList = serde_json::from_str(r#"{"total_count":0}"#).unwrap();
        assert!(list.check_runs.is_empty());
    }
}
