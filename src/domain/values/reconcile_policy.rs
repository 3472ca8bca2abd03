use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the search does when the Document Store lookup for a single
/// candidate fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Log the failure and keep the index snapshot for that candidate.
    #[default]
    BestEffort,
    /// Abort the whole search.
    FailFast,
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcilePolicy::BestEffort => write!(f, "best_effort"),
            ReconcilePolicy::FailFast => write!(f, "fail_fast"),
        }
    }
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(ReconcilePolicy::BestEffort),
            "fail_fast" => Ok(ReconcilePolicy::FailFast),
            _ => Err(format!("Unknown reconcile policy: {s}")),
        }
    }
}
