//! Fitness scoring model.

use cloud_ports::HookStatus;
use serde::{Deserialize, Serialize};

/// Contribution of one check to the fitness report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    /// Points added to the fitness score
    pub score_delta: u64,
    /// Whether this check forces the gate status to `Failed`
    pub forced_failure: bool,
}

impl CheckOutcome {
    /// A passing contribution of `score_delta` points.
    pub fn scored(score_delta: u64) -> Self {
        Self {
            score_delta,
            forced_failure: false,
        }
    }

    /// Zero points and a forced `Failed` status.
    pub fn forced_failure() -> Self {
        Self {
            score_delta: 0,
            forced_failure: true,
        }
    }
}

/// One entry in the report's check log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    pub name: String,
    pub score_delta: u64,
    pub forced_failure: bool,
}

/// Aggregated result of one gate invocation.
///
/// # Invariants
///
/// The score only grows, and once `status` is `Failed` it stays `Failed`.
/// Fields are private so the only way to change them is [`FitnessReport::record`].
/// A forced failure does not stop later checks from adding score, so a
/// `Failed` report may still carry a high score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessReport {
    score: u64,
    status: HookStatus,
    checks: Vec<CheckRecord>,
}

impl Default for FitnessReport {
    fn default() -> Self {
        Self::new()
    }
}

impl FitnessReport {
    /// Empty report: score 0, status `Succeeded`.
    pub fn new() -> Self {
        Self {
            score: 0,
            status: HookStatus::Succeeded,
            checks: Vec::new(),
        }
    }

    /// Fold one check outcome into the report.
    pub fn record(&mut self, name: &str, outcome: CheckOutcome) {
        self.score = self.score.saturating_add(outcome.score_delta);
        if outcome.forced_failure {
            self.status = HookStatus::Failed;
        }
        self.checks.push(CheckRecord {
            name: name.to_string(),
            score_delta: outcome.score_delta,
            forced_failure: outcome.forced_failure,
        });
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> HookStatus {
        self.status
    }

    /// Checks in the order they ran.
    pub fn checks(&self) -> &[CheckRecord] {
        &self.checks
    }

    pub fn passed(&self) -> bool {
        self.status == HookStatus::Succeeded
    }
}
