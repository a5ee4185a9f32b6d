//! Per-step outcomes and run tallies.
//!
//! Every fix operation is a sequence of independent steps; a step that fails
//! or is skipped never stops the run.  The report types here carry the
//! outcome of each step so the CLI and the GUI can render the same tally the
//! original fix printed: `3/5 steps applied`.

use serde::{Deserialize, Serialize};

/// Outcome of a single fix step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// The step made its change (or re-asserted it — the patcher is
    /// idempotent, so re-applying still counts as applied).
    Applied,
    /// The step had nothing to do here; the reason says why.
    Skipped(String),
    /// The step hit an error; the run continued without it.
    Failed(String),
}

impl StepStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepStatus::Applied)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

/// One named step and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub status: StepStatus,
}

impl StepReport {
    pub fn applied(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Applied,
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Skipped(reason.into()),
        }
    }

    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Failed(reason.into()),
        }
    }
}

/// Ordered collection of step outcomes for one fix run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixReport {
    steps: Vec<StepReport>,
}

impl FixReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    pub fn applied_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_applied()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.steps.len() - self.applied_count() - self.failed_count()
    }

    /// A run succeeded when at least one step applied.
    pub fn succeeded(&self) -> bool {
        self.applied_count() >= 1
    }

    /// The tally line shown to the user, e.g. `3/5 steps applied`.
    pub fn summary(&self) -> String {
        format!("{}/{} steps applied", self.applied_count(), self.steps.len())
    }
}

// ── System verification ───────────────────────────────────────────────────────

/// Outcome of a single system check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Pass,
    /// The check found something suboptimal that does not block the fix.
    Warn,
    Fail,
    /// The check could not be performed on this system.
    Unknown,
}

/// One named system check and what it found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckReport {
    pub fn new(
        name: impl Into<String>,
        status: CheckStatus,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

/// Collected results of a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    checks: Vec<CheckReport>,
}

impl VerifyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, check: CheckReport) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[CheckReport] {
        &self.checks
    }

    pub fn pass_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count()
    }

    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Warnings and unknowns are compatible; only a hard failure blocks.
    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }

    /// The tally line, e.g. `5/6 checks passed`.
    pub fn summary(&self) -> String {
        format!("{}/{} checks passed", self.pass_count(), self.checks.len())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_report_counts_each_status() {
        let mut report = FixReport::new();
        report.push(StepReport::applied("a"));
        report.push(StepReport::skipped("b", "file not found"));
        report.push(StepReport::failed("c", "permission denied"));
        report.push(StepReport::applied("d"));

        assert_eq!(report.applied_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.summary(), "2/4 steps applied");
    }

    #[test]
    fn test_fix_report_succeeds_with_one_applied_step() {
        let mut report = FixReport::new();
        report.push(StepReport::failed("a", "boom"));
        report.push(StepReport::applied("b"));
        assert!(report.succeeded());
    }

    #[test]
    fn test_fix_report_with_no_applied_steps_fails() {
        let mut report = FixReport::new();
        report.push(StepReport::skipped("a", "nothing to do"));
        report.push(StepReport::failed("b", "boom"));
        assert!(!report.succeeded());
    }

    #[test]
    fn test_empty_fix_report_does_not_succeed() {
        assert!(!FixReport::new().succeeded());
        assert_eq!(FixReport::new().summary(), "0/0 steps applied");
    }

    #[test]
    fn test_verify_report_warnings_still_pass() {
        let mut report = VerifyReport::new();
        report.push(CheckReport::new("os", CheckStatus::Pass, "Windows 11"));
        report.push(CheckReport::new(
            "privileges",
            CheckStatus::Warn,
            "not elevated",
        ));
        report.push(CheckReport::new("disk", CheckStatus::Unknown, ""));

        assert!(report.all_passed());
        assert_eq!(report.summary(), "1/3 checks passed");
    }

    #[test]
    fn test_verify_report_failure_blocks() {
        let mut report = VerifyReport::new();
        report.push(CheckReport::new("os", CheckStatus::Pass, "Windows 10"));
        report.push(CheckReport::new(
            "game installation",
            CheckStatus::Fail,
            "not found",
        ));

        assert!(!report.all_passed());
        assert_eq!(report.fail_count(), 1);
    }
}
