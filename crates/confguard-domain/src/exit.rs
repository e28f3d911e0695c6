use crate::policy::FailOn;
use confguard_types::{ids, RunResult};

/// Standard policy: failures and exceptions fail the run, warnings never do.
pub fn exit_code(run: &RunResult) -> i32 {
    if run.iter().any(|r| r.has_failures() || r.has_exceptions()) {
        ids::EXIT_VIOLATIONS
    } else {
        ids::EXIT_OK
    }
}

/// Strict policy: warnings fail the run as well.
///
/// Failures and exceptions map to a higher code than warnings alone so callers can tell the
/// two apart.
pub fn exit_code_fail_on_warn(run: &RunResult) -> i32 {
    if run.iter().any(|r| r.has_failures() || r.has_exceptions()) {
        ids::EXIT_FAILURES_STRICT
    } else if run.iter().any(|r| r.has_warnings()) {
        ids::EXIT_VIOLATIONS
    } else {
        ids::EXIT_OK
    }
}

impl FailOn {
    pub fn exit_code(self, run: &RunResult) -> i32 {
        match self {
            FailOn::Failure => exit_code(run),
            FailOn::Warning => exit_code_fail_on_warn(run),
        }
    }
}
