//! Folding raw rule outcomes into per-file check results.

use crate::model::{CellOutcome, Trigger};
use confguard_types::{CheckResult, InputPath, ResultMessage, RunResult};

/// Fold the outcomes of every namespace cell for one document into one `CheckResult`.
///
/// `cells` must be in namespace resolution order; within a cell, triggers are in rule
/// discovery order. Both orders carry through to the message lists unchanged.
pub fn aggregate_document(
    path: InputPath,
    namespaces: &[String],
    cells: Vec<CellOutcome>,
) -> CheckResult {
    let mut result = CheckResult::new(path);
    result.namespaces = namespaces.to_vec();

    for cell in cells {
        if cell.is_clean() {
            result.successes += 1;
        }
        let CellOutcome {
            namespace,
            mut deny,
            mut warn,
            exception,
            trace,
        } = cell;

        result
            .failures
            .extend(deny.triggered.drain(..).map(|t| message(&namespace, t)));
        result
            .warnings
            .extend(warn.triggered.drain(..).map(|t| message(&namespace, t)));

        // Exception rules run first, so their errors lead.
        for outcome in [exception, deny, warn] {
            result
                .exemptions
                .extend(outcome.exempted.into_iter().map(|t| message(&namespace, t)));
            result.exceptions.extend(
                outcome
                    .errors
                    .into_iter()
                    .map(|e| ResultMessage::new(e).in_namespace(namespace.clone())),
            );
        }
        result.traces.extend(trace);
    }

    result
}

fn message(namespace: &str, trigger: Trigger) -> ResultMessage {
    ResultMessage::new(trigger.message)
        .in_namespace(namespace)
        .from_rule(trigger.rule)
        .with_metadata(trigger.metadata)
}

/// Result for an input that could not be parsed: one exception, no namespace attribution.
pub fn unparsable_result(path: InputPath, namespaces: &[String], error: &str) -> CheckResult {
    let mut result = CheckResult::new(path);
    result.namespaces = namespaces.to_vec();
    result.exceptions.push(ResultMessage::new(error));
    result
}

/// Assemble the run result. Input order is preserved as given.
pub fn assemble(results: Vec<CheckResult>) -> RunResult {
    RunResult::new(results)
}
