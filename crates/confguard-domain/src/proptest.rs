//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Exit policy independence from warnings
//! - Aggregation determinism and counting

use crate::aggregate::aggregate_document;
use crate::exit::{exit_code, exit_code_fail_on_warn};
use crate::model::{CellOutcome, Trigger};
use confguard_types::{CheckResult, InputPath, ResultMessage, RunResult};
use proptest::prelude::*;

fn arb_check_result() -> impl Strategy<Value = CheckResult> {
    (0u32..4, 0usize..3, 0usize..3, 0usize..2).prop_map(|(s, f, w, e)| {
        let mut r = CheckResult::new(InputPath::new("doc.yaml"));
        r.successes = s;
        r.failures = vec![ResultMessage::new("f"); f];
        r.warnings = vec![ResultMessage::new("w"); w];
        r.exceptions = vec![ResultMessage::new("e"); e];
        r
    })
}

fn arb_namespace() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}").expect("valid regex")
}

fn arb_cell() -> impl Strategy<Value = CellOutcome> {
    (
        arb_namespace(),
        prop::collection::vec("[a-z ]{1,12}", 0..3),
        prop::collection::vec("[a-z ]{1,12}", 0..3),
        any::<bool>(),
    )
        .prop_map(|(ns, denies, warns, errored)| {
            let mut cell = CellOutcome::new(ns);
            cell.deny.triggered = denies.into_iter().map(|m| Trigger::new("deny", m)).collect();
            if errored {
                cell.deny.errors.push("eval error".to_string());
            }
            cell.warn.triggered = warns.into_iter().map(|m| Trigger::new("warn", m)).collect();
            cell
        })
}

proptest! {
    #[test]
    fn warnings_never_change_standard_exit_code(
        results in prop::collection::vec(arb_check_result(), 0..6),
        extra in prop::collection::vec(0usize..4, 0..6),
    ) {
        let base = RunResult::new(results.clone());
        let toggled = RunResult::new(
            results
                .into_iter()
                .zip(extra.into_iter().chain(std::iter::repeat(0)))
                .map(|(mut r, n)| {
                    r.warnings = vec![ResultMessage::new("w"); n];
                    r
                })
                .collect(),
        );
        prop_assert_eq!(exit_code(&base), exit_code(&toggled));
    }

    #[test]
    fn strict_exit_code_is_never_below_standard(
        results in prop::collection::vec(arb_check_result(), 0..6),
    ) {
        let run = RunResult::new(results);
        prop_assert!(exit_code_fail_on_warn(&run) >= exit_code(&run));
    }

    #[test]
    fn aggregation_is_deterministic(cells in prop::collection::vec(arb_cell(), 0..5)) {
        let namespaces: Vec<String> = cells.iter().map(|c| c.namespace.clone()).collect();
        let a = aggregate_document(InputPath::new("x.yaml"), &namespaces, cells.clone());
        let b = aggregate_document(InputPath::new("x.yaml"), &namespaces, cells);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn successes_plus_dirty_cells_equals_cell_count(
        cells in prop::collection::vec(arb_cell(), 0..5),
    ) {
        let dirty = cells.iter().filter(|c| !c.is_clean()).count() as u32;
        let total = cells.len() as u32;
        let r = aggregate_document(InputPath::new("x.yaml"), &[], cells);
        prop_assert_eq!(r.successes + dirty, total);
    }
}
