//! Pure policy-run core (no IO).
//!
//! Input: compiled rule outcomes and grouped documents produced elsewhere.
//! Output: ordered check results and an exit code.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod data;
pub mod exit;
pub mod model;
pub mod namespaces;
pub mod policy;

#[cfg(test)]
mod proptest;

pub use aggregate::{aggregate_document, assemble, unparsable_result};
pub use exit::{exit_code, exit_code_fail_on_warn};
pub use namespaces::{missing_namespaces, resolve_namespaces};
