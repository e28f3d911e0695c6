//! Rego adapter: turns policy sources into a queryable rule set and evaluates documents.
//!
//! Everything `regorus` owns stays inside one `Evaluator`. A `RuleSet` only keeps sources,
//! serialized data and the discovered rule layout, so it can be shared freely between worker
//! threads and each worker builds its own engine from it.

#![forbid(unsafe_code)]

pub mod discover;
mod evaluate;
mod ruleset;
mod triggers;

pub use discover::{scan_source, DiscoveredRule, SourceLayout};
pub use evaluate::Evaluator;
pub use ruleset::{Diagnostic, EngineError, PolicyCompileError, PolicySource, RuleSet};
