//! Use case orchestration for confguard.
//!
//! This crate provides the application layer: the `TestRunner` that drives a whole policy run,
//! plus thin use cases that coordinate settings, repo and render layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and process wiring.

#![forbid(unsafe_code)]

mod cancel;
mod error;
mod parse;
mod render;
mod runner;

pub use cancel::Cancellation;
pub use error::RunError;
pub use parse::{run_parse, ParseInput};
pub use render::{tool_meta, write_results};
pub use runner::TestRunner;
pub use test::{resolve, run_test, TestInput, TestOutput};
