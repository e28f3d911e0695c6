//! Stable DTOs and IDs used across the confguard workspace.
//!
//! This crate is intentionally boring:
//! - result types handed from the runner to renderers and the exit policy
//! - stable string IDs, schema names and exit codes
//! - canonical input path handling
//! - closed sets of input and output formats

#![forbid(unsafe_code)]

pub mod formats;
pub mod ids;
pub mod path;
pub mod results;

pub use formats::{InputFormat, OutputFormat, UnknownFormat};
pub use path::InputPath;
pub use results::{
    CheckResult, ReportEnvelope, ResultMessage, RunResult, Summary, ToolMeta, SCHEMA_REPORT_V1,
};
