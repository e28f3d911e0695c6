//! Filesystem adapters: load reference data and policies, discover and group inputs.
//!
//! This crate is allowed to do filesystem IO (and read stdin for the `-` input). Everything
//! it returns is fully loaded; evaluation never touches the filesystem.

#![forbid(unsafe_code)]

mod data;
mod inputs;
mod policy;
mod walk;

pub use data::{load_data, DataLoadError};
pub use inputs::{discover_inputs, group_inputs, InputError};
pub use policy::{load_policies, PolicyLoadError};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use confguard_types::InputFormat;

    /// Parse arbitrary bytes as an input document of the given format.
    pub fn parse_input(bytes: &[u8], format: InputFormat) -> Result<usize, String> {
        confguard_parser::parse_bytes(bytes, format)
            .map(|p| p.documents.len())
            .map_err(|e| e.to_string())
    }

    /// Scan arbitrary text for a package declaration and queryable rule heads.
    pub fn scan_rules(text: &str) -> usize {
        confguard_engine::scan_source(text).rules.len()
    }
}
