//! Fuzz target for input document parsing.
//!
//! Goal: The JSON, YAML and TOML parsers should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_input_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use confguard_types::InputFormat;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Format {
    Json,
    Yaml,
    Toml,
}

#[derive(Arbitrary, Debug)]
struct Case<'a> {
    format: Format,
    bytes: &'a [u8],
}

fuzz_target!(|case: Case<'_>| {
    let format = match case.format {
        Format::Json => InputFormat::Json,
        Format::Yaml => InputFormat::Yaml,
        Format::Toml => InputFormat::Toml,
    };
    if let Ok(count) = confguard_repo::fuzz::parse_input(case.bytes, format) {
        // A successful parse always yields at least one document.
        assert!(count >= 1);
    }
});
