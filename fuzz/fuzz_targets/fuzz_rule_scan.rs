//! Fuzz target for Rego rule discovery.
//!
//! Goal: scanning policy text for the package line and rule heads should **never panic**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_scan
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = confguard_repo::fuzz::scan_rules(text);
    }
});
