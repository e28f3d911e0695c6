//! Stable identifiers: rule naming conventions, markers and exit codes.
//!
//! Rule names are matched by prefix. `deny_foo` and `violation_foo` are deny-class rules,
//! `warn_foo` is a warn-class rule, and `exception` lists rule suffixes (`foo`) to exempt.

// Rule naming conventions
pub const RULE_DENY: &str = "deny";
pub const RULE_VIOLATION: &str = "violation";
pub const RULE_WARN: &str = "warn";
pub const RULE_EXCEPTION: &str = "exception";

/// Key of an object-valued rule result that carries the human-readable message.
pub const MESSAGE_KEY: &str = "msg";

// Defaults
pub const DEFAULT_POLICY_PATH: &str = "policy";
pub const DEFAULT_NAMESPACE: &str = "main";
pub const DEFAULT_CONFIG_FILE: &str = "confguard.toml";

// Markers
pub const COMBINED_FILENAME: &str = "Combined";
pub const STDIN_PATH: &str = "-";

// Exit codes
pub const EXIT_OK: i32 = 0;
/// Failures or exceptions (standard policy), or warnings only (fail-on-warn policy).
pub const EXIT_VIOLATIONS: i32 = 1;
/// Failures or exceptions under the fail-on-warn policy.
pub const EXIT_FAILURES_STRICT: i32 = 2;
/// The run itself could not complete (bad config, unloadable data or policy, cancellation).
pub const EXIT_RUNTIME_ERROR: i32 = 3;
