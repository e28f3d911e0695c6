use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONFIG_V1: &str = "confguard.config.v1";

/// `confguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
/// Every field is optional; command-line flags win over values set here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfguardConfigV1 {
    /// Optional schema string for tooling (`confguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Policy files or directories. Defaults to `policy`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy: Vec<String>,

    /// Reference data files or directories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,

    /// Namespaces to test. Defaults to `main`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespace: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_namespaces: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine: Option<bool>,

    /// Regular expression; matching input paths are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,

    /// Input format override: `json`, `yaml`, `toml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_warn: Option<bool>,

    /// Output format: `stdout`, `json`, `tap`, `table`, `markdown`, `github`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Rego syntax version: `v0` (default) or `v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rego_version: Option<String>,

    /// Number of evaluation workers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,
}
