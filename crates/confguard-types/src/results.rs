use crate::InputPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Stable schema identifier for the JSON report.
pub const SCHEMA_REPORT_V1: &str = "confguard.report.v1";

/// One failure, warning, exception or exemption attached to a checked file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultMessage {
    pub message: String,

    /// Namespace the message came from. Absent for file-level problems such as parse errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Name of the rule that produced the message, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Extra keys of an object-valued rule result (everything except `msg`).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: JsonValue,
}

impl ResultMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            namespace: None,
            rule: None,
            metadata: JsonValue::Null,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn from_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Aggregate outcome for one input file, or for the whole combined document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub filename: InputPath,

    /// Namespaces the file was evaluated against, in resolution order.
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Number of (namespace, file) cells without failures, warnings or exceptions.
    pub successes: u32,

    #[serde(default)]
    pub failures: Vec<ResultMessage>,
    #[serde(default)]
    pub warnings: Vec<ResultMessage>,

    /// Evaluation-time errors: the file or a rule could not be evaluated.
    #[serde(default)]
    pub exceptions: Vec<ResultMessage>,

    /// Triggers suppressed by an `exception` rule. Informational only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exemptions: Vec<ResultMessage>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<String>,
}

impl CheckResult {
    pub fn new(filename: InputPath) -> Self {
        Self {
            filename,
            ..Self::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }
}

/// Ordered results of a run, in input discovery order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RunResult(pub Vec<CheckResult>);

impl RunResult {
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self(results)
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.0)
    }
}

impl<'a> IntoIterator for &'a RunResult {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Totals across a run. `tests` counts every success, failure, warning and exception.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub files: u32,
    pub tests: u32,
    pub passed: u32,
    pub warnings: u32,
    pub failures: u32,
    pub exceptions: u32,
    pub exemptions: u32,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut s = Summary {
            files: results.len() as u32,
            ..Summary::default()
        };
        for r in results {
            s.passed += r.successes;
            s.warnings += r.warnings.len() as u32;
            s.failures += r.failures.len() as u32;
            s.exceptions += r.exceptions.len() as u32;
            s.exemptions += r.exemptions.len() as u32;
        }
        s.tests = s.passed + s.warnings + s.failures + s.exceptions;
        s
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// JSON report written by the `json` output format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub summary: Summary,
    pub results: RunResult,
}
