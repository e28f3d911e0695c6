use crate::discover::{scan_source, DiscoveredRule};
use confguard_domain::data::DataStore;
use confguard_domain::policy::RegoVersion;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// One rule-source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySource {
    pub path: String,
    pub text: String,
}

impl PolicySource {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// A compiler diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: Option<u32>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file, line, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_diagnostics(.diagnostics))]
pub struct PolicyCompileError {
    pub diagnostics: Vec<Diagnostic>,
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = format!(
        "policy compilation failed with {} error(s)",
        diagnostics.len()
    );
    for d in diagnostics {
        out.push_str("\n  ");
        out.push_str(&d.to_string());
    }
    out
}

/// Building an engine from an already validated rule set failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("rule engine setup failed: {0}")]
pub struct EngineError(pub String);

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":(\d+):\d+").expect("valid regex"))
}

fn diagnostic(file: &str, message: impl fmt::Display) -> Diagnostic {
    let message = message.to_string();
    let line = message
        .find(file)
        .map(|at| &message[at + file.len()..])
        .or(Some(message.as_str()))
        .and_then(|rest| line_regex().captures(rest))
        .and_then(|caps| caps[1].parse().ok());
    Diagnostic {
        file: file.to_string(),
        line,
        message: message.lines().next().unwrap_or_default().trim().to_string(),
    }
}

/// Compiled, immutable view of every loaded policy.
#[derive(Clone, Debug)]
pub struct RuleSet {
    sources: Vec<PolicySource>,
    data_json: String,
    version: RegoVersion,
    namespaces: BTreeMap<String, Vec<DiscoveredRule>>,
}

impl RuleSet {
    /// Compile all sources as one unit. Every failing file contributes a diagnostic.
    pub fn compile(
        sources: Vec<PolicySource>,
        data: &DataStore,
        version: RegoVersion,
    ) -> Result<RuleSet, PolicyCompileError> {
        let mut engine = new_engine(version);
        let mut diagnostics = Vec::new();
        let mut namespaces: BTreeMap<String, Vec<DiscoveredRule>> = BTreeMap::new();

        for source in &sources {
            if let Err(e) = engine.add_policy(source.path.clone(), source.text.clone()) {
                diagnostics.push(diagnostic(&source.path, e));
                continue;
            }
            let layout = scan_source(&source.text);
            let Some(package) = layout.package else {
                diagnostics.push(Diagnostic {
                    file: source.path.clone(),
                    line: None,
                    message: "unsupported package declaration".to_string(),
                });
                continue;
            };
            debug!(file = %source.path, package = %package, rules = layout.rules.len(), "compiled policy");
            let rules = namespaces.entry(package).or_default();
            for rule in layout.rules {
                if rules.iter().all(|r| r.name != rule.name) {
                    rules.push(rule);
                }
            }
        }

        let data_json = data.to_value().to_string();
        if let Err(e) = engine.add_data_json(&data_json) {
            diagnostics.push(Diagnostic {
                file: "data".to_string(),
                line: None,
                message: e.to_string(),
            });
        }

        if !diagnostics.is_empty() {
            return Err(PolicyCompileError { diagnostics });
        }

        Ok(RuleSet {
            sources,
            data_json,
            version,
            namespaces,
        })
    }

    /// Every namespace declared by at least one source, sorted.
    pub fn namespaces(&self) -> BTreeSet<String> {
        self.namespaces.keys().cloned().collect()
    }

    /// Queryable rules of a namespace in discovery order. Unknown namespaces have none.
    pub fn rules(&self, namespace: &str) -> &[DiscoveredRule] {
        self.namespaces
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Build a fresh engine loaded with every source and the data document.
    pub(crate) fn instantiate(&self) -> Result<regorus::Engine, EngineError> {
        let mut engine = new_engine(self.version);
        for source in &self.sources {
            engine
                .add_policy(source.path.clone(), source.text.clone())
                .map_err(|e| EngineError(format!("{}: {e}", source.path)))?;
        }
        engine
            .add_data_json(&self.data_json)
            .map_err(|e| EngineError(e.to_string()))?;
        Ok(engine)
    }
}

fn new_engine(version: RegoVersion) -> regorus::Engine {
    let mut engine = regorus::Engine::new();
    engine.set_rego_v0(version == RegoVersion::V0);
    engine
}
