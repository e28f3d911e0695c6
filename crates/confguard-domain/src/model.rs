use confguard_types::{ids, InputPath};
use serde_json::{Map, Value};

/// A document bound as `input` during evaluation.
///
/// `documents` holds one value for ordinary files and the combined document, and one value per
/// sub-document for multi-document YAML files. Each value is evaluated separately and the
/// outcomes are folded into the same cell.
#[derive(Clone, Debug, PartialEq)]
pub struct InputDocument {
    pub path: InputPath,
    pub documents: Vec<Value>,
}

impl InputDocument {
    pub fn new(path: InputPath, documents: Vec<Value>) -> Self {
        Self { path, documents }
    }

    pub fn single(path: InputPath, value: Value) -> Self {
        Self::new(path, vec![value])
    }

    /// One synthetic document whose top-level keys are the source paths.
    ///
    /// Multi-document files contribute the array of their documents. No flattening happens:
    /// rules address `input["path/to/file.yaml"]`.
    pub fn combined(entries: Vec<(InputPath, Vec<Value>)>) -> Self {
        let mut map = Map::new();
        for (path, mut documents) in entries {
            let value = if documents.len() == 1 {
                documents.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(documents)
            };
            map.insert(path.as_str().to_string(), value);
        }
        Self::single(InputPath::combined(), Value::Object(map))
    }
}

/// Result of grouping: either something to evaluate, or a file that could not be parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum InputUnit {
    Document(InputDocument),
    Unparsable { path: InputPath, error: String },
}

/// Category of a rule, derived from its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleClass {
    Deny,
    Warn,
    Exception,
}

impl RuleClass {
    /// Classify a rule name: `deny`, `deny_*`, `violation`, `violation_*`, `warn`, `warn_*`,
    /// or exactly `exception`. Anything else is not queried.
    pub fn of_rule(name: &str) -> Option<RuleClass> {
        if name == ids::RULE_EXCEPTION {
            return Some(RuleClass::Exception);
        }
        if matches_prefix(name, ids::RULE_DENY) || matches_prefix(name, ids::RULE_VIOLATION) {
            return Some(RuleClass::Deny);
        }
        if matches_prefix(name, ids::RULE_WARN) {
            return Some(RuleClass::Warn);
        }
        None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleClass::Deny => "deny",
            RuleClass::Warn => "warn",
            RuleClass::Exception => "exception",
        }
    }
}

fn matches_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.len() > 1 && rest.starts_with('_'),
        None => false,
    }
}

/// The part of a named rule that an `exception` rule refers to: `deny_foo` -> `foo`.
///
/// Unnamed rules (`deny`, `warn`) cannot be exempted.
pub fn exemption_key(rule: &str) -> Option<&str> {
    [ids::RULE_DENY, ids::RULE_VIOLATION, ids::RULE_WARN]
        .into_iter()
        .find_map(|p| rule.strip_prefix(p).and_then(|r| r.strip_prefix('_')))
        .filter(|k| !k.is_empty())
}

/// A (namespace, rule-class) pair submitted to the evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Query {
    pub namespace: String,
    pub class: RuleClass,
}

impl Query {
    pub fn new(namespace: impl Into<String>, class: RuleClass) -> Self {
        Self {
            namespace: namespace.into(),
            class,
        }
    }

    /// Fully qualified reference of one rule of this query's namespace.
    pub fn rule_ref(&self, rule: &str) -> String {
        format!("data.{}.{}", self.namespace, rule)
    }
}

/// One triggered rule expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Trigger {
    pub rule: String,
    pub message: String,
    pub metadata: Value,
}

impl Trigger {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            metadata: Value::Null,
        }
    }

    /// Trigger without a declared message.
    pub fn default_for(rule: &str) -> Self {
        Self::new(rule, default_message(rule))
    }
}

pub fn default_message(rule: &str) -> String {
    format!("rule '{rule}' triggered")
}

/// Raw outcome of one query against one document.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleOutcome {
    pub query: Query,
    pub triggered: Vec<Trigger>,
    /// Triggers suppressed by the namespace's `exception` rule.
    pub exempted: Vec<Trigger>,
    /// Evaluation errors. Distinct from triggers: the rule could not run.
    pub errors: Vec<String>,
}

impl RuleOutcome {
    pub fn empty(query: Query) -> Self {
        Self {
            query,
            triggered: Vec::new(),
            exempted: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Everything one (document, namespace) cell produced, with one outcome per rule class.
#[derive(Clone, Debug, PartialEq)]
pub struct CellOutcome {
    pub namespace: String,
    pub deny: RuleOutcome,
    pub warn: RuleOutcome,
    pub exception: RuleOutcome,
    pub trace: Vec<String>,
}

impl CellOutcome {
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            deny: RuleOutcome::empty(Query::new(namespace.clone(), RuleClass::Deny)),
            warn: RuleOutcome::empty(Query::new(namespace.clone(), RuleClass::Warn)),
            exception: RuleOutcome::empty(Query::new(namespace.clone(), RuleClass::Exception)),
            namespace,
            trace: Vec::new(),
        }
    }

    pub fn outcome_mut(&mut self, class: RuleClass) -> &mut RuleOutcome {
        match class {
            RuleClass::Deny => &mut self.deny,
            RuleClass::Warn => &mut self.warn,
            RuleClass::Exception => &mut self.exception,
        }
    }

    /// A clean cell counts as one success. Exception rule values never dirty a cell.
    pub fn is_clean(&self) -> bool {
        self.deny.triggered.is_empty()
            && self.warn.triggered.is_empty()
            && [&self.deny, &self.warn, &self.exception]
                .iter()
                .all(|o| o.errors.is_empty())
    }
}
