use camino::Utf8PathBuf;
use confguard_types::{ids, InputFormat};

/// Which namespaces every document is evaluated against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespaceSelection {
    /// Use these names verbatim, in this order.
    Explicit(Vec<String>),
    /// Use every namespace discovered while compiling policies, sorted.
    All,
}

impl NamespaceSelection {
    /// `all` wins over the explicit list.
    pub fn from_flags(namespaces: Vec<String>, all: bool) -> Self {
        if all {
            NamespaceSelection::All
        } else {
            NamespaceSelection::Explicit(namespaces)
        }
    }
}

impl Default for NamespaceSelection {
    fn default() -> Self {
        NamespaceSelection::Explicit(vec![ids::DEFAULT_NAMESPACE.to_string()])
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegoVersion {
    #[default]
    V0,
    V1,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailOn {
    /// Only failures and exceptions fail the run.
    #[default]
    Failure,
    /// Warnings fail the run too.
    Warning,
}

impl FailOn {
    pub fn from_fail_on_warn(fail_on_warn: bool) -> Self {
        if fail_on_warn {
            FailOn::Warning
        } else {
            FailOn::Failure
        }
    }
}

/// Immutable configuration of a test run, built once and handed to the runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    pub policy_paths: Vec<Utf8PathBuf>,
    pub data_paths: Vec<Utf8PathBuf>,
    pub namespaces: NamespaceSelection,
    pub combine: bool,
    /// Regular expression; matching input paths are skipped.
    pub ignore: Option<String>,
    /// Forces one parser for every input instead of detecting by extension.
    pub input_format: Option<InputFormat>,
    pub trace: bool,
    pub rego_version: RegoVersion,
    /// Worker pool size. `None` uses the available parallelism.
    pub parallelism: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            policy_paths: vec![Utf8PathBuf::from(ids::DEFAULT_POLICY_PATH)],
            data_paths: Vec::new(),
            namespaces: NamespaceSelection::default(),
            combine: false,
            ignore: None,
            input_format: None,
            trace: false,
            rego_version: RegoVersion::default(),
            parallelism: None,
        }
    }
}
