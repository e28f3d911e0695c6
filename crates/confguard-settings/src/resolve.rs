use crate::model::ConfguardConfigV1;
use anyhow::Context;
use camino::Utf8PathBuf;
use confguard_domain::policy::{FailOn, NamespaceSelection, RegoVersion, RunnerConfig};
use confguard_types::{ids, InputFormat, OutputFormat};
use regex::Regex;

/// Values given on the command line. `None`/empty means "not given".
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub policy: Vec<String>,
    pub data: Vec<String>,
    pub namespace: Vec<String>,
    pub all_namespaces: Option<bool>,
    pub combine: Option<bool>,
    pub ignore: Option<String>,
    pub input: Option<String>,
    pub trace: Option<bool>,
    pub fail_on_warn: Option<bool>,
    pub output: Option<String>,
    pub rego_version: Option<String>,
    pub parallelism: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub runner: RunnerConfig,
    pub fail_on: FailOn,
    pub output: OutputFormat,
}

pub fn resolve_config(
    cfg: ConfguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let defaults = RunnerConfig::default();

    let policy_paths = first_non_empty(overrides.policy, cfg.policy)
        .map(to_paths)
        .unwrap_or(defaults.policy_paths);
    let data_paths = first_non_empty(overrides.data, cfg.data)
        .map(to_paths)
        .unwrap_or_default();

    let namespaces = first_non_empty(overrides.namespace, cfg.namespace)
        .unwrap_or_else(|| vec![ids::DEFAULT_NAMESPACE.to_string()]);
    for ns in &namespaces {
        validate_namespace(ns)?;
    }
    let all = overrides
        .all_namespaces
        .or(cfg.all_namespaces)
        .unwrap_or(false);

    let ignore = overrides.ignore.or(cfg.ignore);
    if let Some(pattern) = ignore.as_deref() {
        Regex::new(pattern).with_context(|| format!("invalid ignore pattern: {pattern}"))?;
    }

    let input_format = overrides
        .input
        .or(cfg.input)
        .map(|s| s.parse::<InputFormat>())
        .transpose()?;

    let output = overrides
        .output
        .or(cfg.output)
        .map(|s| s.parse::<OutputFormat>())
        .transpose()?
        .unwrap_or_default();

    let rego_version = match overrides.rego_version.or(cfg.rego_version).as_deref() {
        Some(v) => parse_rego_version(v)?,
        None => RegoVersion::default(),
    };

    let parallelism = overrides.parallelism.or(cfg.parallelism);
    if parallelism == Some(0) {
        anyhow::bail!("parallelism must be at least 1");
    }

    let fail_on = FailOn::from_fail_on_warn(
        overrides.fail_on_warn.or(cfg.fail_on_warn).unwrap_or(false),
    );

    Ok(ResolvedConfig {
        runner: RunnerConfig {
            policy_paths,
            data_paths,
            namespaces: NamespaceSelection::from_flags(namespaces, all),
            combine: overrides.combine.or(cfg.combine).unwrap_or(false),
            ignore,
            input_format,
            trace: overrides.trace.or(cfg.trace).unwrap_or(false),
            rego_version,
            parallelism,
        },
        fail_on,
        output,
    })
}

fn first_non_empty(a: Vec<String>, b: Vec<String>) -> Option<Vec<String>> {
    [a, b].into_iter().find(|v| !v.is_empty())
}

fn to_paths(v: Vec<String>) -> Vec<Utf8PathBuf> {
    v.into_iter().map(Utf8PathBuf::from).collect()
}

fn validate_namespace(ns: &str) -> anyhow::Result<()> {
    let valid = !ns.is_empty()
        && ns.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if !valid {
        anyhow::bail!("invalid namespace: '{ns}' (expected a dotted identifier such as 'main')");
    }
    Ok(())
}

fn parse_rego_version(v: &str) -> anyhow::Result<RegoVersion> {
    match v {
        "v0" => Ok(RegoVersion::V0),
        "v1" => Ok(RegoVersion::V1),
        other => anyhow::bail!("unknown rego_version: {other} (expected v0|v1)"),
    }
}
