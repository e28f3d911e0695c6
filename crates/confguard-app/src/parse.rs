//! The `parse` use case: show inputs exactly as rules would see them.

use crate::test::resolve;
use anyhow::Context;
use confguard_domain::model::InputUnit;
use confguard_settings::Overrides;
use regex::Regex;
use serde_json::{Map, Value};

#[derive(Clone, Debug)]
pub struct ParseInput<'a> {
    pub config_text: &'a str,
    pub overrides: Overrides,
    pub inputs: &'a [String],
}

/// Pretty JSON of the grouped inputs.
///
/// In combined mode this is the combined document itself; otherwise an object keyed by path
/// whose values are the documents (an array for multi-document files). Any unparsable
/// input is an error.
pub fn run_parse(input: ParseInput<'_>) -> anyhow::Result<String> {
    let resolved = resolve(input.config_text, input.overrides)?;
    let cfg = resolved.runner;
    let ignore = cfg
        .ignore
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("compile ignore pattern")?;

    let paths = confguard_repo::discover_inputs(input.inputs)?;
    let units = confguard_repo::group_inputs(paths, ignore.as_ref(), cfg.combine, cfg.input_format)?;

    let mut out = Map::new();
    for unit in units {
        match unit {
            InputUnit::Document(mut doc) if cfg.combine => {
                let value = doc.documents.pop().unwrap_or(Value::Null);
                return to_pretty(&value);
            }
            InputUnit::Document(mut doc) => {
                let value = if doc.documents.len() == 1 {
                    doc.documents.pop().unwrap_or(Value::Null)
                } else {
                    Value::Array(doc.documents)
                };
                out.insert(doc.path.to_string(), value);
            }
            InputUnit::Unparsable { path, error } => {
                anyhow::bail!("{path}: {error}");
            }
        }
    }
    to_pretty(&Value::Object(out))
}

fn to_pretty(value: &Value) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(value).context("serialize parsed input")?;
    s.push('\n');
    Ok(s)
}
