//! Interpreting rule values as triggers.

use confguard_domain::model::Trigger;
use confguard_types::ids;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Triggers produced by one rule's value.
///
/// A set or array yields one trigger per element. Strings are messages, objects carry the
/// message under `msg` and everything else as metadata, `true` and other scalars use the
/// default message. `false`, `null` and empty collections yield nothing.
pub(crate) fn triggers_of(rule: &str, value: &Value) -> Vec<Trigger> {
    match value {
        Value::Array(items) => items.iter().filter_map(|v| element(rule, v)).collect(),
        other => element(rule, other).into_iter().collect(),
    }
}

fn element(rule: &str, value: &Value) -> Option<Trigger> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(Trigger::new(rule, s.clone())),
        Value::Object(map) => Some(from_object(rule, map)),
        _ => Some(Trigger::default_for(rule)),
    }
}

fn from_object(rule: &str, map: &Map<String, Value>) -> Trigger {
    let mut trigger = match map.get(ids::MESSAGE_KEY) {
        Some(Value::String(msg)) => Trigger::new(rule, msg.clone()),
        Some(other) => Trigger::new(rule, other.to_string()),
        None => Trigger::default_for(rule),
    };
    let rest: Map<String, Value> = map
        .iter()
        .filter(|(k, _)| k.as_str() != ids::MESSAGE_KEY)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !rest.is_empty() {
        trigger.metadata = Value::Object(rest);
    }
    trigger
}

/// Rule suffixes named by an `exception` rule: strings, or arrays of strings, at any depth.
pub(crate) fn exempted_keys(value: &Value) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    collect_keys(value, &mut keys);
    keys
}

fn collect_keys(value: &Value, keys: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            keys.insert(s.clone());
        }
        Value::Array(items) => items.iter().for_each(|v| collect_keys(v, keys)),
        _ => {}
    }
}
