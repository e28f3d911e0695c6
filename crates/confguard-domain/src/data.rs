//! Reference data bound as `data` during evaluation.

use serde_json::{Map, Value};

/// Two data files tried to define the same non-object value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("conflicting data at '{path}'")]
pub struct DataConflict {
    pub path: String,
}

/// Tree of loaded reference data.
///
/// A file at `a/b/c.yaml` under a data root is stored under the segments `["a", "b", "c"]`,
/// so rules read it as `data.a.b.c`. Objects landing on the same path are merged key by key;
/// any other overlap is a conflict.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataStore {
    root: Map<String, Value>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, segments: &[String], value: Value) -> Result<(), DataConflict> {
        let Some((leaf, parents)) = segments.split_last() else {
            return match value {
                Value::Object(map) => merge_maps(&mut self.root, map, ""),
                _ => Err(DataConflict {
                    path: String::new(),
                }),
            };
        };

        let mut cursor = &mut self.root;
        let mut walked = Vec::with_capacity(segments.len());
        for segment in parents {
            walked.push(segment.as_str());
            let entry = cursor
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            cursor = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(DataConflict {
                        path: walked.join("."),
                    });
                }
            };
        }

        walked.push(leaf.as_str());
        let path = walked.join(".");
        if !cursor.contains_key(leaf) {
            cursor.insert(leaf.clone(), value);
            return Ok(());
        }
        match (cursor.get_mut(leaf), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming, &path)
            }
            _ => Err(DataConflict { path }),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

fn merge_maps(
    into: &mut Map<String, Value>,
    from: Map<String, Value>,
    base: &str,
) -> Result<(), DataConflict> {
    for (key, incoming) in from {
        let path = if base.is_empty() {
            key.clone()
        } else {
            format!("{base}.{key}")
        };
        if !into.contains_key(&key) {
            into.insert(key, incoming);
            continue;
        }
        match (into.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming, &path)?;
            }
            _ => return Err(DataConflict { path }),
        }
    }
    Ok(())
}
