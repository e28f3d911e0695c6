use crate::{ParseError, ParsedInput};
use confguard_types::InputFormat;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Parse a YAML stream. Each non-empty `---` document becomes one value; a stream with no
/// content yields a single `null`.
pub(crate) fn parse(text: &str) -> Result<ParsedInput, ParseError> {
    let mut documents = Vec::new();
    for de in serde_yaml::Deserializer::from_str(text) {
        let raw = serde_yaml::Value::deserialize(de)
            .map_err(|e| ParseError::syntax(InputFormat::Yaml, e))?;
        let value = to_json(raw)?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    if documents.is_empty() {
        documents.push(Value::Null);
    }
    Ok(ParsedInput { documents })
}

fn to_json(value: serde_yaml::Value) -> Result<Value, ParseError> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => number(&n)?,
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                map.insert(key_string(k)?, to_json(v)?);
            }
            Value::Object(map)
        }
        // Custom tags (`!Ref`, `!Sub`, ...) are dropped; the tagged value is kept.
        serde_yaml::Value::Tagged(tagged) => to_json(tagged.value)?,
    })
}

/// JSON has no `.nan` or `.inf`, so those are rejected rather than turned into `null`.
fn number(n: &serde_yaml::Number) -> Result<Value, ParseError> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Number(i.into()))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::Number(u.into()))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| ParseError::Syntax {
                format: InputFormat::Yaml,
                message: format!("non-finite number {n} has no JSON representation"),
            })
    }
}

fn key_string(key: serde_yaml::Value) -> Result<String, ParseError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_string(tagged.value),
        other => Err(ParseError::Syntax {
            format: InputFormat::Yaml,
            message: format!("unsupported mapping key: {other:?}"),
        }),
    }
}
