use crate::{ParseError, ParsedInput};
use confguard_types::InputFormat;
use serde_json::{Map, Number, Value};

pub(crate) fn parse(text: &str) -> Result<ParsedInput, ParseError> {
    let table: toml::Table = text
        .parse()
        .map_err(|e| ParseError::syntax(InputFormat::Toml, e))?;
    Ok(ParsedInput::single(table_to_json(table)?))
}

fn table_to_json(table: toml::Table) -> Result<Value, ParseError> {
    table
        .into_iter()
        .map(|(k, v)| Ok((k, to_json(v)?)))
        .collect::<Result<Map<_, _>, _>>()
        .map(Value::Object)
}

fn to_json(value: toml::Value) -> Result<Value, ParseError> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
            ParseError::Syntax {
                format: InputFormat::Toml,
                message: format!("non-finite number {f} has no JSON representation"),
            }
        })?,
        toml::Value::Boolean(b) => Value::Bool(b),
        // Rules compare datetimes as RFC 3339 strings.
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        toml::Value::Table(t) => table_to_json(t)?,
    })
}
