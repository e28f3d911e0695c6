//! Input parsing: raw bytes to structured documents.
//!
//! Formats are a closed set (`InputFormat`) resolved to a parser function through a lookup
//! table. Every parser yields `serde_json::Value`s, the one document shape the rest of the
//! workspace understands.

#![forbid(unsafe_code)]

mod json;
mod toml_format;
mod yaml;

use confguard_types::{InputFormat, InputPath};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("input is not valid UTF-8")]
    NotUtf8,

    #[error("unsupported file extension '{ext}' (valid options are: json, yaml, yml, toml)")]
    UnknownExtension { ext: String },

    #[error("{format}: {message}")]
    Syntax {
        format: InputFormat,
        message: String,
    },
}

impl ParseError {
    pub(crate) fn syntax(format: InputFormat, err: impl std::fmt::Display) -> Self {
        ParseError::Syntax {
            format,
            message: err.to_string(),
        }
    }
}

/// Parsed content of one input. Always holds at least one value.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedInput {
    pub documents: Vec<Value>,
}

impl ParsedInput {
    pub fn single(value: Value) -> Self {
        Self {
            documents: vec![value],
        }
    }

    /// The value used when the input is embedded in a larger document.
    pub fn into_value(mut self) -> Value {
        if self.documents.len() == 1 {
            self.documents.pop().unwrap_or(Value::Null)
        } else {
            Value::Array(self.documents)
        }
    }
}

type ParseFn = fn(&str) -> Result<ParsedInput, ParseError>;

const PARSERS: [(InputFormat, ParseFn); 3] = [
    (InputFormat::Json, json::parse),
    (InputFormat::Yaml, yaml::parse),
    (InputFormat::Toml, toml_format::parse),
];

fn parser_for(format: InputFormat) -> ParseFn {
    PARSERS
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, p)| *p)
        .unwrap_or(json::parse)
}

/// Choose the parser for a path: the override if any, YAML for stdin, else the extension.
pub fn detect(path: &InputPath, format_override: Option<InputFormat>) -> Result<InputFormat, ParseError> {
    if let Some(format) = format_override {
        return Ok(format);
    }
    if path.is_stdin() {
        return Ok(InputFormat::Yaml);
    }
    let ext = path.extension().unwrap_or_default();
    InputFormat::from_extension(&ext).ok_or(ParseError::UnknownExtension { ext })
}

pub fn parse_str(text: &str, format: InputFormat) -> Result<ParsedInput, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    parser_for(format)(text)
}

pub fn parse_bytes(bytes: &[u8], format: InputFormat) -> Result<ParsedInput, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::NotUtf8)?;
    parse_str(text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_format_has_a_parser() {
        for format in InputFormat::ALL {
            assert!(PARSERS.iter().any(|(f, _)| *f == format), "{format}");
        }
    }

    #[test]
    fn detects_by_extension() {
        let got = detect(&InputPath::new("deploy/app.YML"), None).expect("detect");
        assert_eq!(got, InputFormat::Yaml);
        let got = detect(&InputPath::new("Cargo.toml"), None).expect("detect");
        assert_eq!(got, InputFormat::Toml);
    }

    #[test]
    fn override_wins_and_stdin_defaults_to_yaml() {
        let got = detect(&InputPath::new("x.yaml"), Some(InputFormat::Json)).expect("detect");
        assert_eq!(got, InputFormat::Json);
        let got = detect(&InputPath::stdin(), None).expect("detect");
        assert_eq!(got, InputFormat::Yaml);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = detect(&InputPath::new("main.tf"), None).unwrap_err();
        assert!(matches!(err, ParseError::UnknownExtension { ref ext } if ext == "tf"));
        let err = detect(&InputPath::new("Dockerfile"), None).unwrap_err();
        assert!(matches!(err, ParseError::UnknownExtension { ref ext } if ext.is_empty()));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = parse_bytes(&[0xff, 0xfe, 0x00], InputFormat::Json).unwrap_err();
        assert!(matches!(err, ParseError::NotUtf8));
    }

    #[test]
    fn strips_byte_order_mark() {
        let parsed = parse_bytes("\u{feff}{\"a\": 1}".as_bytes(), InputFormat::Json).expect("parse");
        assert_eq!(parsed.documents, vec![json!({"a": 1})]);
    }

    #[test]
    fn into_value_wraps_multiple_documents() {
        let parsed = ParsedInput {
            documents: vec![json!(1), json!(2)],
        };
        assert_eq!(parsed.into_value(), json!([1, 2]));
        assert_eq!(ParsedInput::single(json!("x")).into_value(), json!("x"));
    }
}
