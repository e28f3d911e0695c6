//! Closed sets of input and output formats.
//!
//! Both enums are resolved to concrete parsers/renderers through lookup tables in
//! `confguard-parser` and `confguard-render`; this crate only owns the names.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} format '{name}' (valid options are: {valid})")]
pub struct UnknownFormat {
    pub kind: &'static str,
    pub name: String,
    pub valid: String,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Yaml,
    Toml,
}

impl InputFormat {
    pub const ALL: [InputFormat; 3] = [InputFormat::Json, InputFormat::Yaml, InputFormat::Toml];

    pub fn as_str(self) -> &'static str {
        match self {
            InputFormat::Json => "json",
            InputFormat::Yaml => "yaml",
            InputFormat::Toml => "toml",
        }
    }

    /// Detect the format from a file extension (without the dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(InputFormat::Json),
            "yaml" | "yml" => Some(InputFormat::Yaml),
            "toml" => Some(InputFormat::Toml),
            _ => None,
        }
    }

    pub fn valid_names() -> String {
        Self::ALL.map(|f| f.as_str()).join(", ")
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yml" => Ok(InputFormat::Yaml),
            other => Self::ALL
                .into_iter()
                .find(|f| f.as_str() == other)
                .ok_or_else(|| UnknownFormat {
                    kind: "input",
                    name: other.to_string(),
                    valid: Self::valid_names(),
                }),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Stdout,
    Json,
    Tap,
    Table,
    Markdown,
    Github,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Stdout,
        OutputFormat::Json,
        OutputFormat::Tap,
        OutputFormat::Table,
        OutputFormat::Markdown,
        OutputFormat::Github,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Stdout => "stdout",
            OutputFormat::Json => "json",
            OutputFormat::Tap => "tap",
            OutputFormat::Table => "table",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Github => "github",
        }
    }

    pub fn valid_names() -> String {
        Self::ALL.map(|f| f.as_str()).join(", ")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFormat {
                kind: "output",
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}
