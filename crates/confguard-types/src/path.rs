use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids;

/// Path of an evaluated input, as it appears in results and in combined documents.
///
/// The text is kept exactly as given on the command line or as produced by directory
/// expansion, so a rule can address `input["./a.yaml"]` in combined mode. Only the empty
/// string is replaced, by `.`.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct InputPath(String);

impl Default for InputPath {
    fn default() -> Self {
        InputPath::new(".")
    }
}

impl InputPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        match s.as_ref() {
            "" => Self(".".to_string()),
            v => Self(v.to_string()),
        }
    }

    /// Marker used as the file name of the single result produced in combined mode.
    pub fn combined() -> Self {
        Self(ids::COMBINED_FILENAME.to_string())
    }

    /// Path standing for standard input.
    pub fn stdin() -> Self {
        Self(ids::STDIN_PATH.to_string())
    }

    pub fn is_stdin(&self) -> bool {
        self.0 == ids::STDIN_PATH
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased extension of the final path component, if any.
    pub fn extension(&self) -> Option<String> {
        Utf8Path::new(&self.0)
            .extension()
            .map(|e| e.to_ascii_lowercase())
    }
}

impl fmt::Display for InputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for InputPath {
    fn from(value: &Utf8Path) -> Self {
        InputPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for InputPath {
    fn from(value: Utf8PathBuf) -> Self {
        InputPath::new(value.as_str())
    }
}

impl From<&str> for InputPath {
    fn from(value: &str) -> Self {
        InputPath::new(value)
    }
}
