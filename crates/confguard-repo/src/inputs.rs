use crate::walk::{collect_files, has_extension};
use camino::Utf8Path;
use confguard_domain::model::{InputDocument, InputUnit};
use confguard_parser::{ParseError, ParsedInput};
use confguard_types::{InputFormat, InputPath};
use rayon::prelude::*;
use regex::Regex;
use std::io::Read;
use tracing::{debug, info};

const INPUT_EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "toml"];

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("expanding input directory {path}: {message}")]
    Walk { path: InputPath, message: String },

    #[error("reading {path}: {source}")]
    Read {
        path: InputPath,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: InputPath,
        #[source]
        source: ParseError,
    },
}

/// Expand the raw input list: directories become their input files in sorted order, `-`
/// and plain paths are kept verbatim (a missing file surfaces later as a read error).
pub fn discover_inputs(raw: &[String]) -> Result<Vec<InputPath>, InputError> {
    let mut out = Vec::new();
    for arg in raw {
        let path = InputPath::new(arg);
        if path.is_stdin() || !Utf8Path::new(arg).is_dir() {
            out.push(path);
            continue;
        }
        let found = collect_files(Utf8Path::new(arg), |p| has_extension(p, &INPUT_EXTENSIONS))
            .map_err(|e| InputError::Walk {
                path: path.clone(),
                message: e.to_string(),
            })?;
        out.extend(found.iter().map(|p| InputPath::from(p.as_path())));
    }
    Ok(out)
}

/// Decide how inputs are evaluated.
///
/// Paths matching `ignore` are dropped first. Per-file mode yields one unit per file, with
/// unreadable or unparsable files as `InputUnit::Unparsable`. Combined mode yields exactly
/// one document keyed by path, even when no file survives; any bad file fails the call.
pub fn group_inputs(
    inputs: Vec<InputPath>,
    ignore: Option<&Regex>,
    combine: bool,
    format: Option<InputFormat>,
) -> Result<Vec<InputUnit>, InputError> {
    let total = inputs.len();
    let kept: Vec<InputPath> = inputs
        .into_iter()
        .filter(|p| ignore.is_none_or(|re| !re.is_match(p.as_str())))
        .collect();
    if kept.len() != total {
        debug!(ignored = total - kept.len(), "inputs matched the ignore pattern");
    }

    // Stdin can only be read once and never from a worker.
    let stdin = if kept.iter().any(InputPath::is_stdin) {
        Some(read_stdin())
    } else {
        None
    };

    let parsed: Vec<Result<ParsedInput, InputError>> = kept
        .par_iter()
        .map(|path| load_input(path, format, stdin.as_ref()))
        .collect();

    info!(files = kept.len(), combine, "inputs grouped");

    if combine {
        let entries = kept
            .into_iter()
            .zip(parsed)
            .map(|(path, result)| result.map(|p| (path, p.documents)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(vec![InputUnit::Document(InputDocument::combined(entries))]);
    }

    Ok(kept
        .into_iter()
        .zip(parsed)
        .map(|(path, result)| match result {
            Ok(p) => InputUnit::Document(InputDocument::new(path, p.documents)),
            Err(e) => InputUnit::Unparsable {
                path,
                error: error_message(&e),
            },
        })
        .collect())
}

fn error_message(err: &InputError) -> String {
    match err {
        InputError::Read { source, .. } => format!("reading file: {source}"),
        InputError::Parse { source, .. } => format!("parsing file: {source}"),
        InputError::Walk { message, .. } => message.clone(),
    }
}

fn read_stdin() -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map(|_| buf)
        .map_err(|e| e.to_string())
}

fn load_input(
    path: &InputPath,
    format: Option<InputFormat>,
    stdin: Option<&Result<Vec<u8>, String>>,
) -> Result<ParsedInput, InputError> {
    let detected = confguard_parser::detect(path, format).map_err(|source| InputError::Parse {
        path: path.clone(),
        source,
    })?;

    let bytes = if path.is_stdin() {
        match stdin {
            Some(Ok(bytes)) => bytes.clone(),
            Some(Err(message)) => {
                return Err(InputError::Read {
                    path: path.clone(),
                    source: std::io::Error::other(message.clone()),
                });
            }
            None => Vec::new(),
        }
    } else {
        std::fs::read(path.as_str()).map_err(|source| InputError::Read {
            path: path.clone(),
            source,
        })?
    };

    confguard_parser::parse_bytes(&bytes, detected).map_err(|source| InputError::Parse {
        path: path.clone(),
        source,
    })
}
