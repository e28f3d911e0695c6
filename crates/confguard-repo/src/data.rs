use crate::walk::{collect_files, has_extension};
use camino::{Utf8Path, Utf8PathBuf};
use confguard_domain::data::{DataConflict, DataStore};
use confguard_parser::ParseError;
use confguard_types::InputFormat;
use rayon::prelude::*;
use tracing::{debug, info};

const DATA_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("reading data path {path}: {message}")]
    Walk { path: Utf8PathBuf, message: String },

    #[error("reading data file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing data file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("loading data file {path}: {source}")]
    Conflict {
        path: Utf8PathBuf,
        #[source]
        source: DataConflict,
    },
}

struct DataFile {
    path: Utf8PathBuf,
    segments: Vec<String>,
}

/// Load every `.json`/`.yaml`/`.yml` file under `roots` into one store.
///
/// A file at `a/b/c.yaml` below a root lands at `data.a.b.c`; a root that is itself a file
/// lands under its stem. One unreadable or unparsable file fails the whole load.
pub fn load_data(roots: &[Utf8PathBuf]) -> Result<DataStore, DataLoadError> {
    let mut files = Vec::new();
    for root in roots {
        let found = collect_files(root, |p| has_extension(p, &DATA_EXTENSIONS)).map_err(|e| {
            DataLoadError::Walk {
                path: root.clone(),
                message: e.to_string(),
            }
        })?;
        files.extend(found.into_iter().map(|path| DataFile {
            segments: segments_for(root, &path),
            path,
        }));
    }

    let parsed: Vec<serde_json::Value> = files
        .par_iter()
        .map(|f| read_data_file(&f.path))
        .collect::<Result<_, _>>()?;

    let mut store = DataStore::new();
    for (file, value) in files.iter().zip(parsed) {
        debug!(path = %file.path, at = %file.segments.join("."), "loaded data file");
        store
            .insert(&file.segments, value)
            .map_err(|source| DataLoadError::Conflict {
                path: file.path.clone(),
                source,
            })?;
    }
    info!(files = files.len(), "data loaded");
    Ok(store)
}

fn read_data_file(path: &Utf8Path) -> Result<serde_json::Value, DataLoadError> {
    let bytes = std::fs::read(path).map_err(|source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = path
        .extension()
        .and_then(InputFormat::from_extension)
        .unwrap_or(InputFormat::Json);
    let parsed = confguard_parser::parse_bytes(&bytes, format).map_err(|source| {
        DataLoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(parsed.into_value())
}

fn segments_for(root: &Utf8Path, file: &Utf8Path) -> Vec<String> {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = rel
        .parent()
        .map(|p| p.components().map(|c| c.as_str().to_string()).collect())
        .unwrap_or_default();
    if let Some(stem) = file.file_stem() {
        segments.push(stem.to_string());
    }
    segments
}
