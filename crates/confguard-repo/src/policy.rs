use crate::walk::{collect_files, has_extension};
use camino::Utf8PathBuf;
use confguard_domain::data::DataStore;
use confguard_domain::policy::RegoVersion;
use confguard_engine::{PolicyCompileError, PolicySource, RuleSet};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum PolicyLoadError {
    #[error("reading policy path {path}: {message}")]
    Walk { path: Utf8PathBuf, message: String },

    #[error("reading policy file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no policies found in {}", .paths.join(", "))]
    NoPolicies { paths: Vec<String> },

    #[error(transparent)]
    Compile(#[from] PolicyCompileError),
}

/// Load every `.rego` file under `roots` and compile them as one unit against `data`.
///
/// Files are compiled in sorted path order per root, roots in the order given.
pub fn load_policies(
    roots: &[Utf8PathBuf],
    data: &DataStore,
    version: RegoVersion,
) -> Result<RuleSet, PolicyLoadError> {
    let mut files = Vec::new();
    for root in roots {
        let found = collect_files(root, |p| has_extension(p, &["rego"])).map_err(|e| {
            PolicyLoadError::Walk {
                path: root.clone(),
                message: e.to_string(),
            }
        })?;
        for path in found {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        return Err(PolicyLoadError::NoPolicies {
            paths: roots.iter().map(|p| p.to_string()).collect(),
        });
    }

    let sources: Vec<PolicySource> = files
        .par_iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|text| PolicySource::new(path.as_str().replace('\\', "/"), text))
                .map_err(|source| PolicyLoadError::Read {
                    path: path.clone(),
                    source,
                })
        })
        .collect::<Result<_, _>>()?;

    for source in &sources {
        debug!(path = %source.path, "read policy file");
    }

    let rules = RuleSet::compile(sources, data, version)?;
    info!(
        files = rules.source_count(),
        namespaces = rules.namespaces().len(),
        "policies compiled"
    );
    Ok(rules)
}
