use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Files under `root` accepted by `accept`, sorted by path.
///
/// A root that is itself a file is returned as is when accepted. Non-UTF-8 paths are skipped.
pub(crate) fn collect_files(
    root: &Utf8Path,
    accept: impl Fn(&Utf8Path) -> bool,
) -> Result<Vec<Utf8PathBuf>, walkdir::Error> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            continue;
        };
        if accept(&path) {
            out.push(path);
        }
    }
    // Stable order.
    out.sort();
    out.dedup();
    Ok(out)
}

pub(crate) fn has_extension(path: &Utf8Path, exts: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| exts.contains(&e.as_str()))
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
