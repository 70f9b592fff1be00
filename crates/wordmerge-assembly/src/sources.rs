use std::path::{Path, PathBuf};

use crate::AssemblyError;

/// List the documents to merge: regular files directly inside `dir` whose
/// extension is exactly `extension`, hidden files excluded, sorted by path.
pub fn discover_sources(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, AssemblyError> {
    if !dir.is_dir() {
        return Err(AssemblyError::InputDirMissing(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || is_hidden(&path) {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(AssemblyError::NoSources {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    paths.sort();
    Ok(paths)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
