use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod archive;

// Re-export domain types for convenience
pub use archive::{ArchiveBackend, DOCUMENT_XML, WEB_ARCHIVE};
pub use wordmerge_core::{ExtractionResult, PackageBackend, TextBlock};
pub use wordmerge_ooxml::OoxmlBackend;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),
}

/// Recovers text from a package by trying an ordered list of backends.
///
/// The first backend returning at least one block wins; later backends are
/// not consulted. Backend errors and empty results are logged at `debug` and
/// treated alike.
pub struct PackageReader {
    backends: Vec<Box<dyn PackageBackend>>,
}

impl Default for PackageReader {
    /// The document-object reader, then the raw archive scan.
    fn default() -> Self {
        Self::with_backends(vec![
            Box::new(OoxmlBackend::new()),
            Box::new(ArchiveBackend::new()),
        ])
    }
}

impl PackageReader {
    pub fn with_backends(backends: Vec<Box<dyn PackageBackend>>) -> Self {
        Self { backends }
    }

    /// Extract text blocks from the package at `path`.
    ///
    /// Only a path that cannot be read at all is an error; a package no
    /// backend understands gives an empty result.
    pub fn extract(&self, path: &Path) -> Result<ExtractionResult, IngestError> {
        let meta = std::fs::metadata(path).map_err(|source| IngestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(IngestError::NotAFile(path.to_path_buf()));
        }

        for backend in &self.backends {
            match backend.extract(path) {
                Ok(result) if !result.is_empty() => {
                    tracing::debug!(
                        path = %path.display(),
                        strategy = result.strategy.unwrap_or(backend.name()),
                        blocks = result.blocks.len(),
                        "extracted"
                    );
                    return Ok(result);
                }
                Ok(_) => {
                    tracing::debug!(path = %path.display(), strategy = backend.name(), "no blocks");
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), strategy = backend.name(), error = %e, "strategy failed");
                }
            }
        }

        Ok(ExtractionResult::empty())
    }
}
