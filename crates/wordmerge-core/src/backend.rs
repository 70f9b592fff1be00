use std::path::Path;

use thiserror::Error;

use crate::{ExtractionResult, TextBlock};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open package: {0}")]
    OpenError(String),
    #[error("package part not found: {0}")]
    MissingPart(String),
    #[error("malformed XML: {0}")]
    Xml(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One way of recovering text blocks from a document package.
///
/// The package reader holds an ordered list of these and takes the first
/// non-empty result. An `Err` or an empty `Vec` both mean "no result"; the
/// next backend in line gets a turn.
pub trait PackageBackend: Send + Sync {
    /// Short label used in logs and extraction results.
    fn name(&self) -> &'static str;

    /// Extract the ordered text blocks of the package at `path`.
    fn extract_blocks(&self, path: &Path) -> Result<Vec<TextBlock>, BackendError>;

    /// Extract and label the result. Backends that pick between several
    /// payloads override this to report which one they used.
    fn extract(&self, path: &Path) -> Result<ExtractionResult, BackendError> {
        Ok(ExtractionResult::new(self.extract_blocks(path)?, self.name()))
    }
}
