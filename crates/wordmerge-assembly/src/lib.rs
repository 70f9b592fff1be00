//! Merge many Word documents into one.
//!
//! Each source becomes a section: a styled title holding the file's base
//! name, an empty spacer paragraph, then one paragraph per recovered text
//! block. Sections are separated by page breaks. Sources are processed one at
//! a time in path order; a source that fails is logged, counted, and left out
//! while the rest carry on.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod sources;
pub mod style;

pub use sources::discover_sources;
pub use style::TitleStyle;
pub use wordmerge_core::{ExtractionResult, ProgressEvent, SourceDocument};

use wordmerge_ingest::{IngestError, PackageReader};
use wordmerge_ooxml::{Document, Paragraph, WriteError};

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("input directory not found: {}", .0.display())]
    InputDirMissing(PathBuf),
    #[error("no .{extension} files found in {}", .dir.display())]
    NoSources { dir: PathBuf, extension: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write merged document: {0}")]
    Write(#[from] WriteError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("cannot derive a title from {}", .0.display())]
    Title(PathBuf),
}

/// Anything that can turn a source path into text blocks.
pub trait TextSource {
    fn extract(&self, path: &Path) -> Result<ExtractionResult, AssemblyError>;
}

impl TextSource for PackageReader {
    fn extract(&self, path: &Path) -> Result<ExtractionResult, AssemblyError> {
        PackageReader::extract(self, path).map_err(AssemblyError::from)
    }
}

/// Outcome counters for one merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub total: usize,
    /// Sources that contributed at least one body paragraph.
    pub success: usize,
    /// Sources that contributed only their title.
    pub empty: usize,
    /// Sources left out after an error.
    pub failed: usize,
    /// Where the merged document was saved, once it has been.
    pub output: Option<PathBuf>,
}

/// A section ready to be committed to the merged document.
struct Section {
    paragraphs: Vec<Paragraph>,
    body_paragraphs: usize,
    strategy: Option<&'static str>,
}

pub struct Assembler<S> {
    source: S,
    style: TitleStyle,
}

impl<S: TextSource> Assembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            style: TitleStyle::default(),
        }
    }

    pub fn with_style(mut self, style: TitleStyle) -> Self {
        self.style = style;
        self
    }

    /// Build the merged document in memory.
    ///
    /// `on_progress` receives one `Processing` event per source, followed by
    /// exactly one of `Extracted`, `Empty`, or `Failed`. Indices are 1-based.
    pub fn assemble(
        &self,
        paths: &[PathBuf],
        mut on_progress: impl FnMut(ProgressEvent),
    ) -> (Document, MergeReport) {
        let total = paths.len();
        let mut document = Document::new();
        let mut report = MergeReport {
            total,
            ..MergeReport::default()
        };
        let mut committed = 0usize;

        for (position, path) in paths.iter().enumerate() {
            let source = SourceDocument::new(path.clone(), position);
            let index = source.ordinal();
            on_progress(ProgressEvent::Processing {
                index,
                total,
                name: source.display_name(),
            });

            let section = match self.build_section(&source) {
                Ok(section) => section,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping document");
                    report.failed += 1;
                    on_progress(ProgressEvent::Failed {
                        index,
                        total,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if committed > 0 {
                document.add_page_break();
            }
            let paragraphs = section.body_paragraphs;
            document.extend(section.paragraphs);
            committed += 1;

            if paragraphs > 0 {
                report.success += 1;
                on_progress(ProgressEvent::Extracted {
                    index,
                    total,
                    paragraphs,
                    strategy: section.strategy,
                });
            } else {
                report.empty += 1;
                on_progress(ProgressEvent::Empty { index, total });
            }
        }

        (document, report)
    }

    /// Title, spacer, and body paragraphs for one source. Nothing touches the
    /// merged document until this returns `Ok`.
    fn build_section(&self, source: &SourceDocument) -> Result<Section, AssemblyError> {
        let title = source
            .title()
            .ok_or_else(|| AssemblyError::Title(source.path.clone()))?;
        let result = self.source.extract(&source.path)?;

        let mut paragraphs = vec![self.style.paragraph(&title), Paragraph::new()];
        paragraphs.extend(result.paragraphs().map(Paragraph::with_text));
        let body_paragraphs = paragraphs.len() - 2;

        Ok(Section {
            paragraphs,
            body_paragraphs,
            strategy: result.strategy,
        })
    }

    /// Assemble `paths` and save the result to `output`.
    ///
    /// The output is written once, after every source has been processed.
    pub fn merge(
        &self,
        paths: &[PathBuf],
        output: &Path,
        on_progress: impl FnMut(ProgressEvent),
    ) -> Result<MergeReport, AssemblyError> {
        let (document, mut report) = self.assemble(paths, on_progress);
        document.save(output)?;
        report.output = Some(output.to_path_buf());

        tracing::info!(
            output = %output.display(),
            total = report.total,
            success = report.success,
            empty = report.empty,
            failed = report.failed,
            "merge complete"
        );
        Ok(report)
    }
}

/// Merge every `.{extension}` file in `input_dir` into `output` using the
/// default package reader.
pub fn merge_folder(
    input_dir: &Path,
    output: &Path,
    extension: &str,
    style: TitleStyle,
    on_progress: impl FnMut(ProgressEvent),
) -> Result<MergeReport, AssemblyError> {
    let paths = discover_sources(input_dir, extension)?;
    Assembler::new(PackageReader::default())
        .with_style(style)
        .merge(&paths, output, on_progress)
}
