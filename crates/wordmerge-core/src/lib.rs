use std::path::{Path, PathBuf};

pub mod backend;
pub mod config_file;
pub mod namespaces;

pub use backend::{BackendError, PackageBackend};

/// Separator between paragraphs packed into a single text block.
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// One cleaned paragraph or heading. Carries no formatting.
pub type TextBlock = String;

/// A `.docx` file taking part in a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// 0-based position in the merge sequence.
    pub position: usize,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, position: usize) -> Self {
        Self {
            path: path.into(),
            position,
        }
    }

    /// Base name with the extension stripped, e.g. `notes/week 1.docx` → `week 1`.
    pub fn title(&self) -> Option<String> {
        title_for_path(&self.path)
    }

    /// 1-based position, as shown in progress output.
    pub fn ordinal(&self) -> usize {
        self.position + 1
    }

    /// Full file name for display, falling back to the whole path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Base name of `path` without its extension.
pub fn title_for_path(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
}

/// Ordered text blocks recovered from one source document.
///
/// An empty result signals "no content recovered", not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub blocks: Vec<TextBlock>,
    /// Name of the backend that produced the blocks, if any did.
    pub strategy: Option<&'static str>,
}

impl ExtractionResult {
    pub fn new(blocks: Vec<TextBlock>, strategy: &'static str) -> Self {
        Self {
            blocks,
            strategy: Some(strategy),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Body paragraphs to insert into the merged document.
    ///
    /// Each block is split on [`PARAGRAPH_BREAK`]; pieces are trimmed and
    /// blank pieces dropped.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .flat_map(|b| b.split(PARAGRAPH_BREAK))
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Progress reported by the assembler while it walks the input list.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// About to process a document.
    Processing {
        index: usize,
        total: usize,
        name: String,
    },
    /// Body paragraphs were inserted for the document.
    Extracted {
        index: usize,
        total: usize,
        paragraphs: usize,
        strategy: Option<&'static str>,
    },
    /// No content recovered; only the title was inserted.
    Empty { index: usize, total: usize },
    /// The document was skipped after an error.
    Failed {
        index: usize,
        total: usize,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_strips_only_last_extension() {
        let doc = SourceDocument::new("/tmp/in/report.v2.docx", 0);
        assert_eq!(doc.title().as_deref(), Some("report.v2"));
        assert_eq!(doc.display_name(), "report.v2.docx");
        assert_eq!(doc.ordinal(), 1);
    }

    #[test]
    fn title_keeps_unicode_names() {
        assert_eq!(
            title_for_path(Path::new("文章 一.docx")).as_deref(),
            Some("文章 一")
        );
    }

    #[test]
    fn paragraphs_split_trim_and_skip_blank() {
        let result = ExtractionResult::new(
            vec![
                "  first  ".to_string(),
                "second\n\nthird".to_string(),
                "   ".to_string(),
            ],
            "test",
        );
        let paras: Vec<&str> = result.paragraphs().collect();
        assert_eq!(paras, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_result_has_no_strategy() {
        let result = ExtractionResult::empty();
        assert!(result.is_empty());
        assert!(result.strategy.is_none());
        assert_eq!(result.paragraphs().count(), 0);
    }
}
