use std::path::Path;

use wordmerge_core::namespaces::{AFCHUNK_PART, DOCUMENT_PART};
use wordmerge_core::{BackendError, ExtractionResult, PackageBackend, TextBlock};
use wordmerge_ooxml::Package;
use wordmerge_parsing::{extract_web_archive, read_paragraphs};

/// Strategy label for text recovered from an embedded MHT snapshot.
pub const WEB_ARCHIVE: &str = "web-archive";
/// Strategy label for text read straight from `word/document.xml`.
pub const DOCUMENT_XML: &str = "document-xml";

/// Treats the package as a plain zip archive and looks for known payloads by
/// entry name, without going through the package relationships.
///
/// `word/afchunk.mht` wins over `word/document.xml` when both exist; a
/// package with neither gives an empty result.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveBackend;

impl ArchiveBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PackageBackend for ArchiveBackend {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn extract_blocks(&self, path: &Path) -> Result<Vec<TextBlock>, BackendError> {
        self.extract(path).map(|r| r.blocks)
    }

    fn extract(&self, path: &Path) -> Result<ExtractionResult, BackendError> {
        let mut package = Package::open(path)?;

        if package.has_part(AFCHUNK_PART) {
            let raw = package.read_part(AFCHUNK_PART)?;
            let mht = String::from_utf8_lossy(&raw);
            let blocks = extract_web_archive(&mht);
            tracing::debug!(path = %path.display(), blocks = blocks.len(), "read web-archive payload");
            return Ok(ExtractionResult::new(blocks, WEB_ARCHIVE));
        }

        if package.has_part(DOCUMENT_PART) {
            let xml = package.read_part(DOCUMENT_PART)?;
            return match read_paragraphs(&xml) {
                Ok(blocks) => Ok(ExtractionResult::new(blocks, DOCUMENT_XML)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "malformed document XML");
                    Ok(ExtractionResult::empty())
                }
            };
        }

        tracing::debug!(path = %path.display(), "archive has no known text payload");
        Ok(ExtractionResult::empty())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn write_zip(path: &Path, parts: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, content) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn document_xml(body: &str) -> String {
        format!(r#"<w:document xmlns:w="{W}"><w:body>{body}</w:body></w:document>"#)
    }

    #[test]
    fn test_afchunk_preferred_over_document_xml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.docx");
        let mht = "<h1 id=3D\"activity-name\">Clipped</h1>\n<div id=3D\"js_content\"><p>Clipped article body</p><div id=3D\"tail\">";
        let xml = document_xml(r#"<w:p><w:r><w:t>from xml</w:t></w:r></w:p>"#);
        write_zip(&path, &[(AFCHUNK_PART, mht), (DOCUMENT_PART, &xml)]);

        let result = ArchiveBackend::new().extract(&path).unwrap();
        assert_eq!(result.strategy, Some(WEB_ARCHIVE));
        assert_eq!(result.blocks, vec!["Clipped", "Clipped article body"]);
    }

    #[test]
    fn test_document_xml_without_relationships() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.docx");
        let xml = document_xml(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>World</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
        ));
        write_zip(&path, &[(DOCUMENT_PART, &xml)]);

        let result = ArchiveBackend::new().extract(&path).unwrap();
        assert_eq!(result.strategy, Some(DOCUMENT_XML));
        assert_eq!(result.blocks, vec!["Hello World"]);
    }

    #[test]
    fn test_malformed_xml_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        let xml = format!(r#"<w:document xmlns:w="{W}"><w:body><w:p><w:t>cut"#);
        write_zip(&path, &[(DOCUMENT_PART, &xml)]);

        let result = ArchiveBackend::new().extract(&path).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_known_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.docx");
        write_zip(&path, &[("readme.txt", "nothing here")]);

        assert!(ArchiveBackend::new().extract(&path).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, "definitely not a zip").unwrap();

        assert!(matches!(
            ArchiveBackend::new().extract(&path),
            Err(BackendError::OpenError(_))
        ));
    }
}
