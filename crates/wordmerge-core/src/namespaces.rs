//! Fixed OOXML namespace URIs and part names shared by the readers and the writer.

/// WordprocessingML main namespace (`w:` prefix).
pub const WORDPROCESSING_ML: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office document relationships namespace (`r:` prefix).
pub const OFFICE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Package relationships namespace used by `.rels` parts.
pub const PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
/// Content types namespace used by `[Content_Types].xml`.
pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// Relationship type pointing from the package root to the main document part.
pub const OFFICE_DOCUMENT_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Prefix → URI table, in the order the prefixes are declared on written documents.
pub static NAMESPACES: &[(&str, &str)] = &[
    ("w", WORDPROCESSING_ML),
    ("r", OFFICE_RELATIONSHIPS),
];

/// Root relationships part of every package.
pub const ROOT_RELS_PART: &str = "_rels/.rels";
/// Conventional location of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Embedded MHT snapshot written by "save page as Word" tooling.
pub const AFCHUNK_PART: &str = "word/afchunk.mht";
