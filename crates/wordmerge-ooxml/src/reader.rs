use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::NsReader;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use zip::ZipArchive;
use zip::result::ZipError;

use wordmerge_core::namespaces::{OFFICE_DOCUMENT_REL_TYPE, ROOT_RELS_PART, WORDPROCESSING_ML};
use wordmerge_core::{BackendError, PackageBackend, TextBlock};

/// Elements whose text is not part of the surrounding paragraph's run text
/// (drawings, legacy pictures, embedded objects, text boxes).
const OPAQUE_ELEMENTS: &[&[u8]] = &[
    b"drawing",
    b"pict",
    b"object",
    b"txbxContent",
    b"AlternateContent",
];

fn is_opaque(name: &[u8]) -> bool {
    OPAQUE_ELEMENTS.iter().any(|&e| e == name)
}

/// An opened `.docx` package.
pub struct Package<R> {
    archive: ZipArchive<R>,
}

impl Package<File> {
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> Package<R> {
    pub fn from_reader(reader: R) -> Result<Self, BackendError> {
        let archive =
            ZipArchive::new(reader).map_err(|e| BackendError::OpenError(e.to_string()))?;
        Ok(Self { archive })
    }

    /// Whether an entry named exactly `name` exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Raw bytes of the part stored under `name`.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>, BackendError> {
        let mut file = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => BackendError::MissingPart(name.to_string()),
            other => BackendError::OpenError(other.to_string()),
        })?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Part name of the main document, resolved through the root relationships.
    pub fn main_document_part(&mut self) -> Result<String, BackendError> {
        let rels = self.read_part(ROOT_RELS_PART)?;
        find_office_document_target(&rels)?
            .ok_or_else(|| BackendError::MissingPart(format!("{ROOT_RELS_PART} officeDocument")))
    }

    /// Text of every top-level body paragraph, untrimmed, empty ones included.
    pub fn paragraphs(&mut self) -> Result<Vec<String>, BackendError> {
        let part = self.main_document_part()?;
        let xml = self.read_part(&part)?;
        body_paragraph_texts(&xml)
    }
}

/// Reads a package through its relationships and returns the trimmed text of
/// its non-empty body paragraphs, as stored. No cleaning is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct OoxmlBackend;

impl OoxmlBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PackageBackend for OoxmlBackend {
    fn name(&self) -> &'static str {
        "package"
    }

    fn extract_blocks(&self, path: &Path) -> Result<Vec<TextBlock>, BackendError> {
        let mut package = Package::open(path)?;
        Ok(package
            .paragraphs()?
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect())
    }
}

fn find_office_document_target(rels: &[u8]) -> Result<Option<String>, BackendError> {
    let mut reader = Reader::from_reader(rels);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let rel_type = attr_value(e, b"Type");
                if rel_type.as_deref() == Some(OFFICE_DOCUMENT_REL_TYPE) {
                    return Ok(attr_value(e, b"Target")
                        .map(|t| t.trim_start_matches('/').to_string()));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(BackendError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Paragraph texts of a main document part, for paragraphs that are direct
/// children of `w:body`.
///
/// Run text is `w:t` content; `w:tab`/`w:ptab` become `\t`, line breaks
/// become `\n` (page and column breaks add nothing), and `w:noBreakHyphen`
/// becomes `-`. Text inside drawings,
/// embedded objects, and text boxes is skipped.
pub fn body_paragraph_texts(xml: &[u8]) -> Result<Vec<String>, BackendError> {
    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut paragraphs = Vec::new();

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    // Depth and text of the top-level paragraph being read.
    let mut current: Option<(usize, String)> = None;
    let mut opaque_depth = 0usize;
    let mut in_text = false;

    loop {
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| BackendError::Xml(e.to_string()))?;
        let in_w = matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == WORDPROCESSING_ML.as_bytes());

        match event {
            Event::Start(ref e) => {
                depth += 1;
                let local = e.local_name();
                let name = local.as_ref();
                if current.is_some() && is_opaque(name) {
                    opaque_depth += 1;
                } else if in_w && name == b"body" && body_depth.is_none() {
                    body_depth = Some(depth);
                } else if in_w
                    && name == b"p"
                    && current.is_none()
                    && body_depth.is_some_and(|b| depth == b + 1)
                {
                    current = Some((depth, String::new()));
                } else if in_w && name == b"t" && opaque_depth == 0 {
                    in_text = current.is_some();
                }
            }

            Event::Empty(ref e) => {
                let local = e.local_name();
                let name = local.as_ref();
                if in_w
                    && name == b"p"
                    && current.is_none()
                    && body_depth.is_some_and(|b| depth == b)
                {
                    paragraphs.push(String::new());
                } else if in_w && opaque_depth == 0 {
                    if let Some((_, text)) = current.as_mut() {
                        match name {
                            b"tab" | b"ptab" => text.push('\t'),
                            b"br" if attr_value(e, b"type").is_some_and(|t| t != "textWrapping") => {}
                            b"br" | b"cr" => text.push('\n'),
                            b"noBreakHyphen" => text.push('-'),
                            _ => {}
                        }
                    }
                }
            }

            Event::End(ref e) => {
                let local = e.local_name();
                let name = local.as_ref();
                if opaque_depth > 0 && is_opaque(name) {
                    opaque_depth -= 1;
                } else if in_w && name == b"t" {
                    in_text = false;
                } else if in_w && name == b"p" && current.as_ref().is_some_and(|(d, _)| *d == depth)
                {
                    if let Some((_, text)) = current.take() {
                        paragraphs.push(text);
                    }
                } else if in_w && name == b"body" && body_depth == Some(depth) {
                    body_depth = None;
                }
                depth = depth.saturating_sub(1);
            }

            Event::Text(ref e) if in_text && opaque_depth == 0 => {
                let text = e.unescape().map_err(|e| BackendError::Xml(e.to_string()))?;
                if let Some((_, buf_text)) = current.as_mut() {
                    buf_text.push_str(&text);
                }
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs)
}
