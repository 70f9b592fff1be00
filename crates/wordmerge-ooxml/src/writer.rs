//! Building a new `.docx` package from paragraphs and runs.

use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

use quick_xml::escape::escape;
use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use wordmerge_core::namespaces::{
    CONTENT_TYPES, DOCUMENT_PART, NAMESPACES, OFFICE_DOCUMENT_REL_TYPE, PACKAGE_RELATIONSHIPS,
    ROOT_RELS_PART, WORDPROCESSING_ML,
};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Paragraph alignment (`w:jc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }

    /// Parse a user-facing name (`left`, `center`/`centre`, `right`, `justify`/`both`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" | "both" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// 24-bit run colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Parse `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(RgbColor(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub size_pt: Option<f32>,
    pub color: Option<RgbColor>,
    pub page_break: bool,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn page_break() -> Self {
        Self {
            page_break: true,
            ..Self::default()
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn size_pt(mut self, size: f32) -> Self {
        self.size_pt = Some(size);
        self
    }

    pub fn color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:r>");
        if self.bold || self.size_pt.is_some() || self.color.is_some() {
            out.push_str("<w:rPr>");
            if self.bold {
                out.push_str("<w:b/><w:bCs/>");
            }
            if let Some(color) = self.color {
                out.push_str(&format!(r#"<w:color w:val="{}"/>"#, color.hex()));
            }
            if let Some(pt) = self.size_pt {
                // Half-points.
                let half = (pt * 2.0).round().max(1.0) as u32;
                out.push_str(&format!(r#"<w:sz w:val="{half}"/><w:szCs w:val="{half}"/>"#));
            }
            out.push_str("</w:rPr>");
        }
        if self.page_break {
            out.push_str(r#"<w:br w:type="page"/>"#);
        }

        let text = sanitize_text(&self.text);
        let mut pending = String::new();
        for c in text.chars() {
            match c {
                '\n' | '\t' => {
                    flush_text(&mut pending, out);
                    out.push_str(if c == '\n' { "<w:br/>" } else { "<w:tab/>" });
                }
                _ => pending.push(c),
            }
        }
        flush_text(&mut pending, out);
        out.push_str("</w:r>");
    }
}

fn flush_text(pending: &mut String, out: &mut String) {
    if pending.is_empty() {
        return;
    }
    out.push_str(r#"<w:t xml:space="preserve">"#);
    out.push_str(&escape(pending.as_str()));
    out.push_str("</w:t>");
    pending.clear();
}

/// Drop characters XML 1.0 cannot carry, and bare carriage returns.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|&c| match c {
            '\t' | '\n' => true,
            '\u{FFFE}' | '\u{FFFF}' => false,
            c => c >= ' ',
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Option<Alignment>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::new(text)],
            alignment: None,
        }
    }

    /// A paragraph whose only content is a page break.
    pub fn page_break() -> Self {
        Self {
            runs: vec![Run::page_break()],
            alignment: None,
        }
    }

    pub fn add_run(&mut self, run: Run) -> &mut Self {
        self.runs.push(run);
        self
    }

    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = Some(alignment);
        self
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_page_break(&self) -> bool {
        !self.runs.is_empty() && self.runs.iter().all(|r| r.page_break && r.text.is_empty())
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:p>");
        if let Some(alignment) = self.alignment {
            out.push_str(&format!(
                r#"<w:pPr><w:jc w:val="{}"/></w:pPr>"#,
                alignment.as_val()
            ));
        }
        for run in &self.runs {
            run.write_xml(out);
        }
        out.push_str("</w:p>");
    }
}

/// An in-memory WordprocessingML document: a flat list of body paragraphs.
#[derive(Debug, Clone, Default)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty paragraph and return it for filling in.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::new());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn add_text_paragraph(&mut self, text: impl Into<String>) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::with_text(text));
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn add_page_break(&mut self) {
        self.paragraphs.push(Paragraph::page_break());
    }

    pub fn extend(&mut self, paragraphs: impl IntoIterator<Item = Paragraph>) {
        self.paragraphs.extend(paragraphs);
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn page_break_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_page_break()).count()
    }

    /// The `word/document.xml` part.
    pub fn document_xml(&self) -> String {
        let mut body = String::new();
        for p in &self.paragraphs {
            p.write_xml(&mut body);
        }

        let declarations: String = NAMESPACES
            .iter()
            .map(|(prefix, uri)| format!(r#" xmlns:{prefix}="{uri}""#))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document{declarations}>
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#
        )
    }

    /// Write the complete package to `writer`.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W, WriteError> {
        let mut zip = ZipWriter::new(writer);
        let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", opt)?;
        zip.write_all(content_types_xml().as_bytes())?;

        zip.start_file(ROOT_RELS_PART, opt)?;
        zip.write_all(rels_xml().as_bytes())?;

        zip.start_file(DOCUMENT_PART, opt)?;
        zip.write_all(self.document_xml().as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", opt)?;
        zip.write_all(document_rels_xml().as_bytes())?;

        zip.start_file("word/styles.xml", opt)?;
        zip.write_all(styles_xml().as_bytes())?;

        Ok(zip.finish()?)
    }

    /// Write the package to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), WriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.write_to(file)?;
        Ok(())
    }
}

fn content_types_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="{CONTENT_TYPES}">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#
    )
}

fn rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="{OFFICE_DOCUMENT_REL_TYPE}" Target="{DOCUMENT_PART}"/>
</Relationships>"#
    )
}

fn document_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
    )
}

fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{WORDPROCESSING_ML}">
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:sz w:val="22"/>
        <w:szCs w:val="22"/>
      </w:rPr>
    </w:rPrDefault>
    <w:pPrDefault>
      <w:pPr>
        <w:spacing w:after="160" w:line="259" w:lineRule="auto"/>
      </w:pPr>
    </w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
</w:styles>"#
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::reader::Package;

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::parse("Centre"), Some(Alignment::Center));
        assert_eq!(Alignment::parse(" justify "), Some(Alignment::Justify));
        assert_eq!(Alignment::parse("middle"), None);
        assert_eq!(Alignment::Justify.as_val(), "both");
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(RgbColor::from_hex("8B5A2B"), Some(RgbColor(0x8B, 0x5A, 0x2B)));
        assert_eq!(RgbColor::from_hex("#8b5a2b").map(RgbColor::hex).as_deref(), Some("8B5A2B"));
        assert_eq!(RgbColor::from_hex("8B5A2"), None);
        assert_eq!(RgbColor::from_hex("GGGGGG"), None);
    }

    #[test]
    fn test_run_formatting_xml() {
        let mut doc = Document::new();
        doc.add_paragraph()
            .align(Alignment::Center)
            .add_run(Run::new("Title").bold(true).size_pt(16.0).color(RgbColor(0x8B, 0x5A, 0x2B)));
        let xml = doc.document_xml();
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:sz w:val="32"/>"#));
        assert!(xml.contains(r#"<w:color w:val="8B5A2B"/>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">Title</w:t>"#));
    }

    #[test]
    fn test_text_is_escaped_and_sanitized() {
        let mut doc = Document::new();
        doc.add_text_paragraph("a < b & \"c\"\u{0007}\r");
        let xml = doc.document_xml();
        assert!(xml.contains("a &lt; b &amp; &quot;c&quot;</w:t>"));
        assert!(!xml.contains('\u{0007}'));
    }

    #[test]
    fn test_newlines_and_tabs_become_elements() {
        let mut doc = Document::new();
        doc.add_text_paragraph("one\ntwo\tthree");
        let xml = doc.document_xml();
        assert!(xml.contains(concat!(
            r#"<w:t xml:space="preserve">one</w:t><w:br/>"#,
            r#"<w:t xml:space="preserve">two</w:t><w:tab/>"#,
            r#"<w:t xml:space="preserve">three</w:t>"#
        )));
    }

    #[test]
    fn test_page_breaks_counted() {
        let mut doc = Document::new();
        doc.add_text_paragraph("first");
        doc.add_page_break();
        doc.add_text_paragraph("second");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.page_break_count(), 1);
        assert!(doc.paragraphs()[1].is_page_break());
        assert!(!doc.paragraphs()[0].is_page_break());
        assert!(!Paragraph::new().is_page_break());
    }

    #[test]
    fn test_written_package_reads_back() {
        let mut doc = Document::new();
        doc.add_paragraph()
            .align(Alignment::Center)
            .add_run(Run::new("Heading").bold(true));
        doc.add_text_paragraph("body text");
        doc.add_page_break();
        doc.add_text_paragraph("中文 & more");

        let mut cursor = doc.write_to(Cursor::new(Vec::new())).unwrap();
        cursor.set_position(0);
        let mut pkg = Package::from_reader(cursor).unwrap();
        assert_eq!(pkg.main_document_part().unwrap(), "word/document.xml");
        assert_eq!(
            pkg.paragraphs().unwrap(),
            vec!["Heading", "body text", "", "中文 & more"]
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.docx");
        let mut doc = Document::new();
        doc.add_text_paragraph("saved");
        doc.save(&path).unwrap();

        let mut pkg = Package::open(&path).unwrap();
        assert_eq!(pkg.paragraphs().unwrap(), vec!["saved"]);
    }
}
