use thiserror::Error;

pub mod markup;
pub mod mht;
pub mod text_processing;
pub mod xml_parser;

pub use markup::extract_markup_text;
pub use mht::decode_quoted_printable;
pub use text_processing::{clean_html_text, decode_entities};
pub use xml_parser::read_paragraphs;
// Re-export domain types from core (canonical definitions live there)
pub use wordmerge_core::{PARAGRAPH_BREAK, TextBlock};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML ended with {0} element(s) still open")]
    UnexpectedEof(usize),
}

/// Recover text blocks from the body of a web-archive package.
///
/// Pipeline:
/// 1. Decode the quoted-printable MHT payload (raw text on failure)
/// 2. Locate the article title
/// 3. Isolate the article body region and keep its `<p>` paragraphs
/// 4. Fall back to scanning bare text nodes when almost nothing was found
pub fn extract_web_archive(mht: &str) -> Vec<TextBlock> {
    extract_markup_text(&decode_quoted_printable(mht))
}
