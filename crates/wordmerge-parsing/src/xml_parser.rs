//! Paragraph text from a WordprocessingML body part (`word/document.xml`).
//!
//! Uses SAX-style event processing with namespace resolution so that any
//! prefix bound to the WordprocessingML namespace is recognised, not just `w:`.

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};

use crate::ParsingError;
use wordmerge_core::TextBlock;
use wordmerge_core::namespaces::WORDPROCESSING_ML;

fn is_wordprocessing(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WORDPROCESSING_ML.as_bytes())
}

/// Read one text block per `w:p` element.
///
/// A block is the concatenation, with no separator, of every `w:t` nested
/// anywhere inside the paragraph. Paragraphs are listed in the order their
/// opening tags appear; a paragraph nested in another (e.g. inside a text
/// box) contributes to both. Paragraphs without run text are omitted.
pub fn read_paragraphs(xml: &[u8]) -> Result<Vec<TextBlock>, ParsingError> {
    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);

    // One slot per paragraph seen so far; `None` until run text arrives.
    let mut slots: Vec<Option<String>> = Vec::new();
    // Slot indices of the paragraphs currently open, outermost first.
    let mut open: Vec<usize> = Vec::new();
    let mut text_depth = 0usize;
    let mut depth = 0usize;

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        let in_w = is_wordprocessing(&ns);

        match event {
            Event::Start(ref e) => {
                depth += 1;
                if in_w {
                    match e.local_name().as_ref() {
                        b"p" => {
                            open.push(slots.len());
                            slots.push(None);
                        }
                        b"t" => text_depth += 1,
                        _ => {}
                    }
                }
            }

            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if in_w {
                    match e.local_name().as_ref() {
                        b"p" => {
                            open.pop();
                        }
                        b"t" => text_depth = text_depth.saturating_sub(1),
                        _ => {}
                    }
                }
            }

            Event::Text(ref e) if text_depth > 0 && !open.is_empty() => {
                let text = e.unescape()?;
                append_run_text(&mut slots, &open, &text);
            }

            Event::CData(ref e) if text_depth > 0 && !open.is_empty() => {
                let text = String::from_utf8_lossy(e.as_ref());
                append_run_text(&mut slots, &open, &text);
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if depth != 0 {
        return Err(ParsingError::UnexpectedEof(depth));
    }

    Ok(slots.into_iter().flatten().collect())
}

fn append_run_text(slots: &mut [Option<String>], open: &[usize], text: &str) {
    if text.is_empty() {
        return;
    }
    for &idx in open {
        slots[idx].get_or_insert_with(String::new).push_str(text);
    }
}
