//! Text recovery from archived web pages (WeChat-style article snapshots).
//!
//! The input is a narrow, known family of pages, so layered regex heuristics
//! are used instead of a full HTML parser: title marker, then body region,
//! then `<p>` paragraphs, then a bare-text-node scan when almost nothing was
//! found. The length thresholds keep navigation and menu fragments out.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::clean_html_text;
use wordmerge_core::TextBlock;

/// Paragraphs of this many characters or fewer are dropped.
pub const MIN_PARAGRAPH_CHARS: usize = 5;
/// Fallback text nodes of this many characters or fewer (after cleaning) are dropped.
pub const MIN_FALLBACK_CHARS: usize = 10;
/// Minimum raw length of a bare text node considered by the fallback scan.
pub const MIN_TEXT_NODE_CHARS: usize = 20;

/// Title markers, tried in order.
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"activity-name[^>]*>([^<]+)",
        r"rich_media_title[^>]*>([^<]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Body region containers, tried in order.
static BODY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Up to the next <div> bearing an id.
        r#"(?s)id=["']js_content["'][^>]*>(.*?)<div[^>]*id="#,
        // To the end of the document.
        r#"(?s)id=["']js_article_content["'][^>]*>(.*)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<p[^>]*>(.*?)</p>").unwrap());

static TEXT_NODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r">([^<>]{{{},}})<", MIN_TEXT_NODE_CHARS)).unwrap()
});

/// Extract ordered text blocks from a decoded HTML document.
///
/// A recovered title comes first, followed by the body paragraphs. When that
/// yields at most one block, bare text nodes from the whole document are
/// appended instead. Never fails; an unrecognised page gives an empty `Vec`.
pub fn extract_markup_text(html: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();

    if let Some(title) = find_title(html) {
        blocks.push(title);
    }

    if let Some(body) = find_body_region(html) {
        blocks.extend(extract_paragraphs(body));
    }

    if blocks.len() <= 1 {
        for text in scan_text_nodes(html) {
            if !blocks.contains(&text) {
                blocks.push(text);
            }
        }
    }

    blocks
}

/// First non-empty cleaned title among [`TITLE_PATTERNS`].
pub fn find_title(html: &str) -> Option<String> {
    TITLE_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(html)?;
        let title = clean_html_text(&caps[1]);
        (!title.is_empty()).then_some(title)
    })
}

/// First non-empty body region among [`BODY_PATTERNS`].
pub fn find_body_region(html: &str) -> Option<&str> {
    BODY_PATTERNS.iter().find_map(|re| {
        let region = re.captures(html)?.get(1)?.as_str();
        (!region.is_empty()).then_some(region)
    })
}

/// Cleaned `<p>` contents of `region`, longer than [`MIN_PARAGRAPH_CHARS`].
pub fn extract_paragraphs(region: &str) -> Vec<TextBlock> {
    PARAGRAPH_RE
        .captures_iter(region)
        .map(|caps| clean_html_text(&caps[1]))
        .filter(|text| char_len(text) > MIN_PARAGRAPH_CHARS)
        .collect()
}

/// Cleaned bare text nodes, longer than [`MIN_FALLBACK_CHARS`], in document order.
///
/// Duplicates are not removed here; the caller compares against everything
/// collected so far.
pub fn scan_text_nodes(html: &str) -> Vec<TextBlock> {
    TEXT_NODE_RE
        .captures_iter(html)
        .map(|caps| clean_html_text(&caps[1]))
        .filter(|text| char_len(text) > MIN_FALLBACK_CHARS)
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_only_page() {
        let html = r#"<html><h1 id="activity-name">My Title</h1></html>"#;
        assert_eq!(extract_markup_text(html), vec!["My Title"]);
    }

    #[test]
    fn test_title_marker_with_attribute_value() {
        let html = r#"<h2 class="rich" activity-name="x">My Title<span></span></h2>"#;
        assert_eq!(find_title(html).as_deref(), Some("My Title"));
    }

    #[test]
    fn test_title_falls_back_to_rich_media_title() {
        let html = "<h1 class=\"rich_media_title\">\n   Second   Marker\n</h1>";
        assert_eq!(find_title(html).as_deref(), Some("Second Marker"));
    }

    #[test]
    fn test_blank_activity_name_uses_rich_media_title() {
        let html = "<span id=\"activity-name\"> &nbsp; </span><h1 class=\"rich_media_title\">Real</h1>";
        assert_eq!(find_title(html).as_deref(), Some("Real"));
    }

    #[test]
    fn test_body_paragraphs_short_ones_dropped() {
        let html = r#"<div id="js_content"><p>AAAAAAAAAA</p><p>hi</p><div id="other"></div>"#;
        assert_eq!(extract_markup_text(html), vec!["AAAAAAAAAA"]);
    }

    #[test]
    fn test_title_then_paragraphs_in_order() {
        let html = concat!(
            r#"<h1 id="activity-name">Weekly Notes</h1>"#,
            "<div id='js_content' style=\"visibility: hidden;\">\n",
            "<p style=\"margin:0\"><span>First <b>para</b>graph</span></p>\n",
            "<p>12345</p>\n",
            "<p>Second paragraph here</p>\n",
            r#"<div class="qr" id="js_pc_qr_code"><p>outside the body region</p></div>"#,
        );
        assert_eq!(
            extract_markup_text(html),
            vec!["Weekly Notes", "First para graph", "Second paragraph here"]
        );
    }

    #[test]
    fn test_body_region_stops_at_first_div_with_id() {
        let html = r#"<div id="js_content"><p>kept paragraph</p><div id="a"><p>dropped paragraph</p><div id="b">"#;
        assert_eq!(find_body_region(html), Some("<p>kept paragraph</p>"));
    }

    #[test]
    fn test_article_content_runs_to_end() {
        let html = "<div id=\"js_article_content\"><p>tail paragraph one</p>\n<p>tail paragraph two</p>";
        assert_eq!(
            extract_markup_text(html),
            vec!["tail paragraph one", "tail paragraph two"]
        );
    }

    #[test]
    fn test_empty_js_content_uses_article_content() {
        let html = r#"<div id="js_article_content"><div id="js_content"><div id="x"><p>from the outer container</p>"#;
        assert_eq!(
            extract_markup_text(html),
            vec!["from the outer container"]
        );
    }

    #[test]
    fn test_fallback_scan_recovers_text_nodes() {
        let html = "<div><span>This is a long enough text node</span><i>short text</i></div>";
        assert_eq!(
            extract_markup_text(html),
            vec!["This is a long enough text node"]
        );
    }

    #[test]
    fn test_fallback_skips_duplicates_and_short_results() {
        let html = concat!(
            "<a>This is a long enough text node</a>",
            "<b>This is a long enough text node</b>",
            // 20+ raw chars, but only 10 after cleaning
            "<c>          0123456789          </c>",
            "<d>Another sufficiently long node</d>",
        );
        assert_eq!(
            extract_markup_text(html),
            vec![
                "This is a long enough text node",
                "Another sufficiently long node"
            ]
        );
    }

    #[test]
    fn test_fallback_skips_node_equal_to_title() {
        let html = r#"<h1 id="activity-name">A title that is long enough</h1><p>x</p>"#;
        assert_eq!(
            extract_markup_text(html),
            vec!["A title that is long enough"]
        );
    }

    #[test]
    fn test_fallback_keeps_near_duplicates() {
        let html = "<a>Repeated heading text here</a><b>Repeated heading text here.</b>";
        assert_eq!(extract_markup_text(html).len(), 2);
    }

    #[test]
    fn test_fallback_not_used_when_body_found() {
        let html = concat!(
            r#"<h1 id="activity-name">Title</h1>"#,
            r#"<div id="js_content"><p>a real paragraph</p><div id="end"></div>"#,
            "<footer>This footer text node is long</footer>",
        );
        assert_eq!(
            extract_markup_text(html),
            vec!["Title", "a real paragraph"]
        );
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // Six CJK characters: 18 bytes but only 6 chars, so > 5 is kept.
        let html = r#"<div id="js_content"><p>一二三四五六</p><p>一二三四五</p><div id="e">"#;
        assert_eq!(extract_markup_text(html), vec!["一二三四五六"]);
    }

    #[test]
    fn test_unrecognised_page_is_empty() {
        assert!(extract_markup_text("<html><body><p>tiny</p></body></html>").is_empty());
        assert!(extract_markup_text("").is_empty());
    }
}
