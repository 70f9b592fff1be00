use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Longest entity name (between `&` and `;`) worth looking up.
const MAX_ENTITY_LEN: usize = 32;

/// Longest name in [`LEGACY_ENTITIES`].
const MAX_LEGACY_LEN: usize = 6;

/// Entities HTML5 also recognises without a trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr",
    "micro", "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm",
    "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy",
    "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 readings of numeric references in `0x80..=0x9F`.
const C1_REPLACEMENTS: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{8D}', '\u{017D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{9D}', '\u{017E}', '\u{0178}',
];

/// Turn an HTML fragment into normalized plain text.
///
/// Tags become a single space, entities are decoded, whitespace runs collapse
/// to one space, and the result is trimmed. The pass is repeated until the
/// text stops changing, so `&lt;b&gt;` does not survive as a literal tag and
/// `clean_html_text(clean_html_text(x)) == clean_html_text(x)`.
pub fn clean_html_text(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    let decoded = decode_entities(&stripped);
    WS_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Decode HTML character references the way an HTML5 parser does.
///
/// - Named entities (`&amp;`), plus the legacy names that may omit the
///   semicolon (`&nbsp`, `&copy2024` → `©2024`), longest match first.
/// - Decimal and hex numeric references, semicolon optional. `&#0;`,
///   surrogates, and values past U+10FFFF become U+FFFD; `0x80..=0x9F` are
///   read as Windows-1252; other control characters and noncharacters are
///   dropped.
///
/// Anything else is left untouched.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match resolve_reference(after) {
            Some((consumed, resolved)) => {
                out.push_str(&resolved);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve the reference at the start of `after` (the text following `&`).
/// Returns the number of bytes consumed and the replacement.
fn resolve_reference(after: &str) -> Option<(usize, String)> {
    if let Some(num) = after.strip_prefix('#') {
        return resolve_numeric(num).map(|(len, text)| (len + 1, text));
    }

    let run = after
        .find(|c: char| matches!(c, '\t' | '\n' | '\x0C' | ' ' | '<' | '&' | '#' | ';'))
        .unwrap_or(after.len());
    let name_end = after
        .char_indices()
        .nth(MAX_ENTITY_LEN)
        .map_or(run, |(idx, _)| idx.min(run));
    if name_end == 0 {
        return None;
    }
    let name = &after[..name_end];

    if after[name_end..].starts_with(';') {
        if let Some(value) = quick_xml::escape::resolve_html5_entity(name) {
            return Some((name_end + 1, value.to_string()));
        }
    }

    (1..=name.len().min(MAX_LEGACY_LEN))
        .rev()
        .filter(|&len| name.is_char_boundary(len))
        .map(|len| &name[..len])
        .find(|prefix| LEGACY_ENTITIES.iter().any(|&e| e == *prefix))
        .and_then(|prefix| {
            quick_xml::escape::resolve_html5_entity(prefix)
                .map(|value| (prefix.len(), value.to_string()))
        })
}

fn resolve_numeric(num: &str) -> Option<(usize, String)> {
    let (prefix_len, radix) = if num.starts_with(['x', 'X']) {
        (1, 16)
    } else {
        (0, 10)
    };
    let body = &num[prefix_len..];
    let digits = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    if digits == 0 {
        return None;
    }

    let mut consumed = prefix_len + digits;
    if body[digits..].starts_with(';') {
        consumed += 1;
    }
    // Too many digits for a u32 is out of range either way.
    let code = u32::from_str_radix(&body[..digits], radix).unwrap_or(u32::MAX);
    Some((consumed, numeric_char(code)))
}

fn numeric_char(code: u32) -> String {
    match code {
        0 => '\u{FFFD}'.to_string(),
        0x0D => '\r'.to_string(),
        0x80..=0x9F => C1_REPLACEMENTS[(code - 0x80) as usize].to_string(),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => String::new(),
        c if c <= 0x10FFFF && (c & 0xFFFE) == 0xFFFE => String::new(),
        c => char::from_u32(c).unwrap_or('\u{FFFD}').to_string(),
    }
}
