//! Visible-text extraction from content markup.
//!
//! Content blocks arrive as HTML fragments. Speech needs the text a reader
//! would see: tags dropped, entities decoded, whitespace collapsed.

/// Tags whose boundaries separate words when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Longest entity name considered, in bytes, excluding `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Tags whose bodies are never rendered as text.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "template"];

/// Extract the visible text of an HTML fragment.
///
/// Tags are stripped, the common named and numeric entities decoded, and runs
/// of whitespace collapsed to a single space. Block-level tags separate words,
/// so `<p>one</p><p>two</p>` reads as `"one two"`.
pub fn extract_text(html: &str) -> String {
    let mut raw = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        decode_entities_into(&rest[..lt], &mut raw);
        let tail = &rest[lt..];

        match scan_tag(tail) {
            Some(tag) => {
                if tag.is_block() {
                    raw.push(' ');
                }
                rest = &tail[tag.len..];
                if !tag.closing && RAW_TEXT_TAGS.contains(&tag.name.as_str()) {
                    rest = skip_raw_text(rest, &tag.name);
                }
            }
            None => {
                raw.push('<');
                rest = &tail[1..];
            }
        }
    }
    decode_entities_into(rest, &mut raw);

    collapse_whitespace(&raw)
}

/// Whether the fragment contains anything worth reading aloud.
pub fn has_readable_text(html: &str) -> bool {
    !extract_text(html).is_empty()
}

#[derive(Debug, PartialEq, Eq)]
struct Tag {
    name: String,
    closing: bool,
    /// Byte length of the whole tag including `<` and `>`.
    len: usize,
}

impl Tag {
    fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.name.as_str())
    }
}

/// Scan a tag, comment or declaration at the start of `s` (which begins with `<`).
///
/// Returns `None` when the `<` does not open markup and must be kept as text.
fn scan_tag(s: &str) -> Option<Tag> {
    if let Some(body) = s.strip_prefix("<!--") {
        let len = body.find("-->").map_or(s.len(), |end| 4 + end + 3);
        return Some(Tag {
            name: String::new(),
            closing: true,
            len,
        });
    }

    let after = &s[1..];
    let (closing, name_start) = match after.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, after),
    };

    let first = name_start.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '!' || first == '?') {
        return None;
    }

    let end = find_tag_end(s)?;
    let name: String = name_start
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    Some(Tag {
        name,
        closing,
        len: end + 1,
    })
}

/// Index of the `>` closing the tag at the start of `s`, skipping quoted attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in s.char_indices().skip(1) {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '>' => return Some(idx),
            None => {}
        }
    }
    None
}

/// Skip the body of a raw-text element up to and including its closing tag.
fn skip_raw_text<'a>(s: &'a str, name: &str) -> &'a str {
    let lower = s.to_ascii_lowercase();
    let needle = format!("</{name}");
    match lower.find(&needle) {
        Some(start) => {
            let closing = &s[start..];
            match find_tag_end(closing) {
                Some(end) => &closing[end + 1..],
                None => "",
            }
        }
        None => "",
    }
}

fn decode_entities_into(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail[1..]
            .find(';')
            .filter(|&semi| semi <= MAX_ENTITY_LEN)
            .and_then(|semi| decode_entity(&tail[1..=semi]).map(|ch| (ch, semi + 2)));

        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201c}'),
        "rdquo" => Some('\u{201d}'),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
