//! A small, lossless splitter for HTML at one nesting level.
//!
//! It does not build a tree. It finds where each top-level element, text run, comment or stray
//! tag starts and ends, which is all the reconciler needs to tag and later find its nodes.

use crate::slot::{ContentKind, MARKER_ATTRIBUTE, Slot};
use tracing::warn;

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkKind {
    /// A complete element; `name_end` is the byte offset just past its tag name and `open_end`
    /// just past its opening tag.
    Element { name_end: usize, open_end: usize },
    Text,
    Comment,
    /// Doctype, processing instruction or an unmatched closing tag.
    Stray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk {
    pub kind: ChunkKind,
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub(crate) fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// The opening tag of an element chunk.
    pub(crate) fn open_tag<'a>(&self, source: &'a str) -> Option<&'a str> {
        match self.kind {
            ChunkKind::Element { open_end, .. } => Some(&source[self.start..open_end]),
            _ => None,
        }
    }
}

/// Splits `source` into consecutive chunks covering all of it.
pub(crate) fn split(source: &str) -> Vec<Chunk> {
    let bytes = source.as_bytes();
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let (kind, end) = if source[pos..].starts_with("<!--") {
            (ChunkKind::Comment, find_from(source, pos + 4, "-->").map_or(bytes.len(), |i| i + 3))
        } else if starts_markup(bytes, pos) && matches!(bytes[pos + 1], b'!' | b'?' | b'/') {
            (ChunkKind::Stray, tag_end(bytes, pos).unwrap_or(bytes.len()))
        } else if starts_markup(bytes, pos) {
            element(source, pos)
        } else {
            (ChunkKind::Text, next_markup(bytes, pos + 1).unwrap_or(bytes.len()))
        };
        chunks.push(Chunk { kind, start, end });
        pos = end;
    }

    chunks
}

/// Renders one planned block into individually tagged top-level nodes.
///
/// Markup is split into its top-level elements, each tagged on its own; loose text is escaped and
/// wrapped in a `span`; comments, stray tags and whitespace are dropped. An element left open is
/// closed so it cannot swallow the page after it, and one cut off inside a tag is dropped. Style
/// and script content is wrapped in a single element with any closing sequence for that element
/// neutralized.
pub(crate) fn render_block(slot: Slot, content: &str) -> Vec<String> {
    let marker = format!(" {MARKER_ATTRIBUTE}=\"{}\"", slot.marker());
    match slot.kind {
        ContentKind::Markup => split(content)
            .into_iter()
            .filter_map(|chunk| match chunk.kind {
                ChunkKind::Element { name_end, .. } => {
                    let element = chunk.text(content);
                    let Some(closers) = missing_closers(element) else {
                        warn!(slot = slot.marker(), "Dropping markup cut off inside a tag");
                        return None;
                    };
                    Some(format!(
                        "{}{marker}{}{closers}",
                        &content[chunk.start..name_end],
                        &content[name_end..chunk.end]
                    ))
                },
                ChunkKind::Text => {
                    let text = chunk.text(content).trim();
                    (!text.is_empty()).then(|| format!("<span{marker}>{}</span>", text.replace('<', "&lt;")))
                },
                ChunkKind::Comment | ChunkKind::Stray => None,
            })
            .collect(),
        ContentKind::Style => vec![format!("<style{marker}>{}</style>", neutralize(content, "style"))],
        ContentKind::Script => vec![format!("<script{marker}>{}</script>", neutralize(content, "script"))],
    }
}

/// Closing text an element needs so that it ends where it was written.
///
/// Empty for well-formed markup. `None` when a tag is cut off, since no suffix can end an
/// unterminated attribute value.
fn missing_closers(element: &str) -> Option<String> {
    let bytes = element.as_bytes();
    let mut open: Vec<String> = Vec::new();
    let mut prefix = "";
    let mut cursor = 0;

    while let Some(next) = next_markup(bytes, cursor) {
        if element[next..].starts_with("<!--") {
            match find_from(element, next + 4, "-->") {
                Some(close) => {
                    cursor = close + 3;
                    continue;
                },
                None => {
                    prefix = "-->";
                    break;
                },
            }
        }
        let end = tag_end(bytes, next)?;
        match bytes[next + 1] {
            b'/' => {
                let (name, _) = tag_name(element, next + 1);
                if let Some(at) = open.iter().rposition(|o| *o == name) {
                    open.truncate(at);
                }
                cursor = end;
            },
            b'!' | b'?' => cursor = end,
            _ => {
                let (name, _) = tag_name(element, next);
                cursor = end;
                if bytes[end - 2] == b'/' || VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    if let Some(raw_end) = raw_text_end(element, end, &name) {
                        cursor = raw_end;
                        continue;
                    }
                    open.push(name);
                    break;
                }
                open.push(name);
            },
        }
    }

    let mut closers = prefix.to_owned();
    for name in open.iter().rev() {
        closers.push_str(&format!("</{name}>"));
    }
    Some(closers)
}

/// Value of `name` in an opening tag, if present.
pub(crate) fn attribute<'a>(open_tag: &'a str, name: &str) -> Option<&'a str> {
    let bytes = open_tag.as_bytes();
    let mut pos = 1;
    while pos < bytes.len() && is_name_byte(bytes[pos]) {
        pos += 1;
    }

    loop {
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] == b'>' {
            return None;
        }

        let name_start = pos;
        while pos < bytes.len() && !matches!(bytes[pos], b'=' | b'>' | b'/') && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let attr_name = &open_tag[name_start..pos];

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let value = if pos < bytes.len() && bytes[pos] == b'=' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let (value_start, value_end, next) = match bytes.get(pos) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let close = open_tag[pos + 1..].find(quote as char).map_or(bytes.len(), |i| pos + 1 + i);
                    (pos + 1, close, (close + 1).min(bytes.len()))
                },
                _ => {
                    let mut end = pos;
                    while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>' {
                        end += 1;
                    }
                    (pos, end, end)
                },
            };
            pos = next;
            &open_tag[value_start..value_end]
        } else {
            ""
        };

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }
}

/// Lowercased tag name of an opening tag starting at `pos`, and the offset just past it.
fn tag_name(source: &str, pos: usize) -> (String, usize) {
    let bytes = source.as_bytes();
    let mut end = pos + 1;
    while end < bytes.len() && is_name_byte(bytes[end]) {
        end += 1;
    }
    (source[pos + 1..end].to_ascii_lowercase(), end)
}

fn element(source: &str, pos: usize) -> (ChunkKind, usize) {
    let bytes = source.as_bytes();
    let (name, name_end) = tag_name(source, pos);
    let Some(open_end) = tag_end(bytes, pos) else {
        return (ChunkKind::Text, bytes.len());
    };
    let kind = ChunkKind::Element { name_end, open_end };

    let self_closing = bytes[open_end - 2] == b'/';
    if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
        return (kind, open_end);
    }
    if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
        return (kind, raw_text_end(source, open_end, &name).unwrap_or(bytes.len()));
    }

    let mut depth = 1usize;
    let mut cursor = open_end;
    while let Some(next) = next_markup(bytes, cursor) {
        if source[next..].starts_with("<!--") {
            cursor = find_from(source, next + 4, "-->").map_or(bytes.len(), |i| i + 3);
            continue;
        }
        let Some(end) = tag_end(bytes, next) else { break };
        match bytes[next + 1] {
            b'/' => {
                let (closing, _) = tag_name(source, next + 1);
                if closing == name {
                    depth -= 1;
                    if depth == 0 {
                        return (kind, end);
                    }
                }
                cursor = end;
            },
            b'!' | b'?' => cursor = end,
            _ => {
                let (inner, _) = tag_name(source, next);
                let inner_self_closing = bytes[end - 2] == b'/';
                if RAW_TEXT_ELEMENTS.contains(&inner.as_str()) && !inner_self_closing {
                    cursor = raw_text_end(source, end, &inner).unwrap_or(bytes.len());
                } else {
                    if inner == name && !inner_self_closing {
                        depth += 1;
                    }
                    cursor = end;
                }
            },
        }
    }

    (kind, bytes.len())
}

/// Offset just past the closing tag of a raw text element whose content starts at `from`.
pub(crate) fn raw_text_end(source: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("</{name}");
    let start = find_ci(source, from, &needle)?;
    tag_end(source.as_bytes(), start)
}

/// Offset just past the `>` closing the tag that starts at `pos`, honoring quoted values.
pub(crate) fn tag_end(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(pos + 1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {},
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            _ => {},
        }
    }
    None
}

/// Whether a tag or comment begins at `pos` (as opposed to a literal `<` in text).
fn starts_markup(bytes: &[u8], pos: usize) -> bool {
    bytes[pos] == b'<'
        && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
}

fn next_markup(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| starts_markup(bytes, i))
}

const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn find_from(source: &str, from: usize, needle: &str) -> Option<usize> {
    source[from..].find(needle).map(|i| from + i)
}

pub(crate) fn find_ci(source: &str, from: usize, needle: &str) -> Option<usize> {
    let hay = source.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Breaks every `</name` (any case) so embedded content cannot close its own element.
fn neutralize(content: &str, name: &str) -> String {
    let needle = format!("</{name}");
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    while let Some(found) = find_ci(content, cursor, &needle) {
        out.push_str(&content[cursor..found]);
        out.push_str("<\\/");
        cursor = found + 2;
    }
    out.push_str(&content[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Region;

    fn kinds(source: &str) -> Vec<(ChunkKind, &str)> {
        split(source).into_iter().map(|c| (c.kind, c.text(source))).collect()
    }

    #[test]
    fn test_split_is_lossless() {
        let source = "<!doctype html>\n<div a=\"x>y\"><div>in</div></div> text <!-- c --><br><x-y/>";
        let joined: String = split(source).iter().map(|c| c.text(source)).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_nested_same_name_elements() {
        let source = "<div><div>a</div><p>b</p></div><span>c</span>";
        let texts: Vec<_> = kinds(source).into_iter().map(|(_, t)| t).collect();
        assert_eq!(texts, ["<div><div>a</div><p>b</p></div>", "<span>c</span>"]);
    }

    #[test]
    fn test_raw_text_hides_tags() {
        let source = "<script>if (a < b) { x = '</div>'; }</script><p>after</p>";
        let texts: Vec<_> = kinds(source).into_iter().map(|(_, t)| t).collect();
        assert_eq!(texts[0], "<script>if (a < b) { x = '</div>'; }</script>");
        assert_eq!(texts[1], "<p>after</p>");
    }

    #[test]
    fn test_literal_less_than_stays_text() {
        let chunks = kinds("a < b");
        assert_eq!(chunks, [(ChunkKind::Text, "a < b")]);
    }

    #[test]
    fn test_unterminated_element_runs_to_end() {
        let source = "<div><p>open";
        let chunks = split(source);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].end, source.len());
    }

    #[test]
    fn test_markup_elements_tagged_individually() {
        let slot = Slot::new(Region::BodyStart, ContentKind::Markup);
        let nodes = render_block(slot, "<div class=\"a\"></div>\n<!-- note -->\nhello <img src=x>");
        assert_eq!(
            nodes,
            [
                "<div data-custom-slot=\"body-html\" class=\"a\"></div>",
                "<span data-custom-slot=\"body-html\">hello</span>",
                "<img data-custom-slot=\"body-html\" src=x>",
            ]
        );
    }

    #[test]
    fn test_unterminated_markup_is_closed() {
        let slot = Slot::new(Region::BodyStart, ContentKind::Markup);
        assert_eq!(
            render_block(slot, "<div class=banner>Hello"),
            ["<div data-custom-slot=\"body-html\" class=banner>Hello</div>"]
        );
        assert_eq!(
            render_block(slot, "<div><div><p>x</div><script>let a"),
            ["<div data-custom-slot=\"body-html\"><div><p>x</div><script>let a</script></div>"]
        );
        assert_eq!(render_block(slot, "<div><!-- note"), ["<div data-custom-slot=\"body-html\"><!-- note--></div>"]);
    }

    #[test]
    fn test_markup_cut_off_inside_a_tag_is_dropped() {
        let slot = Slot::new(Region::Footer, ContentKind::Markup);
        assert_eq!(render_block(slot, "<p>ok</p><div><img src=\"x").len(), 1);
        assert_eq!(render_block(slot, "<a href=\"x"), ["<span data-custom-slot=\"footer-html\">&lt;a href=\"x</span>"]);
    }

    #[test]
    fn test_style_cannot_close_itself() {
        let slot = Slot::new(Region::Head, ContentKind::Style);
        let nodes = render_block(slot, "a{}</STYLE><script>alert(1)</script>");
        assert_eq!(nodes, ["<style data-custom-slot=\"head-css\">a{}<\\/STYLE><script>alert(1)</script></style>"]);
    }

    #[test]
    fn test_attribute_lookup() {
        let tag = "<div id=main data-custom-slot='footer-js' hidden>";
        assert_eq!(attribute(tag, "data-custom-slot"), Some("footer-js"));
        assert_eq!(attribute(tag, "id"), Some("main"));
        assert_eq!(attribute(tag, "hidden"), Some(""));
        assert_eq!(attribute(tag, "class"), None);
    }
}
