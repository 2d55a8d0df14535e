//! The sink the reconciler writes into, and an HTML shell document implementing it.

use crate::fragment::{self, ChunkKind};
use crate::slot::{MARKER_ATTRIBUTE, Region, Slot};
use std::fmt;

/// A rendered, marker-tagged node built from administrator supplied content.
///
/// Only the reconciler creates these for insertion; documents also produce them when they find
/// an existing tagged node while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedNode {
    slot: Slot,
    html: String,
}

impl TaggedNode {
    pub(crate) const fn new(slot: Slot, html: String) -> Self {
        Self { slot, html }
    }

    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Capability to place untrusted markup, style and script into a live document.
///
/// Everything that ends up rendering administrator supplied content goes through this trait, so
/// the trust boundary is visible wherever a sink is handed out.
pub trait UntrustedMarkupSink {
    /// Removes every node tagged for `slot` and returns how many were removed.
    fn remove_tagged(&mut self, slot: Slot) -> usize;

    /// Inserts a node into the region of its slot, after nodes previously inserted there.
    fn insert_tagged(&mut self, node: TaggedNode);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Raw(String),
    Tagged(TaggedNode),
}

impl Node {
    fn tagged(&self) -> Option<&TaggedNode> {
        match self {
            Self::Tagged(node) => Some(node),
            Self::Raw(_) => None,
        }
    }
}

/// An HTML page split into the parts the reconciler touches.
///
/// Content outside the `<head>` and `<body>` children is kept verbatim, and parsing then rendering
/// an unmodified document reproduces the input exactly. A page without `<head>` gets one when
/// head content is inserted; a page without `<body>` treats everything after the head as body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    prologue: String,
    head: Vec<Node>,
    synthetic_head: bool,
    interlude: String,
    body: Vec<Node>,
    epilogue: String,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let head = find_open_tag(source, "head", 0).and_then(|(_, open_end)| {
            find_close_tag(source, "head", open_end).map(|close| (open_end, close))
        });

        let (prologue, head_inner, synthetic_head, cursor) = match head {
            Some((open_end, close)) => (&source[..open_end], &source[open_end..close], false, close),
            None => {
                let at = find_open_tag(source, "body", 0).map_or(0, |(start, _)| start);
                (&source[..at], "", true, at)
            },
        };

        let body = find_open_tag(source, "body", cursor).and_then(|(_, open_end)| {
            rfind_close_tag(source, "body").filter(|close| *close >= open_end).map(|close| (open_end, close))
        });

        let (interlude, body_inner, epilogue) = match body {
            Some((open_end, close)) => (&source[cursor..open_end], &source[open_end..close], &source[close..]),
            None => {
                let body_start = if synthetic_head {
                    cursor
                } else {
                    fragment::tag_end(source.as_bytes(), cursor).unwrap_or(source.len())
                };
                let body_end =
                    rfind_close_tag(source, "html").filter(|end| *end >= body_start).unwrap_or(source.len());
                (&source[cursor..body_start], &source[body_start..body_end], &source[body_end..])
            },
        };

        Self {
            prologue: prologue.to_owned(),
            head: parse_nodes(head_inner),
            synthetic_head,
            interlude: interlude.to_owned(),
            body: parse_nodes(body_inner),
            epilogue: epilogue.to_owned(),
        }
    }

    /// Tagged nodes currently in `region`, in document order.
    #[must_use]
    pub fn tagged(&self, region: Region) -> Vec<&TaggedNode> {
        let nodes = if region == Region::Head { &self.head } else { &self.body };
        nodes.iter().filter_map(Node::tagged).filter(|node| node.slot.region == region).collect()
    }

    /// Every tagged node in the document, in document order.
    pub fn all_tagged(&self) -> impl Iterator<Item = &TaggedNode> {
        self.head.iter().chain(&self.body).filter_map(Node::tagged)
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl UntrustedMarkupSink for HtmlDocument {
    fn remove_tagged(&mut self, slot: Slot) -> usize {
        let before = self.head.len() + self.body.len();
        let keep = |node: &Node| node.tagged().is_none_or(|tagged| tagged.slot != slot);
        self.head.retain(keep);
        self.body.retain(keep);
        before - self.head.len() - self.body.len()
    }

    fn insert_tagged(&mut self, node: TaggedNode) {
        match node.slot.region {
            Region::Head => self.head.push(Node::Tagged(node)),
            Region::BodyStart => {
                let at = self
                    .body
                    .iter()
                    .take_while(|n| n.tagged().is_some_and(|t| t.slot.region == Region::BodyStart))
                    .count();
                self.body.insert(at, Node::Tagged(node));
            },
            Region::Footer => self.body.push(Node::Tagged(node)),
        }
    }
}

impl fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_nodes = |f: &mut fmt::Formatter<'_>, nodes: &[Node]| {
            nodes.iter().try_for_each(|node| match node {
                Node::Raw(raw) => f.write_str(raw),
                Node::Tagged(tagged) => f.write_str(&tagged.html),
            })
        };

        f.write_str(&self.prologue)?;
        if self.synthetic_head {
            if !self.head.is_empty() {
                f.write_str("<head>")?;
                write_nodes(f, &self.head)?;
                f.write_str("</head>")?;
            }
        } else {
            write_nodes(f, &self.head)?;
        }
        f.write_str(&self.interlude)?;
        write_nodes(f, &self.body)?;
        f.write_str(&self.epilogue)
    }
}

fn parse_nodes(source: &str) -> Vec<Node> {
    fragment::split(source)
        .into_iter()
        .map(|chunk| {
            let slot = matches!(chunk.kind, ChunkKind::Element { .. })
                .then(|| chunk.open_tag(source))
                .flatten()
                .and_then(|tag| fragment::attribute(tag, MARKER_ATTRIBUTE))
                .and_then(Slot::from_marker);
            let text = chunk.text(source).to_owned();
            match slot {
                Some(slot) => Node::Tagged(TaggedNode::new(slot, text)),
                None => Node::Raw(text),
            }
        })
        .collect()
}

/// Start and end offsets of the first `<name ...>` at or after `from`.
fn find_open_tag(source: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let needle = format!("<{name}");
    let start = find_visible(source, from, &needle, |start| {
        let after = start + needle.len();
        source.as_bytes().get(after).is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
    })?;
    fragment::tag_end(source.as_bytes(), start).map(|end| (start, end))
}

fn is_close_tag_at(source: &str, start: usize, name: &str) -> bool {
    let after = start + 2 + name.len();
    source.as_bytes().get(after).is_some_and(|b| b.is_ascii_whitespace() || *b == b'>')
}

/// Start of the first `</name>` at or after `from`.
fn find_close_tag(source: &str, name: &str, from: usize) -> Option<usize> {
    find_visible(source, from, &format!("</{name}"), |start| is_close_tag_at(source, start, name))
}

/// First `needle` at or after `from` that `accept` takes and that is not inside a comment or a
/// script element.
fn find_visible(source: &str, from: usize, needle: &str, accept: impl Fn(usize) -> bool) -> Option<usize> {
    let mut cursor = from;
    loop {
        let start = fragment::find_ci(source, cursor, needle)?;
        let comment = fragment::find_ci(source, cursor, "<!--").filter(|&at| at < start);
        let script = fragment::find_ci(source, cursor, "<script").filter(|&at| at < start);
        let hidden = match (comment, script) {
            (Some(c), Some(s)) => Some(c.min(s)),
            (c, s) => c.or(s),
        };

        if let Some(at) = hidden {
            cursor = if source[at..].starts_with("<!--") {
                source[at + 4..].find("-->").map(|i| at + 4 + i + 3)?
            } else {
                let open_end = fragment::tag_end(source.as_bytes(), at)?;
                fragment::raw_text_end(source, open_end, "script")?
            };
            continue;
        }
        if accept(start) {
            return Some(start);
        }
        cursor = start + needle.len();
    }
}

/// Start of the last `</name>`.
fn rfind_close_tag(source: &str, name: &str) -> Option<usize> {
    let mut found = None;
    let mut cursor = 0;
    while let Some(start) = find_close_tag(source, name, cursor) {
        found = Some(start);
        cursor = start + name.len() + 2;
    }
    found
}
