//! Navigable XML tree for EFA responses.
//!
//! quick-xml only offers a streaming reader, so a response is folded into a
//! small arena of elements first. Elements are stored in document order,
//! which makes the descendants of any element a contiguous index range.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

/// A structural path: a sequence of tag names, each one a descendant of the
/// previous (like a CSS selector `a b c`).
pub type Path = &'static [&'static str];

/// Errors from reading an XML document into a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The reader rejected the input.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// A closing tag with no open element.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    /// The input ended inside an element.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// No element at all (e.g. an empty body).
    #[error("document has no root element")]
    Empty,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    /// Index of the last node in this element's subtree (itself if a leaf).
    last_descendant: usize,
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    /// Text chunks in document order, tagged with the element that holds them.
    texts: Vec<(usize, String)>,
}

impl Document {
    /// Parse a complete XML document.
    ///
    /// # Examples
    ///
    /// ```
    /// use efa_monitor::efa::Document;
    ///
    /// let doc = Document::parse(r#"<a><b id="1">one</b><b id="2"/></a>"#).unwrap();
    /// let ids: Vec<_> = doc.root().select_all(&["b"]).filter_map(|b| b.attr("id")).collect();
    /// assert_eq!(ids, ["1", "2"]);
    /// ```
    pub fn parse(xml: &str) -> Result<Self, TreeError> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<Node> = Vec::new();
        let mut texts = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| TreeError::Malformed(e.to_string()))?;

            match event {
                Event::Start(start) => {
                    let id = push_node(&mut nodes, &reader, &start, open.last().copied())?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    push_node(&mut nodes, &reader, &start, open.last().copied())?;
                }
                Event::End(end) => {
                    let id = open
                        .pop()
                        .ok_or_else(|| TreeError::UnexpectedClose(lossy(end.name().as_ref())))?;
                    nodes[id].last_descendant = nodes.len() - 1;
                }
                Event::Text(text) => {
                    if let Some(&owner) = open.last() {
                        texts.push((owner, decode(&text)?.to_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(&owner) = open.last() {
                        texts.push((owner, decode(&data)?.to_owned()));
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(&owner) = open.last() {
                        let resolved = match reference
                            .resolve_char_ref()
                            .map_err(|e| TreeError::Malformed(e.to_string()))?
                        {
                            Some(ch) => ch.to_string(),
                            None => {
                                let name = decode(&reference)?;
                                resolve_predefined_entity(name)
                                    .ok_or_else(|| {
                                        TreeError::Malformed(format!("unknown entity &{name};"))
                                    })?
                                    .to_owned()
                            }
                        };
                        texts.push((owner, resolved));
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctypes
                _ => {}
            }
        }

        if let Some(&id) = open.last() {
            return Err(TreeError::Unclosed(nodes[id].tag.clone()));
        }
        if nodes.is_empty() {
            return Err(TreeError::Empty);
        }

        Ok(Self { nodes, texts })
    }

    /// The document element.
    pub fn root(&self) -> Element<'_> {
        Element { doc: self, id: 0 }
    }
}

fn push_node(
    nodes: &mut Vec<Node>,
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    parent: Option<usize>,
) -> Result<usize, TreeError> {
    let tag = decode(start.name().as_ref())?.to_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| TreeError::Malformed(e.to_string()))?;
        let key = decode(attr.key.as_ref())?.to_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| TreeError::Malformed(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    let id = nodes.len();
    nodes.push(Node {
        tag,
        attributes,
        parent,
        last_descendant: id,
    });
    Ok(id)
}

fn decode(bytes: &[u8]) -> Result<&str, TreeError> {
    std::str::from_utf8(bytes).map_err(|e| TreeError::Malformed(e.to_string()))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// A handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: usize,
}

impl<'a> Element<'a> {
    fn node(&self) -> &'a Node {
        &self.doc.nodes[self.id]
    }

    /// The element's tag name, as written.
    pub fn tag(&self) -> &'a str {
        &self.node().tag
    }

    /// Whether the tag name matches, ignoring ASCII case.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.node().tag.eq_ignore_ascii_case(tag)
    }

    /// Read an attribute. Absence is not an error.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text(&self) -> String {
        let range = self.id..=self.node().last_descendant;
        self.doc
            .texts
            .iter()
            .filter(|(owner, _)| range.contains(owner))
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// The enclosing element, if any.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.node().parent.map(|id| Element { doc: self.doc, id })
    }

    /// All descendants matching `path`, in document order.
    pub fn select_all(&self, path: Path) -> impl Iterator<Item = Element<'a>> + use<'a> {
        let this = *self;
        (self.id + 1..=self.node().last_descendant)
            .filter(move |&id| this.matches(id, path))
            .map(move |id| Element { doc: this.doc, id })
    }

    /// The first descendant matching `path`, in document order.
    pub fn select_first(&self, path: Path) -> Option<Element<'a>> {
        self.select_all(path).next()
    }

    /// Whether node `id` (a strict descendant of `self`) ends `path`, with
    /// the earlier path steps found among its ancestors below `self`.
    fn matches(&self, id: usize, path: &[&str]) -> bool {
        let Some((last, mut pending)) = path.split_last() else {
            return false;
        };
        let node = &self.doc.nodes[id];
        if !node.tag.eq_ignore_ascii_case(last) {
            return false;
        }

        let mut cursor = node.parent;
        while let Some((want, rest)) = pending.split_last() {
            match cursor {
                Some(ancestor) if ancestor != self.id => {
                    let ancestor = &self.doc.nodes[ancestor];
                    if ancestor.tag.eq_ignore_ascii_case(want) {
                        pending = rest;
                    }
                    cursor = ancestor.parent;
                }
                _ => return false,
            }
        }
        true
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Element(<{}>)", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
  <list>
    <item n="1"><name>first</name></item>
    <group>
      <item n="2"/>
    </group>
  </list>
  <item n="3"/>
</root>"#;

    #[test]
    fn select_all_is_document_order() {
        let doc = Document::parse(SAMPLE).unwrap();
        let ns: Vec<_> = doc
            .root()
            .select_all(&["item"])
            .map(|e| e.attr("n").unwrap())
            .collect();
        assert_eq!(ns, ["1", "2", "3"]);
    }

    #[test]
    fn path_steps_are_descendants_not_children() {
        let doc = Document::parse(SAMPLE).unwrap();
        let ns: Vec<_> = doc
            .root()
            .select_all(&["list", "item"])
            .map(|e| e.attr("n").unwrap())
            .collect();
        assert_eq!(ns, ["1", "2"]);
    }

    #[test]
    fn path_must_match_every_step() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(doc.root().select_first(&["group", "name"]).is_none());
        assert!(doc.root().select_first(&["list", "item", "name"]).is_some());
    }

    #[test]
    fn context_element_is_not_part_of_the_match() {
        let doc = Document::parse(SAMPLE).unwrap();
        let list = doc.root().select_first(&["list"]).unwrap();
        // `list` itself cannot satisfy the first step.
        assert!(list.select_first(&["list", "item"]).is_none());
        assert_eq!(list.select_all(&["item"]).count(), 2);
    }

    #[test]
    fn tags_match_case_insensitively() {
        let doc = Document::parse("<itdRequest><itdOdv/></itdRequest>").unwrap();
        assert!(doc.root().has_tag("itdrequest"));
        assert!(doc.root().select_first(&["ITDODV"]).is_some());
        assert_eq!(doc.root().tag(), "itdRequest");
    }

    #[test]
    fn attributes_are_unescaped_and_optional() {
        let doc = Document::parse(r#"<a x="Stuttgart &amp; Ulm" y=""/>"#).unwrap();
        let root = doc.root();
        assert_eq!(root.attr("x"), Some("Stuttgart & Ulm"));
        assert_eq!(root.attr("y"), Some(""));
        assert_eq!(root.attr("z"), None);
    }

    #[test]
    fn text_concatenates_descendants_and_resolves_entities() {
        let doc =
            Document::parse("<a>Hbf <b>Gleis&#32;1</b> &amp; <![CDATA[<Nord>]]></a>").unwrap();
        assert_eq!(doc.root().text(), "Hbf Gleis 1 & <Nord>");
        let b = doc.root().select_first(&["b"]).unwrap();
        assert_eq!(b.text(), "Gleis 1");
    }

    #[test]
    fn parent_walks_up() {
        let doc = Document::parse(SAMPLE).unwrap();
        let name = doc.root().select_first(&["name"]).unwrap();
        assert_eq!(name.parent().unwrap().tag(), "item");
        assert!(doc.root().parent().is_none());
    }

    #[test]
    fn empty_path_matches_nothing() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(doc.root().select_first(&[]).is_none());
    }

    #[test]
    fn rejects_broken_documents() {
        assert_eq!(Document::parse("").unwrap_err(), TreeError::Empty);
        assert!(Document::parse("<a><b></b>").is_err());
        assert!(Document::parse("<a></b>").is_err());
        assert!(Document::parse("<a>&bogus;</a>").is_err());
    }
}
