use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use tracing::debug;

use crate::error::DocumentError;

/// Encoding every document source is read with.
pub const DOCUMENT_ENCODING: &str = "UTF-8";

/// Elements whose text children are never rendered.
const NON_RENDERED_TAGS: &[&str] = &["script", "style"];

static HTML_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("valid regex"));

type NodeId = usize;

#[derive(Debug)]
enum NodeKind {
    Document,
    Element {
        tag_name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed HTML document.
///
/// The html5ever tree is flattened into an arena in document order, so node index order is
/// pre-order traversal order. Elements are only reachable through [`ElementRef`] handles that
/// borrow the document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeId>,
}

impl Document {
    /// Parse an HTML string. HTML parsing is error tolerant, so this never fails; missing
    /// `html`, `head` and `body` elements are synthesized the way browsers do.
    pub fn parse(source: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), opts).one(source);
        Self::from_dom(&dom)
    }

    /// Read and parse an HTML file. Byte sequences that are not valid UTF-8 are replaced with
    /// U+FFFD rather than rejected; only I/O failures are errors.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);
        let document = Self::parse(&source);
        debug!(
            path = %path.display(),
            encoding = DOCUMENT_ENCODING,
            bytes = bytes.len(),
            lossy = matches!(source, Cow::Owned(_)),
            elements = document.element_count(),
            "parsed document"
        );
        Ok(document)
    }

    fn from_dom(dom: &RcDom) -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
        };

        // Explicit stack keeps deeply nested markup from exhausting the call stack. Children
        // are pushed in reverse so they pop in source order.
        let mut stack: Vec<(Handle, Option<NodeId>)> = vec![(dom.document.clone(), None)];
        while let Some((handle, parent)) = stack.pop() {
            let kind = match &handle.data {
                NodeData::Document => NodeKind::Document,
                NodeData::Element { name, attrs, .. } => {
                    let mut attributes: Vec<(String, String)> = Vec::new();
                    for attr in attrs.borrow().iter() {
                        let key = match &attr.name.prefix {
                            Some(prefix) => format!("{prefix}:{}", attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        if attributes.iter().any(|(existing, _)| *existing == key) {
                            continue;
                        }
                        attributes.push((key, attr.value.to_string()));
                    }
                    NodeKind::Element {
                        tag_name: name.local.to_string(),
                        attributes,
                    }
                }
                NodeData::Text { contents } => NodeKind::Text(contents.borrow().to_string()),
                _ => continue,
            };

            let id = document.nodes.len();
            if let NodeKind::Element { attributes, .. } = &kind {
                if let Some((_, value)) = attributes.iter().find(|(key, _)| key == "id") {
                    document.ids.entry(value.clone()).or_insert(id);
                }
            }
            document.nodes.push(Node {
                kind,
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                document.nodes[parent].children.push(id);
            }

            let children = child_handles(&handle);
            stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }

        document
    }

    /// The first element in document order whose `id` attribute equals `id` exactly.
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.ids.get(id).map(|&node| self.element(node))
    }

    /// Every element with the given tag name, in document order. Tag names are matched
    /// ASCII case-insensitively.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<ElementRef<'_>> {
        let tag = tag.to_ascii_lowercase();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                matches!(&node.kind, NodeKind::Element { tag_name, .. } if *tag_name == tag)
            })
            .map(|(id, _)| self.element(id))
            .collect()
    }

    /// The top-level element (normally `html`).
    pub(crate) fn root_element(&self) -> Option<ElementRef<'_>> {
        self.element_children(0).into_iter().next()
    }

    pub(crate) fn element_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Element { .. }))
            .count()
    }

    fn element(&self, id: NodeId) -> ElementRef<'_> {
        ElementRef { document: self, id }
    }

    fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].kind, NodeKind::Element { .. })
    }

    fn element_children(&self, id: NodeId) -> Vec<ElementRef<'_>> {
        match self.nodes.get(id) {
            Some(node) => node
                .children
                .iter()
                .copied()
                .filter(|&child| self.is_element(child))
                .map(|child| self.element(child))
                .collect(),
            None => Vec::new(),
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match &node.kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element { tag_name, .. } if tag_name == "br" => out.push(' '),
                NodeKind::Element { tag_name, .. }
                    if NON_RENDERED_TAGS.contains(&tag_name.as_str()) => {}
                _ => stack.extend(node.children.iter().rev()),
            }
        }
    }
}

/// Template elements keep their contents in a separate fragment; they are surfaced as
/// ordinary children.
fn child_handles(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            return contents.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}

/// A read-only handle to an element of a [`Document`].
#[derive(Clone, Copy)]
pub struct ElementRef<'doc> {
    document: &'doc Document,
    id: NodeId,
}

impl<'doc> ElementRef<'doc> {
    fn data(&self) -> (&'doc str, &'doc [(String, String)]) {
        match &self.document.nodes[self.id].kind {
            NodeKind::Element {
                tag_name,
                attributes,
            } => (tag_name.as_str(), attributes.as_slice()),
            _ => unreachable!("ElementRef always points at an element node"),
        }
    }

    pub fn tag_name(&self) -> &'doc str {
        self.data().0
    }

    /// Attributes in source order. Names are lowercased by the parser; a repeated attribute
    /// keeps its first value.
    pub fn attributes(&self) -> &'doc [(String, String)] {
        self.data().1
    }

    pub fn attr(&self, name: &str) -> Option<&'doc str> {
        self.attributes()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Rendered text of the element and its descendants, with whitespace runs collapsed to a
    /// single space and the ends trimmed. `<br>` renders as a space; script and style bodies
    /// are not text.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.document.collect_text(self.id, &mut raw);
        HTML_WHITESPACE
            .replace_all(&raw, " ")
            .trim_matches(' ')
            .to_string()
    }

    /// The parent element. `None` for the top-level element, whose parent is the document.
    pub fn parent(&self) -> Option<ElementRef<'doc>> {
        self.document.nodes[self.id]
            .parent
            .filter(|&parent| self.document.is_element(parent))
            .map(|parent| self.document.element(parent))
    }

    /// Ancestor elements, nearest first.
    pub fn parents(&self) -> Vec<ElementRef<'doc>> {
        let mut parents = Vec::new();
        let mut current = self.parent();
        while let Some(element) = current {
            parents.push(element);
            current = element.parent();
        }
        parents
    }

    /// Child elements in document order; text and comments are skipped.
    pub fn children(&self) -> Vec<ElementRef<'doc>> {
        self.document.element_children(self.id)
    }

    /// Every element child of this element's parent node, this element included, in
    /// document order. The top-level element is its own only sibling.
    pub fn siblings(&self) -> Vec<ElementRef<'doc>> {
        match self.document.nodes[self.id].parent {
            Some(parent) => self.document.element_children(parent),
            None => vec![*self],
        }
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("tag_name", &self.tag_name())
            .field("node", &self.id)
            .finish()
    }
}
