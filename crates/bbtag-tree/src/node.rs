//! Node types for parsed markup.
//!
//! A document parses into a forest: a list of [`Node`]s, each either a
//! [`TagNode`] with its own children or a text leaf. Whitespace and newlines
//! are kept as their own text leaves, in document order.

use bbtag_tokenizer::Span;

/// A node in the parsed forest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
#[repr(u8)]
pub enum Node {
    /// A tag with attributes and children.
    Tag(TagNode),
    /// A text leaf: a word, a single whitespace character, a newline, or the
    /// literal text of a tag that was not accepted.
    Text(String),
}

/// A tag such as `[b]...[/b]` or `[*]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct TagNode {
    /// Tag name as written (no case folding).
    pub name: String,
    /// Attributes in first-seen order.
    pub attributes: Attributes,
    /// Children in document order.
    pub children: Vec<Node>,
    /// Span of the opening tag (None if programmatically constructed).
    pub span: Option<Span>,
}

/// Ordered attribute map. Setting an existing name keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Attributes {
    entries: Vec<Attribute>,
}

/// A single `name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Node::Tag(tag) => Some(tag),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Tag(_) => None,
        }
    }

    /// Tag name, if this is a tag.
    pub fn tag_name(&self) -> Option<&str> {
        self.as_tag().map(|tag| tag.name.as_str())
    }

    /// Append the text leaves under this node, in order, to `out`.
    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Tag(tag) => {
                for child in &tag.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<TagNode> for Node {
    fn from(tag: TagNode) -> Self {
        Node::Tag(tag)
    }
}

impl TagNode {
    /// Create an empty tag with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        TagNode {
            name: name.into(),
            attributes: Attributes::default(),
            children: Vec::new(),
            span: None,
        }
    }

    /// Set an attribute, builder style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Append a child, builder style.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// The text of all leaves under this tag, concatenated.
    pub fn text_content(&self) -> String {
        text_content(&self.children)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl Attributes {
    /// Set `name` to `value`, keeping the position of an existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Attribute { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
    }
}

/// Concatenate every text leaf in the forest, in document order.
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}
