//! Tree builder from tokens.

use std::borrow::Cow;

use bbtag_tokenizer::{Token, TokenKind, TokenSource};
use tracing::{debug, trace, warn};

use crate::diagnostic::{ParseError, ParseErrorKind};
use crate::node::{Node, TagNode};
use crate::options::ParseOptions;

/// The result of building: the forest plus every error seen on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// Top-level nodes in document order.
    pub nodes: Vec<Node>,
    /// Errors in the order they were found.
    pub errors: Vec<ParseError>,
}

impl Parsed {
    /// Whether no errors were reported.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builder that reduces a token stream to a forest.
///
/// One builder serves one parse; all state lives here.
pub struct TreeBuilder<'opts> {
    options: &'opts ParseOptions,
    nodes: Vec<Node>,
    open: Vec<OpenTag>,
    pending: Option<PendingTag>,
    errors: Vec<ParseError>,
}

/// A tag waiting for its closer.
struct OpenTag {
    node: TagNode,
    /// Raw text of the opener, kept in case the closer never comes.
    opener: String,
}

/// A tag still receiving attribute tokens.
struct PendingTag {
    node: TagNode,
    opener: String,
    nested: bool,
    attr_names: Vec<String>,
}

impl<'opts> TreeBuilder<'opts> {
    pub fn new(options: &'opts ParseOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            open: Vec::new(),
            pending: None,
            errors: Vec::new(),
        }
    }

    /// Feed every token of `source`, then finish.
    pub fn build<'src, T: TokenSource<'src>>(mut self, mut source: T) -> Parsed {
        while let Some(token) = source.next() {
            let nested = match token.tag_name() {
                Some(name) if !token.is_closing_tag() => source.is_nested(name),
                _ => false,
            };
            self.token(token, nested);
        }
        self.finish()
    }

    /// Feed one token. `nested` says whether an opening tag waits for a closer;
    /// it is ignored for every other token.
    pub fn token(&mut self, token: Token<'_>, nested: bool) {
        match token.kind {
            TokenKind::AttrName => self.attr_name(token.value),
            TokenKind::AttrValue => self.attr_value(token.value),
            TokenKind::Tag => {
                self.flush_pending();
                self.tag(token, nested);
            }
            TokenKind::Word | TokenKind::Space | TokenKind::Newline => {
                self.flush_pending();
                self.append(Node::Text(token.value.into_owned()));
            }
        }
    }

    /// Finish building and return the forest.
    ///
    /// Tags still open at this point never saw a closer: their opener text
    /// and children are spliced into the parent as if they were plain text.
    pub fn finish(mut self) -> Parsed {
        self.flush_pending();

        // The outermost open tag sits directly in the forest, and each
        // deeper one started after its parent's children so far.
        for OpenTag { node, opener } in std::mem::take(&mut self.open) {
            debug!("Unclosed tag {:?}, keeping it as text", node.name);
            self.nodes.push(Node::Text(opener));
            self.nodes.extend(node.children);
        }

        Parsed {
            nodes: self.nodes,
            errors: self.errors,
        }
    }

    fn tag(&mut self, token: Token<'_>, nested: bool) {
        let name = token.tag_name().unwrap_or_default();
        if !self.options.is_allowed(name) {
            trace!("Tag {:?} not allowed, keeping {:?}", name, token.text);
            self.append(Node::Text(token.text.to_string()));
            return;
        }

        if token.is_closing_tag() {
            self.close(name, &token);
        } else {
            let mut node = TagNode::new(name);
            node.span = Some(token.span);
            self.pending = Some(PendingTag {
                node,
                opener: token.text.to_string(),
                nested,
                attr_names: Vec::new(),
            });
        }
    }

    fn close(&mut self, name: &str, token: &Token<'_>) {
        match self.open.pop() {
            Some(OpenTag { node, .. }) => {
                if node.name != name {
                    debug!("Closer {:?} closes open tag {:?}", name, node.name);
                }
                trace!("Close {:?}", node.name);
                self.append(Node::Tag(node));
            }
            None => {
                let error = ParseError::new(
                    ParseErrorKind::InconsistentTag {
                        name: name.to_string(),
                    },
                    token.span,
                    token.line,
                    token.column,
                );
                warn!("{}", error);
                self.errors.push(error);
            }
        }
    }

    fn attr_name(&mut self, name: Cow<'_, str>) {
        let Some(pending) = self.pending.as_mut() else {
            trace!("Attribute name {:?} outside a tag, dropped", name);
            return;
        };
        pending.node.attributes.set(name.as_ref(), "");
        pending.attr_names.push(name.into_owned());
    }

    fn attr_value(&mut self, value: Cow<'_, str>) {
        let Some(pending) = self.pending.as_mut() else {
            trace!("Attribute value {:?} outside a tag, dropped", value);
            return;
        };
        match pending.attr_names.pop() {
            Some(name) => pending.node.attributes.set(name, value),
            // `[url=...]`: the value is its own key
            None => pending.node.attributes.set(value.as_ref(), value.as_ref()),
        }
    }

    /// Place the tag under construction: on the open stack if it waits for a
    /// closer, otherwise straight into the current parent.
    fn flush_pending(&mut self) {
        let Some(PendingTag {
            node,
            opener,
            nested,
            ..
        }) = self.pending.take()
        else {
            return;
        };

        if nested {
            trace!("Open {:?}", node.name);
            self.open.push(OpenTag { node, opener });
        } else {
            self.append(Node::Tag(node));
        }
    }

    /// Append to the innermost open tag, or to the forest.
    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.node.children.push(node),
            None => self.nodes.push(node),
        }
    }
}
