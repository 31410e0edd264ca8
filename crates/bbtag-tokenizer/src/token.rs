//! Token types for bracket-tag markup.

use std::borrow::Cow;

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A recognized bracket region: `[b]`, `[/b]`, `[*]`, `[url=...]`.
    Tag,
    /// Attribute name inside a tag: `color` in `[style color=red]`.
    AttrName,
    /// Attribute value inside a tag, quotes stripped.
    AttrValue,
    /// A run of text, including bracket fragments that are not tags.
    Word,
    /// A single space or tab.
    Space,
    /// `\n` or `\r\n`
    Newline,
}

impl TokenKind {
    /// Whether this token becomes a text leaf in the tree.
    pub fn is_text(&self) -> bool {
        matches!(self, TokenKind::Word | TokenKind::Space | TokenKind::Newline)
    }

    /// Whether this token belongs to the tag before it.
    pub fn is_attribute(&self) -> bool {
        matches!(self, TokenKind::AttrName | TokenKind::AttrValue)
    }
}

/// A token with its position and decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The raw source text. For a tag this is the whole region, delimiters included.
    pub text: &'src str,
    /// The decoded value: tag name (`/name` for closers), unquoted attribute
    /// value, or the text itself.
    pub value: Cow<'src, str>,
    /// Zero-based line number.
    pub line: u32,
    /// Character offset from the start of the line. Attribute tokens point
    /// at their own text inside the tag, so `[color=red]` puts `red` at 7.
    pub column: u32,
}

impl<'src> Token<'src> {
    /// Create a token whose value is its raw text.
    pub fn new(kind: TokenKind, span: Span, text: &'src str, line: u32, column: u32) -> Self {
        Self {
            kind,
            span,
            text,
            value: Cow::Borrowed(text),
            line,
            column,
        }
    }

    /// Replace the decoded value.
    pub fn with_value(mut self, value: impl Into<Cow<'src, str>>) -> Self {
        self.value = value.into();
        self
    }

    /// Whether this is a closing tag (`[/name]`).
    pub fn is_closing_tag(&self) -> bool {
        self.kind == TokenKind::Tag && self.value.starts_with('/')
    }

    /// The tag name without the closing `/`, or `None` for non-tag tokens.
    pub fn tag_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Tag => Some(self.value.strip_prefix('/').unwrap_or(self.value.as_ref())),
            _ => None,
        }
    }
}
