//! Tokenizer for bracket-tag markup.

use std::collections::{HashSet, VecDeque};

use crate::tag::{TagContent, split_tag};
use crate::{Span, Token, TokenKind};
use tracing::trace;

/// The characters that open and close a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Starts a tag, `[` by default.
    pub open: char,
    /// Ends a tag, `]` by default.
    pub close: char,
}

impl Delimiters {
    /// Create a delimiter pair.
    pub fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new('[', ']')
    }
}

/// A stream of tokens that can also answer whether a tag needs a closer.
///
/// [`Tokenizer`] is the built-in implementation; tree building accepts any
/// other source that follows the same token contract.
pub trait TokenSource<'src>: Iterator<Item = Token<'src>> {
    /// Whether the tag `name` waits for an explicit `[/name]` closer.
    fn is_nested(&self, name: &str) -> bool;
}

/// A tokenizer that produces tokens from markup source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Current line, counted in newline tokens.
    line: u32,
    /// Current column, in characters since the last newline.
    column: u32,
    delimiters: Delimiters,
    /// Names that appear in a closer somewhere in `source`.
    closed: HashSet<&'src str>,
    /// Attribute tokens of the last tag, waiting to be handed out.
    queued: VecDeque<Token<'src>>,
}

/// A bracket region that passed validation.
struct Region<'src> {
    /// Byte length of the whole region, delimiters included.
    len: usize,
    content: &'src str,
    tag: TagContent<'src>,
}

impl<'src> Tokenizer<'src> {
    /// Create a tokenizer using `[` and `]`.
    pub fn new(source: &'src str) -> Self {
        Self::with_delimiters(source, Delimiters::default())
    }

    /// Create a tokenizer with custom tag delimiters.
    pub fn with_delimiters(source: &'src str, delimiters: Delimiters) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 0,
            column: 0,
            delimiters,
            closed: closed_names(source, delimiters),
            queued: VecDeque::new(),
        }
    }

    /// Whether the source contains a closer for `name` anywhere.
    ///
    /// Tag names never contain the close delimiter, so a name that does is
    /// never nested.
    pub fn is_nested(&self, name: &str) -> bool {
        self.closed.contains(name)
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character within the current line.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        self.column += 1;
        Some(c)
    }

    /// Advance over `text`, which must not contain a newline.
    #[inline]
    fn advance_over(&mut self, text: &str) {
        self.pos += text.len() as u32;
        self.remaining = &self.remaining[text.len()..];
        self.column += text.chars().count() as u32;
    }

    #[inline]
    fn at_newline(&self) -> bool {
        match self.peek() {
            Some('\n') => true,
            Some('\r') => self.peek_nth(1) == Some('\n'),
            _ => false,
        }
    }

    /// Create a token from the given start position to the current position.
    fn token(&self, kind: TokenKind, start: u32, column: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = span.slice(self.source);
        trace!(
            "Token {:?} at {}:{} {:?}: {:?}",
            kind, self.line, column, span, text
        );
        Token::new(kind, span, text, self.line, column)
    }

    /// Get the next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> Option<Token<'src>> {
        if let Some(token) = self.queued.pop_front() {
            return Some(token);
        }

        let c = self.peek()?;
        let start = self.pos;
        let column = self.column;

        let token = match c {
            '\n' | '\r' if self.at_newline() => self.tokenize_newline(),
            ' ' | '\t' => {
                self.advance();
                self.token(TokenKind::Space, start, column)
            }
            c if c == self.delimiters.open => match self.tag_region() {
                Some(region) => self.tokenize_tag(region),
                None => self.tokenize_word(),
            },
            _ => self.tokenize_word(),
        };
        Some(token)
    }

    fn tokenize_newline(&mut self) -> Token<'src> {
        let start = self.pos;
        let column = self.column;
        if self.peek() == Some('\r') {
            self.advance();
        }
        self.advance();
        let token = self.token(TokenKind::Newline, start, column);
        self.line += 1;
        self.column = 0;
        token
    }

    /// Tokenize a run of text up to whitespace, a newline or an open delimiter.
    ///
    /// The first character is always taken, so a rejected open delimiter
    /// starts a word instead of stalling.
    fn tokenize_word(&mut self) -> Token<'src> {
        let start = self.pos;
        let column = self.column;

        self.advance();
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == self.delimiters.open || self.at_newline() {
                break;
            }
            self.advance();
        }

        self.token(TokenKind::Word, start, column)
    }

    /// Look for a valid tag region at the current position.
    ///
    /// The region ends at the first close delimiter. A newline, a second open
    /// delimiter or the end of input before that means there is no tag here.
    fn tag_region(&self) -> Option<Region<'src>> {
        let Delimiters { open, close } = self.delimiters;
        let after_open = &self.remaining[open.len_utf8()..];

        let end = after_open.find(|c: char| c == close || c == open || c == '\n')?;
        if !after_open[end..].starts_with(close) {
            return None;
        }

        let content = &after_open[..end];
        let tag = split_tag(content)?;
        Some(Region {
            len: open.len_utf8() + end + close.len_utf8(),
            content,
            tag,
        })
    }

    fn tokenize_tag(&mut self, region: Region<'src>) -> Token<'src> {
        let start = self.pos;
        let column = self.column;
        let content_start = start + self.delimiters.open.len_utf8() as u32;
        let content_column = column + 1;

        for attr in region.tag.attrs {
            let prefix = &region.content[..attr.offset];
            let attr_column = content_column + prefix.chars().count() as u32;
            let span = Span::at(content_start + attr.offset as u32, attr.text.len());
            trace!(
                "Token {:?} at {}:{} {:?}: {:?}",
                attr.kind, self.line, attr_column, span, attr.text
            );
            self.queued.push_back(
                Token::new(attr.kind, span, attr.text, self.line, attr_column)
                    .with_value(attr.value),
            );
        }

        let remaining = self.remaining;
        self.advance_over(&remaining[..region.len]);
        self.token(TokenKind::Tag, start, column)
            .with_value(region.tag.name)
    }
}

/// Collect the name of every `open/name close` in `source` in one pass.
///
/// Each closer starts at an `open/` and ends at the first `close` after it.
fn closed_names(source: &str, delimiters: Delimiters) -> HashSet<&str> {
    let Delimiters { open, close } = delimiters;
    let mut prefix = String::with_capacity(open.len_utf8() + 1);
    prefix.push(open);
    prefix.push('/');

    let mut closes = source.match_indices(close).map(|(at, _)| at).peekable();
    let mut names = HashSet::new();
    for (at, _) in source.match_indices(prefix.as_str()) {
        let name_start = at + prefix.len();
        while closes.next_if(|&end| end < name_start).is_some() {}
        let Some(&end) = closes.peek() else {
            break;
        };
        names.insert(&source[name_start..end]);
    }
    names
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl<'src> TokenSource<'src> for Tokenizer<'src> {
    fn is_nested(&self, name: &str) -> bool {
        Tokenizer::is_nested(self, name)
    }
}
