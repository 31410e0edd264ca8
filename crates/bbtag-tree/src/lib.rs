//! Tag tree for bracket-tag markup.
//!
//! This crate turns markup such as `[b]bold[/b] [url=https://x.org]x[/url]`
//! into a forest of [`Node`]s. Parsing never fails: malformed tags stay as
//! text, and closers without an opener are reported in [`Parsed::errors`].

mod builder;
mod diagnostic;
mod node;
mod options;

pub use bbtag_tokenizer::{Delimiters, Span, Token, TokenKind, TokenSource, Tokenizer};
pub use builder::{Parsed, TreeBuilder};
pub use diagnostic::{ParseError, ParseErrorKind};
pub use node::{Attribute, Attributes, Node, TagNode, text_content};
pub use options::ParseOptions;

/// Parse markup with default options.
pub fn parse(source: &str) -> Parsed {
    parse_with(source, &ParseOptions::default())
}

/// Parse markup with the given options.
pub fn parse_with(source: &str, options: &ParseOptions) -> Parsed {
    let tokenizer = Tokenizer::with_delimiters(source, options.delimiters);
    parse_tokens(tokenizer, options)
}

/// Build a tree from any token source, in place of the built-in tokenizer.
///
/// `options.delimiters` is not consulted here; the source already decided
/// what a tag looks like.
pub fn parse_tokens<'src, T: TokenSource<'src>>(tokens: T, options: &ParseOptions) -> Parsed {
    TreeBuilder::new(options).build(tokens)
}

#[cfg(test)]
mod tests;
