//! A tokenizer for bracket-tag markup (`[b]bold[/b]`, `[url=...]`, `[*]`).

mod span;
pub use span::Span;

mod token;
pub use token::{Token, TokenKind};

mod tag;

mod tokenizer;
pub use tokenizer::{Delimiters, TokenSource, Tokenizer};
