//! Parse options.

use bbtag_tokenizer::Delimiters;

/// Options for parsing markup into a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tag delimiters (default: `[` and `]`)
    pub delimiters: Delimiters,

    /// Tag names to accept (default: all). Other tags are kept as literal
    /// text. An empty list also accepts all tags.
    pub only_allow_tags: Option<Vec<String>>,
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom tag delimiters.
    pub fn delimiters(mut self, open: char, close: char) -> Self {
        self.delimiters = Delimiters::new(open, close);
        self
    }

    /// Accept only these tag names.
    pub fn only_allow_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_allow_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a tag name passes the allow-list. Names compare exactly.
    pub fn is_allowed(&self, name: &str) -> bool {
        match &self.only_allow_tags {
            Some(tags) if !tags.is_empty() => tags.iter().any(|tag| tag == name),
            _ => true,
        }
    }
}
