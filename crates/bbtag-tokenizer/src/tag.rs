//! Splitting the content of a bracket region into a tag name and attributes.

use std::borrow::Cow;

use crate::TokenKind;

/// An attribute token found inside a tag, positioned relative to the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrPiece<'a> {
    pub kind: TokenKind,
    /// Byte offset of `text` within the region content.
    pub offset: usize,
    pub text: &'a str,
    pub value: Cow<'a, str>,
}

/// The decomposed content of an accepted bracket region.
#[derive(Debug)]
pub(crate) struct TagContent<'a> {
    pub name: &'a str,
    pub attrs: Vec<AttrPiece<'a>>,
}

/// Split region content (the text between the delimiters).
///
/// Returns `None` when the content cannot be a tag: empty, leading
/// whitespace, or no name before the first `=` (`[]`, `[ ]`, `[=]`, `[/]`).
pub(crate) fn split_tag(content: &str) -> Option<TagContent<'_>> {
    if content.is_empty() || content.starts_with(char::is_whitespace) {
        return None;
    }

    if let Some(name) = content.strip_prefix('/') {
        if name.trim().is_empty() {
            return None;
        }
        return Some(TagContent {
            name: content,
            attrs: Vec::new(),
        });
    }

    // Without `=` the whole content is the name, spaces and all.
    if !content.contains('=') {
        return Some(TagContent {
            name: content,
            attrs: Vec::new(),
        });
    }

    let name_end = content
        .find(|c: char| c == '=' || c.is_whitespace())
        .unwrap_or(content.len());
    if name_end == 0 {
        return None;
    }

    let mut scanner = AttrScanner {
        content,
        pos: name_end,
        attrs: Vec::new(),
    };
    scanner.scan();

    Some(TagContent {
        name: &content[..name_end],
        attrs: scanner.attrs,
    })
}

struct AttrScanner<'a> {
    content: &'a str,
    pos: usize,
    attrs: Vec<AttrPiece<'a>>,
}

impl<'a> AttrScanner<'a> {
    fn rest(&self) -> &'a str {
        &self.content[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, offset: usize, value: Cow<'a, str>) {
        self.attrs.push(AttrPiece {
            kind,
            offset,
            text: &self.content[offset..self.pos],
            value,
        });
    }

    fn scan(&mut self) {
        loop {
            let rest = self.rest();
            self.pos += rest.len() - rest.trim_start().len();

            match self.peek() {
                None => break,
                // `=value` with no name in front of it
                Some('=') => {
                    self.pos += 1;
                    self.value();
                }
                Some(_) => {
                    let start = self.pos;
                    let rest = self.rest();
                    self.pos += rest
                        .find(|c: char| c == '=' || c.is_whitespace())
                        .unwrap_or(rest.len());
                    let name = &self.content[start..self.pos];
                    self.push(TokenKind::AttrName, start, Cow::Borrowed(name));

                    if self.peek() == Some('=') {
                        self.pos += 1;
                        self.value();
                    }
                }
            }
        }
    }

    fn value(&mut self) {
        let start = self.pos;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let body = &self.content[start + 1..];
                let (value, consumed) = unquote(body, quote);
                self.pos = start + 1 + consumed;
                self.push(TokenKind::AttrValue, start, value);
            }
            _ => {
                let rest = self.rest();
                self.pos += rest.find(char::is_whitespace).unwrap_or(rest.len());
                let value = &self.content[start..self.pos];
                self.push(TokenKind::AttrValue, start, Cow::Borrowed(value));
            }
        }
    }
}

/// Read a quoted value from just after its opening quote.
///
/// Returns the decoded value and the bytes consumed, closing quote included.
/// An unterminated quote runs to the end of `body`.
fn unquote(body: &str, quote: char) -> (Cow<'_, str>, usize) {
    let mut decoded: Option<String> = None;
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        if c == quote {
            let value = match decoded {
                Some(s) => Cow::Owned(s),
                None => Cow::Borrowed(&body[..i]),
            };
            return (value, i + c.len_utf8());
        }

        if c == '\\'
            && let Some(next) = body[i + 1..].chars().next()
            && (next == quote || next == '\\')
        {
            decoded
                .get_or_insert_with(|| body[..i].to_string())
                .push(next);
            chars.next();
            continue;
        }

        if let Some(s) = decoded.as_mut() {
            s.push(c);
        }
    }

    let value = match decoded {
        Some(s) => Cow::Owned(s),
        None => Cow::Borrowed(body),
    };
    (value, body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn attrs(content: &str) -> Vec<(TokenKind, usize, String)> {
        split_tag(content)
            .expect("content should be a tag")
            .attrs
            .into_iter()
            .map(|a| (a.kind, a.offset, a.value.into_owned()))
            .collect()
    }

    #[test]
    fn test_rejected_content() {
        for content in ["", " ", " b", "=", "=x", "/", "/  "] {
            assert!(split_tag(content).is_none(), "{content:?} should be rejected");
        }
    }

    #[test]
    fn test_phrase_name_without_equals() {
        let tag = split_tag("Single Tag").unwrap();
        assert_eq!(tag.name, "Single Tag");
        assert!(tag.attrs.is_empty());
    }

    #[test]
    fn test_closer_is_verbatim() {
        let tag = split_tag("/url=ignored").unwrap();
        assert_eq!(tag.name, "/url=ignored");
        assert!(tag.attrs.is_empty());
    }

    #[test]
    fn test_bare_value_after_name() {
        let tag = split_tag("color=\"#ff0000\"").unwrap();
        assert_eq!(tag.name, "color");
        assert_eq!(
            attrs("color=\"#ff0000\""),
            vec![(TokenKind::AttrValue, 6, "#ff0000".to_string())]
        );
    }

    #[test]
    fn test_named_attributes_in_order() {
        assert_eq!(
            attrs("img width=10 alt='a cat' hidden"),
            vec![
                (TokenKind::AttrName, 4, "width".to_string()),
                (TokenKind::AttrValue, 10, "10".to_string()),
                (TokenKind::AttrName, 13, "alt".to_string()),
                (TokenKind::AttrValue, 17, "a cat".to_string()),
                (TokenKind::AttrName, 25, "hidden".to_string()),
            ]
        );
    }

    #[test]
    fn test_unquoted_value_keeps_inner_equals() {
        assert_eq!(
            attrs("url=https://x.org/?a=b"),
            vec![(TokenKind::AttrValue, 4, "https://x.org/?a=b".to_string())]
        );
    }

    #[test]
    fn test_quoted_value_escapes() {
        let tag = split_tag(r#"q by="say \"hi\" \\ bye""#).unwrap();
        let value = &tag.attrs[1];
        assert_eq!(value.value, r#"say "hi" \ bye"#);
        assert_eq!(value.text, r#""say \"hi\" \\ bye""#);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(
            attrs("a title=\"open end"),
            vec![
                (TokenKind::AttrName, 2, "title".to_string()),
                (TokenKind::AttrValue, 8, "open end".to_string()),
            ]
        );
    }
}
