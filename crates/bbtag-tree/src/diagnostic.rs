//! Errors reported while building the tree, with ariadne rendering.

use ariadne::{Color, Label, Report, ReportKind, Source};
use bbtag_tokenizer::Span;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A closing tag with no open tag left to close.
    InconsistentTag {
        /// Tag name, without the `/`.
        name: String,
    },
}

/// A tree-building error with source location.
///
/// Errors never stop parsing; they are collected next to the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Span of the offending token.
    pub span: Span,
    /// Zero-based line of the offending token.
    pub line: u32,
    /// Column of the offending token.
    pub column: u32,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            span,
            line,
            column,
        }
    }

    /// The tag name involved in the error.
    pub fn tag_name(&self) -> &str {
        match &self.kind {
            ParseErrorKind::InconsistentTag { name } => name,
        }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span.into();

        match &self.kind {
            ParseErrorKind::InconsistentTag { name } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("inconsistent tag '{}'", name))
                    .with_label(
                        Label::new((filename, range))
                            .with_message("no open tag to close")
                            .with_color(Color::Red),
                    )
                    .with_help(format!("remove this closer or add a matching '[{}]' before it", name))
            }
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::InconsistentTag { name } => write!(
                f,
                "Inconsistent tag '{}' on line {} and column {}",
                name, self.line, self.column
            ),
        }
    }
}

impl std::error::Error for ParseError {}
