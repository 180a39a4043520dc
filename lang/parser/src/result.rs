use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use turbox_lang_miette_util::ToMiette;
use turbox_lang_miette_util::codespan::Span;

use crate::lexer::LexicalError;

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors which abort parsing. The first error encountered is reported.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid token")]
    #[diagnostic(code("P-001"))]
    InvalidToken {
        #[label]
        span: SourceSpan,
    },
    #[error("Unterminated string literal")]
    #[diagnostic(code("P-002"), help("Close the string with the quote it was opened with"))]
    UnterminatedString {
        #[label]
        span: SourceSpan,
    },
    #[error("Unindent does not match any outer indentation level")]
    #[diagnostic(code("P-003"))]
    InconsistentDedent {
        #[label]
        span: SourceSpan,
    },
    #[error("Unmatched '{bracket}'")]
    #[diagnostic(code("P-004"))]
    UnmatchedBracket {
        bracket: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected {found}, expected {expected}")]
    #[diagnostic(code("P-005"))]
    UnexpectedToken {
        found: String,
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected end of file, expected {expected}")]
    #[diagnostic(code("P-006"))]
    UnexpectedEof {
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Invalid string literal: {reason}")]
    #[diagnostic(code("P-007"))]
    InvalidString {
        reason: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Too many nested parentheses, blocks or operators")]
    #[diagnostic(code("P-009"), help("Nesting is limited to {limit} levels"))]
    TooDeeplyNested {
        limit: usize,
        #[label]
        span: SourceSpan,
    },
    #[error("Cannot assign to {what}")]
    #[diagnostic(code("P-008"))]
    InvalidTarget {
        what: String,
        #[label]
        span: SourceSpan,
    },
}

impl ParseError {
    pub(crate) fn lexical(err: LexicalError, span: Span) -> Self {
        let span = span.to_miette();
        match err {
            LexicalError::InvalidToken => ParseError::InvalidToken { span },
            LexicalError::UnterminatedString => ParseError::UnterminatedString { span },
        }
    }

    pub(crate) fn invalid_string(reason: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidString { reason: reason.into(), span: span.to_miette() }
    }
}
