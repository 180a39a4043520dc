use std::fmt;

use derivative::Derivative;
use turbox_lang_miette_util::codespan::Span;

use crate::HasSpan;

/// An identifier occurring in the source, e.g. a variable, function or attribute name.
///
/// Equality and hashing only consider the name, not where it was written.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Ident {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Span,
    pub id: String,
}

impl Ident {
    pub fn new(span: Span, id: impl Into<String>) -> Self {
        Ident { span, id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}
