use turbox_lang_miette_util::codespan::Span;

/// Trait for syntactic entities which have a source-code span.
pub trait HasSpan {
    /// Return the source code span of the entity.
    fn span(&self) -> Span;
}

impl HasSpan for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl<T: HasSpan> HasSpan for Box<T> {
    fn span(&self) -> Span {
        self.as_ref().span()
    }
}
