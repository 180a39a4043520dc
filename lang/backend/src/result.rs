use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum BackendError {
    #[error("Handler '{name}' clashes with a name defined by the TurboX runtime")]
    #[diagnostic(code("B-001"), help("Rename the handler function"))]
    ReservedName {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Handler name '{name}' is used by more than one routed function")]
    #[diagnostic(
        code("B-003"),
        help("Every routed function is emitted under its own name, rename one of them")
    )]
    DuplicateHandler {
        name: String,
        #[label("redefined here")]
        span: SourceSpan,
        #[label("first defined here")]
        first: SourceSpan,
    },
    #[error("Failed to render the generated program")]
    #[diagnostic(code("B-002"))]
    Render(#[from] askama::Error),
}

pub type BackendResult<T = ()> = Result<T, BackendError>;
