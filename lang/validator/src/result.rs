use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Violations of the handler contract. Any of these blocks code generation.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Handler '{handler}' must accept exactly one parameter (request)")]
    #[diagnostic(code("V-001"), help("Use the signature: def {handler}(request: Request) -> str:"))]
    Arity {
        handler: String,
        found: usize,
        #[label("{found} parameter(s) declared here")]
        span: SourceSpan,
    },
    #[error("Handler '{handler}' parameter must be of type 'Request', got '{found}'")]
    #[diagnostic(code("V-002"), help("Use the signature: def {handler}(request: Request) -> str:"))]
    ParamType {
        handler: String,
        found: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Handler '{handler}' must return 'str', got '{found}'")]
    #[diagnostic(
        code("V-003"),
        help("Handlers must return strings. Use str() to convert other types.")
    )]
    ReturnType {
        handler: String,
        found: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Handler '{handler}' has no return statement")]
    #[diagnostic(code("V-004"), help("Add a return statement that returns a string"))]
    MissingReturn {
        handler: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Handler '{handler}' has empty return statement")]
    #[diagnostic(code("V-005"), help("Return a string value"))]
    EmptyReturn {
        handler: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Handler '{handler}' returns non-string value: {typ}")]
    #[diagnostic(code("V-006"), help("Convert to string: return str({value})"))]
    NonStringReturn {
        handler: String,
        typ: String,
        value: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Unsupported import: {module}")]
    #[diagnostic(code("V-007"), help("{reason}"))]
    UnsupportedImport {
        module: String,
        reason: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Async functions not supported: {name}")]
    #[diagnostic(code("V-008"), help("Use regular functions instead"))]
    AsyncFunction {
        name: String,
        #[label]
        span: SourceSpan,
    },
}

/// Advisory findings. These are reported but never block the build.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ContractWarning {
    #[error("Handler '{handler}' parameter '{param}' missing type hint")]
    #[diagnostic(code("W-001"), severity(Warning), help("Annotate it as `{param}: Request`"))]
    MissingParamAnnotation {
        handler: String,
        param: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Handler '{handler}' missing return type hint")]
    #[diagnostic(code("W-002"), severity(Warning), help("Annotate the return type as `-> str`"))]
    MissingReturnAnnotation {
        handler: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Lambda functions may not work correctly in Codon")]
    #[diagnostic(code("W-003"), severity(Warning))]
    Lambda {
        #[label]
        span: SourceSpan,
    },
    #[error("Missing 'from turbox import TurboX' import")]
    #[diagnostic(code("W-004"), severity(Warning))]
    MissingFrameworkImport,
    #[error("Using 'Request' type but not importing it. Add: from turbox import Request")]
    #[diagnostic(code("W-005"), severity(Warning))]
    RequestNotImported {
        #[label]
        span: SourceSpan,
    },
    #[error("Route of handler '{handler}' has a path that cannot be resolved at build time")]
    #[diagnostic(
        code("W-006"),
        severity(Warning),
        help(
            "Paths must be string literals, module-level string constants, or `+` and f-string combinations of those. The route is not registered."
        )
    )]
    DynamicRoute {
        handler: String,
        #[label("not a static path")]
        span: SourceSpan,
    },
    #[error("Route of handler '{handler}' declares no supported HTTP method")]
    #[diagnostic(
        code("W-007"),
        severity(Warning),
        help("Supported methods are GET, POST, PUT, DELETE, PATCH, HEAD and OPTIONS. The route is not registered.")
    )]
    NoRouteMethod {
        handler: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Route of handler '{handler}' lists an unsupported method: {element}")]
    #[diagnostic(code("W-008"), severity(Warning), help("This entry is ignored"))]
    IgnoredRouteMethod {
        handler: String,
        element: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Route of handler '{handler}' does not list its methods literally")]
    #[diagnostic(code("W-009"), severity(Warning), help("The route is registered for GET only"))]
    DynamicRouteMethods {
        handler: String,
        #[label]
        span: SourceSpan,
    },
}

/// Everything found by a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<ContractError>,
    pub warnings: Vec<ContractWarning>,
}

impl Validation {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub(crate) fn error(&mut self, err: ContractError) {
        self.errors.push(err);
    }

    pub(crate) fn warn(&mut self, warning: ContractWarning) {
        self.warnings.push(warning);
    }
}
