use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use turbox_lang_backend::BackendError;
use turbox_lang_parser::ParseError;
use turbox_lang_validator::ContractError;

pub type MainResult<T = ()> = Result<T, MainErrors>;

#[derive(Error, Diagnostic, Debug)]
#[error("Build failed with {} error(s)", .0.len())]
pub struct MainErrors(#[related] pub Vec<MainError>);

impl<T: Into<MainError>> From<T> for MainErrors {
    fn from(value: T) -> Self {
        let err: MainError = value.into();
        MainErrors(vec![err])
    }
}

#[derive(Error, Diagnostic, Debug)]
#[error(transparent)]
#[diagnostic(transparent)]
pub enum MainError {
    Parser(#[from] ParseError),
    Contract(#[from] ContractError),
    Backend(#[from] BackendError),
    Driver(#[from] DriverError),
}

#[derive(Error, Diagnostic, Debug)]
pub enum DriverError {
    #[error("File {} not found", .0.display())]
    #[diagnostic(code("D-001"))]
    FileNotFound(PathBuf),
    #[error("Codon compiler not found: {program}")]
    #[diagnostic(
        code("D-002"),
        help("Install Codon from https://github.com/exaloop/codon or set TURBOX_CODON to the compiler")
    )]
    ToolchainNotFound { program: String },
    #[error("Codon compiler is not usable: `{program} --version` exited with {status}")]
    #[diagnostic(code("D-003"))]
    ToolchainUnusable { program: String, status: String },
    #[error("No routes found in {}", .0.display())]
    #[diagnostic(
        code("D-004"),
        help(
            "Make sure you have:\n  1. app = TurboX()\n  2. Functions decorated with @app.route('/path')"
        )
    )]
    NoRoutes(PathBuf),
    #[error("Compilation failed: {program} exited with {status}")]
    #[diagnostic(code("D-005"))]
    CompilationFailed { program: String, status: String },
    #[error("IO error on {}: {source}", .path.display())]
    #[diagnostic(code("D-006"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The file is present, but does not contain the specified byte index.")]
    IndexTooLarge { given: usize, max: usize },
    #[error(
        "The given index is contained in the file, but is not a boundary of a UTF-8 code point."
    )]
    InvalidCharBoundary { given: usize },
}
