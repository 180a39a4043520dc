use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failures of the command line front end itself.
#[derive(Error, Diagnostic, Debug)]
pub enum AppError {
    #[error("Could not start {}: {source}", .binary.display())]
    #[diagnostic(code("A-001"))]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} exited with {status}", .binary.display())]
    #[diagnostic(code("A-002"))]
    BinaryFailed { binary: PathBuf, status: String },
}
