//! The boundary to the external Codon compiler.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::result::DriverError;

pub const DEFAULT_COMPILER: &str = "codon";

/// Captured result of one compiler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("exit code {code}"),
            None => "a signal".to_string(),
        }
    }
}

/// Something that runs the compiler synchronously and captures its output.
pub trait Toolchain {
    /// How the compiler is named in messages.
    fn program(&self) -> String;

    /// Run the compiler with `args` and wait for it to exit.
    fn execute(&self, args: &[OsString]) -> Result<ToolOutput, DriverError>;
}

/// The Codon compiler installed on this machine.
#[derive(Debug, Clone)]
pub struct Codon {
    program: PathBuf,
}

impl Codon {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for Codon {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER)
    }
}

impl Toolchain for Codon {
    fn program(&self) -> String {
        self.program.display().to_string()
    }

    fn execute(&self, args: &[OsString]) -> Result<ToolOutput, DriverError> {
        log::debug!("Running {} {:?}", self.program.display(), args);
        let output = Command::new(&self.program).args(args).output().map_err(|err| {
            match err.kind() {
                io::ErrorKind::NotFound => DriverError::ToolchainNotFound { program: self.program() },
                _ => DriverError::Io { path: self.program.clone(), source: err },
            }
        })?;
        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Check that the compiler can be run, returning its version banner.
pub fn probe(toolchain: &dyn Toolchain) -> Result<String, DriverError> {
    let output = toolchain.execute(&["--version".into()])?;
    if !output.success() {
        return Err(DriverError::ToolchainUnusable {
            program: toolchain.program(),
            status: output.status_text(),
        });
    }
    let version = output.stdout.trim().to_string();
    log::info!("Using {} {version}", toolchain.program());
    Ok(version)
}

/// `codon build [-release] -o <binary> <generated>`
pub fn compile(
    toolchain: &dyn Toolchain,
    generated: &Path,
    binary: &Path,
    release: bool,
) -> Result<ToolOutput, DriverError> {
    let mut args: Vec<OsString> = vec!["build".into()];
    if release {
        args.push("-release".into());
    }
    args.extend(["-o".into(), binary.into(), generated.into()]);
    log::info!("Compiling {} to {}", generated.display(), binary.display());
    toolchain.execute(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_reported_as_not_found() {
        let codon = Codon::new("turbox-test-no-such-compiler");
        let err = probe(&codon).unwrap_err();
        assert!(matches!(err, DriverError::ToolchainNotFound { ref program } if program == "turbox-test-no-such-compiler"));
    }

    #[test]
    fn status_text() {
        let ok = ToolOutput { status: Some(0), ..ToolOutput::default() };
        assert!(ok.success());
        assert_eq!(ToolOutput { status: Some(2), ..ok.clone() }.status_text(), "exit code 2");
        assert_eq!(ToolOutput { status: None, ..ok }.status_text(), "a signal");
    }
}
