use std::path::{Path, PathBuf};
use std::process::Command;

use turbox_lang_driver::BuildConfig;

use super::build::{ServerArgs, compile};
use crate::global_settings::GlobalSettings;
use crate::result::AppError;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    #[clap(flatten)]
    server: ServerArgs,
    /// Compile with optimizations
    #[clap(long)]
    release: bool,
    /// Codon compiler to use
    #[clap(long, value_name = "PATH")]
    codon: Option<PathBuf>,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> Result<(), Vec<miette::Report>> {
    let config = BuildConfig { server: cmd.server.into(), release: cmd.release, ..BuildConfig::default() };
    let artifacts = compile(&cmd.filepath, &config, cmd.codon, settings)?;
    let Some(binary) = artifacts.binary else {
        return Ok(());
    };
    println!("Starting {}", binary.display());
    serve(&binary).map_err(|err| vec![err.into()])
}

/// Run the server in the foreground until it exits.
fn serve(binary: &Path) -> Result<(), AppError> {
    // A bare file name would otherwise be looked up on PATH.
    let program = if binary.is_relative() { Path::new(".").join(binary) } else { binary.to_path_buf() };
    let status = Command::new(&program)
        .status()
        .map_err(|source| AppError::Spawn { binary: binary.to_path_buf(), source })?;
    if !status.success() {
        let status = match status.code() {
            Some(code) => format!("exit code {code}"),
            None => "a signal".to_string(),
        };
        return Err(AppError::BinaryFailed { binary: binary.to_path_buf(), status });
    }
    Ok(())
}
