use std::path::PathBuf;

use turbox_lang_backend::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
use turbox_lang_driver::{Artifacts, BuildConfig};

use crate::global_settings::GlobalSettings;

/// Where the generated server listens.
#[derive(clap::Args)]
pub struct ServerArgs {
    /// Address the server binds to
    #[clap(long, default_value = DEFAULT_HOST)]
    host: String,
    /// Port the server listens on
    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        ServerConfig { host: args.host, port: args.port }
    }
}

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// Binary to produce, defaults to FILE without its extension
    #[clap(value_parser, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    #[clap(flatten)]
    server: ServerArgs,
    /// Compile with optimizations
    #[clap(long)]
    release: bool,
    /// Only write the generated Codon program
    #[clap(long)]
    emit_only: bool,
    /// Codon compiler to use
    #[clap(long, value_name = "PATH")]
    codon: Option<PathBuf>,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> Result<(), Vec<miette::Report>> {
    let config = BuildConfig {
        output: cmd.output,
        server: cmd.server.into(),
        release: cmd.release,
        emit_only: cmd.emit_only,
    };
    let artifacts = compile(&cmd.filepath, &config, cmd.codon, settings)?;
    match artifacts.binary {
        Some(binary) => println!("Successfully built: {}", binary.display()),
        None => println!("Generated: {}", artifacts.generated.display()),
    }
    Ok(())
}

/// Run the build pipeline, printing its progress, and hand back what it produced.
pub fn compile(
    filepath: &std::path::Path,
    config: &BuildConfig,
    codon: Option<PathBuf>,
    settings: &GlobalSettings,
) -> Result<Artifacts, Vec<miette::Report>> {
    let toolchain = settings.compiler(codon);
    let outcome = turbox_lang_driver::build(filepath, config, &toolchain);
    super::report_progress(&outcome, settings);
    outcome.result
}
