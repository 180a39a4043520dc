use std::io;

use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Elvish, Fish, PowerShell, Zsh},
};

use super::Cli;

const BINARY: &str = "turbox";

#[allow(clippy::enum_variant_names)]
#[derive(clap::ValueEnum, Clone)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    PowerShell,
    Zsh,
}

#[derive(clap::Args)]
pub struct Args {
    /// Target shell
    shell: Shell,
}

pub fn exec(cmd: Args) -> Result<(), Vec<miette::Report>> {
    let mut command = Cli::command();
    let mut stdout = io::stdout();
    match cmd.shell {
        Shell::Bash => generate(Bash, &mut command, BINARY, &mut stdout),
        Shell::Elvish => generate(Elvish, &mut command, BINARY, &mut stdout),
        Shell::Fish => generate(Fish, &mut command, BINARY, &mut stdout),
        Shell::PowerShell => generate(PowerShell, &mut command, BINARY, &mut stdout),
        Shell::Zsh => generate(Zsh, &mut command, BINARY, &mut stdout),
    }
    Ok(())
}
