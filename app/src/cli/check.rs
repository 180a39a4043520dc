use std::path::PathBuf;

use crate::global_settings::GlobalSettings;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> Result<(), Vec<miette::Report>> {
    let outcome = turbox_lang_driver::check(&cmd.filepath);
    super::report_progress(&outcome, settings);
    outcome.result?;
    if outcome.warnings.is_empty() {
        println!("{} passed validation", cmd.filepath.display());
    } else {
        println!("{} passed validation with {} warning(s)", cmd.filepath.display(), outcome.warnings.len());
    }
    Ok(())
}
