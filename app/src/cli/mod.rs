use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::Report;
use turbox_lang_driver::{Outcome, render_reports_io};

use crate::global_settings::GlobalSettings;

mod build;
mod check;
mod gen_completions;
mod run;

pub fn exec(settings: &GlobalSettings) -> ExitCode {
    use Command::*;
    let cli = Cli::parse();
    let result = match cli.command {
        Build(args) => build::exec(args, settings),
        Check(args) => check::exec(args, settings),
        Run(args) => run::exec(args, settings),
        GenerateCompletion(args) => gen_completions::exec(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(reports) => {
            print_reports(&reports, settings);
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[clap(version, author, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile an application to a native binary
    Build(build::Args),
    /// Extract and validate the routes of an application without compiling it
    Check(check::Args),
    /// Compile an application and start the server
    Run(run::Args),
    /// Generate completion scripts for various shells
    GenerateCompletion(gen_completions::Args),
}

/// Print what a pipeline run found before its result is handled.
fn report_progress<T>(outcome: &Outcome<T>, settings: &GlobalSettings) {
    if !outcome.routes.is_empty() {
        println!("Found {} route(s):", outcome.routes.len());
        for route in &outcome.routes {
            println!("  {route}");
        }
    }
    print_reports(&outcome.warnings, settings);

    // The compiler's own diagnostics are passed through unchanged.
    if let Some(output) = &outcome.compiler_output {
        print!("{}", output.stdout);
        eprint!("{}", output.stderr);
    }
}

fn print_reports(reports: &[Report], settings: &GlobalSettings) {
    if reports.is_empty() {
        return;
    }
    let mut stderr = io::stderr().lock();
    if let Err(err) = render_reports_io(&mut stderr, reports, settings.colorize) {
        log::error!("Failed to print diagnostics: {err}");
    }
    if let Err(err) = stderr.flush() {
        log::error!("Failed to flush diagnostics: {err}");
    }
}
