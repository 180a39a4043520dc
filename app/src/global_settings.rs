use std::path::PathBuf;
use std::{env, str::FromStr};

use termcolor::ColorChoice;
use turbox_lang_driver::{Codon, DEFAULT_COMPILER};

#[derive(Debug, Clone)]
pub struct GlobalSettings {
    pub colorize: ColorChoice,
    pub log_level: log::LevelFilter,
    /// Compiler program set through the environment
    pub codon: Option<PathBuf>,
}

impl GlobalSettings {
    pub fn from_env() -> Self {
        let colorize = env::var("TURBOX_COLORIZE")
            .ok()
            .and_then(|var| ColorChoice::from_str(&var).ok())
            .unwrap_or(ColorChoice::Auto);

        let log_level = env::var("TURBOX_LOG_LEVEL")
            .ok()
            .and_then(|var| log::LevelFilter::from_str(&var.to_uppercase()).ok())
            .unwrap_or(log::LevelFilter::Warn);

        let codon = env::var_os("TURBOX_CODON").filter(|var| !var.is_empty()).map(PathBuf::from);

        Self { colorize, log_level, codon }
    }

    /// The compiler to use, a path given on the command line wins over the environment.
    pub fn compiler(&self, flag: Option<PathBuf>) -> Codon {
        match flag.or_else(|| self.codon.clone()) {
            Some(program) => Codon::new(program),
            None => Codon::new(DEFAULT_COMPILER),
        }
    }
}
