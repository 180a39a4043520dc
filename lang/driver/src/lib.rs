mod build;
mod codespan;
pub mod paths;
mod render_reports;
mod result;
mod session;
pub mod toolchain;

pub use build::{Artifacts, BuildConfig, Outcome, RouteSummary, build, check};
pub use codespan::Location;
pub use paths::*;
pub use render_reports::*;
pub use result::*;
pub use session::Session;
pub use toolchain::{Codon, DEFAULT_COMPILER, ToolOutput, Toolchain};
