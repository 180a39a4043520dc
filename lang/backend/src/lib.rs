//! Generation of the Codon program for a validated application.
//!
//! The program is the runtime followed by the transliterated handlers, the
//! application bootstrap, the route registrations and the call to `app.run()`.

mod body;
mod program;
mod quote;
mod result;
mod routes;

pub use body::{HandlerFunction, ReturnShape, TemplatePart};
pub use program::{DEFAULT_HOST, DEFAULT_PORT, GeneratedProgram, RUNTIME, ServerConfig, generate};
pub use quote::quote_str;
pub use result::*;
pub use routes::{Registration, RouteKey, RouteTable, registrations};
