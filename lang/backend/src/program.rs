use std::fmt;

use askama::Template;
use turbox_lang_ast::FunctionDef;
use turbox_lang_extractor::RouteDecl;
use turbox_lang_miette_util::ToMiette;

use crate::body::HandlerFunction;
use crate::quote::quote_str;
use crate::result::{BackendError, BackendResult};
use crate::routes::{Registration, RouteTable, registrations};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// The server runtime every generated program starts with.
pub const RUNTIME: &str = include_str!("../runtime/nucleus.codon");

/// Top-level names of the runtime and the generated bootstrap which handlers must not shadow.
const RESERVED_NAMES: &[&str] = &[
    "app",
    "TurboX",
    "Request",
    "sockaddr_in",
    "hex_value",
    "percent_decode",
    "parse_query_string",
    "parse_request",
    "status_message",
    "build_response",
    "socket",
    "setsockopt",
    "bind",
    "listen",
    "accept",
    "recv",
    "send",
    "close",
    "htons",
    "inet_addr",
    "perror",
    "AF_INET",
    "SOCK_STREAM",
    "SOL_SOCKET",
    "SO_REUSEADDR",
    "RECV_BUFFER_SIZE",
    "CRLF",
];

/// Where the generated server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT }
    }
}

#[derive(Template)]
#[template(path = "program.codon", escape = "none")]
struct ProgramTemplate<'a> {
    source: &'a str,
    runtime: &'a str,
    handlers: &'a [HandlerFunction],
    host: String,
    port: u16,
    registrations: &'a [Registration],
}

/// A complete Codon program, ready to be written out and compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    text: String,
    handlers: Vec<HandlerFunction>,
    routes: RouteTable,
}

impl GeneratedProgram {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn handlers(&self) -> &[HandlerFunction] {
        &self.handlers
    }

    /// The registrations that are active when the program runs.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

impl fmt::Display for GeneratedProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Generate the program serving `routes`.
///
/// `source` names the input file in the header comment. Handlers are emitted
/// once each, in extraction order, followed by one registration per route and method.
pub fn generate(
    routes: &[RouteDecl<'_>],
    source: &str,
    config: &ServerConfig,
) -> BackendResult<GeneratedProgram> {
    let mut defs: Vec<&FunctionDef> = Vec::new();
    for route in routes {
        if !defs.iter().any(|def| std::ptr::eq(*def, route.handler)) {
            defs.push(route.handler);
        }
    }
    if let Some(def) = defs.iter().find(|def| RESERVED_NAMES.contains(&def.name.as_str())) {
        return Err(BackendError::ReservedName {
            name: def.name.to_string(),
            span: def.name.span.to_miette(),
        });
    }
    // A later `def` of the same name would shadow the earlier handler in the generated program.
    for (i, def) in defs.iter().enumerate() {
        if let Some(first) = defs[..i].iter().find(|other| other.name == def.name) {
            return Err(BackendError::DuplicateHandler {
                name: def.name.to_string(),
                span: def.name.span.to_miette(),
                first: first.name.span.to_miette(),
            });
        }
    }

    let handlers: Vec<HandlerFunction> =
        defs.into_iter().map(HandlerFunction::transliterate).collect();
    let registrations = registrations(routes);
    let template = ProgramTemplate {
        source,
        runtime: RUNTIME.trim_end(),
        handlers: &handlers,
        host: quote_str(&config.host),
        port: config.port,
        registrations: &registrations,
    };
    let mut text = template.render()?;
    if !text.ends_with('\n') {
        text.push('\n');
    }

    let routes = RouteTable::from_registrations(&registrations);
    log::debug!(
        "Generated {} handler(s) and {} registration(s) for {} active route(s)",
        handlers.len(),
        registrations.len(),
        routes.len()
    );
    Ok(GeneratedProgram { text, handlers, routes })
}
