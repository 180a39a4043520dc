//! The build coordinator: parse, extract, validate, generate and compile, in that order.
//!
//! Every entry point returns an [Outcome] instead of failing early, so that
//! the caller can show the routes and warnings found so far next to the error
//! that stopped the build.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Report;
use turbox_lang_ast::Module;
use turbox_lang_backend::{ServerConfig, generate};
use turbox_lang_extractor::{Method, RouteDecl, extract};
use turbox_lang_validator::{ContractWarning, validate};

use crate::codespan::Location;
use crate::paths::{default_binary_path, generated_path};
use crate::result::{DriverError, MainError, MainErrors, MainResult};
use crate::session::Session;
use crate::toolchain::{self, ToolOutput, Toolchain};

/// Options of a single `build` invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Binary to produce, defaults to the input path without its extension
    pub output: Option<PathBuf>,
    pub server: ServerConfig,
    /// Pass `-release` to the compiler
    pub release: bool,
    /// Write the generated program but do not compile it
    pub emit_only: bool,
}

/// An extracted route, detached from the syntax tree for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub methods: Vec<Method>,
    pub path: String,
    pub handler: String,
    /// Position of the routing decorator
    pub location: Option<Location>,
}

impl RouteSummary {
    fn new(session: &Session, route: &RouteDecl<'_>) -> Self {
        RouteSummary {
            methods: route.methods.clone(),
            path: route.path.clone(),
            handler: route.handler_name().to_string(),
            location: session.location(route.span),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<&str> = self.methods.iter().map(|method| method.as_str()).collect();
        write!(f, "[{}] {} -> {}", methods.join(", "), self.path, self.handler)?;
        if let Some(location) = self.location {
            write!(f, " (line {})", location.line)?;
        }
        Ok(())
    }
}

/// Files produced by a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub generated: PathBuf,
    /// `None` when only the program was emitted
    pub binary: Option<PathBuf>,
}

/// Everything a build or check learned, whether it succeeded or not.
#[derive(Debug)]
pub struct Outcome<T> {
    pub routes: Vec<RouteSummary>,
    pub warnings: Vec<Report>,
    /// Captured output of the compile step, if it ran
    pub compiler_output: Option<ToolOutput>,
    pub result: Result<T, Vec<Report>>,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parse, extract and validate `path` without generating anything.
pub fn check(path: &Path) -> Outcome<()> {
    let mut pipeline = Pipeline::default();
    let session = match Session::load(path) {
        Ok(session) => session,
        Err(err) => return pipeline.finish(None, Err(err.into())),
    };
    let module = match session.parse() {
        Ok(module) => module,
        Err(err) => return pipeline.finish(Some(&session), Err(err.into())),
    };
    let result = pipeline.analyse(&session, &module).map(|_| ());
    pipeline.finish(Some(&session), result)
}

/// Build `path` into a native binary with `toolchain`.
pub fn build(path: &Path, config: &BuildConfig, toolchain: &dyn Toolchain) -> Outcome<Artifacts> {
    let mut pipeline = Pipeline::default();
    let session = match Session::load(path) {
        Ok(session) => session,
        Err(err) => return pipeline.finish(None, Err(err.into())),
    };
    let result = pipeline.build(&session, config, toolchain);
    pipeline.finish(Some(&session), result)
}

/// State collected while the stages run.
#[derive(Default)]
struct Pipeline {
    routes: Vec<RouteSummary>,
    warnings: Vec<ContractWarning>,
    compiler_output: Option<ToolOutput>,
}

impl Pipeline {
    fn analyse<'m>(&mut self, session: &Session, module: &'m Module) -> MainResult<Vec<RouteDecl<'m>>> {
        let extraction = extract(module);
        if extraction.routes.is_empty() {
            return Err(DriverError::NoRoutes(session.path().to_path_buf()).into());
        }
        self.routes = extraction.routes.iter().map(|route| RouteSummary::new(session, route)).collect();

        let validation = validate(module, &extraction.routes);
        self.warnings = validation.warnings;
        if !validation.errors.is_empty() {
            return Err(MainErrors(validation.errors.into_iter().map(MainError::from).collect()));
        }
        Ok(extraction.routes)
    }

    fn build(
        &mut self,
        session: &Session,
        config: &BuildConfig,
        toolchain: &dyn Toolchain,
    ) -> MainResult<Artifacts> {
        if !config.emit_only {
            toolchain::probe(toolchain)?;
        }
        let module = session.parse()?;
        let routes = self.analyse(session, &module)?;

        let program = generate(&routes, &session.name(), &config.server)?;
        let generated = generated_path(session.path());
        std::fs::write(&generated, program.as_str())
            .map_err(|source| DriverError::Io { path: generated.clone(), source })?;
        log::info!("Wrote {}", generated.display());

        if config.emit_only {
            return Ok(Artifacts { generated, binary: None });
        }

        let binary = config.output.clone().unwrap_or_else(|| default_binary_path(session.path()));
        let output = toolchain::compile(toolchain, &generated, &binary, config.release)?;
        let (success, status) = (output.success(), output.status_text());
        self.compiler_output = Some(output);
        if !success {
            return Err(DriverError::CompilationFailed { program: toolchain.program(), status }.into());
        }
        log::info!("Built {}", binary.display());
        Ok(Artifacts { generated, binary: Some(binary) })
    }

    fn finish<T>(self, session: Option<&Session>, result: MainResult<T>) -> Outcome<T> {
        let render = |err: MainError| match session {
            Some(session) => session.pretty_error(err),
            None => Report::new(err),
        };
        let warnings = self
            .warnings
            .into_iter()
            .map(|warning| match session {
                Some(session) => session.pretty_error(warning),
                None => Report::new(warning),
            })
            .collect();
        Outcome {
            routes: self.routes,
            warnings,
            compiler_output: self.compiler_output,
            result: result.map_err(|errs| errs.0.into_iter().map(render).collect()),
        }
    }
}
