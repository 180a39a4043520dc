use turbox_lang_ast::*;
use turbox_lang_miette_util::codespan::Span;

use crate::{ConstantTable, Method, match_route_decorator, resolve, traverse};

/// A handler together with the statically resolved method set and path it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecl<'a> {
    /// Non-empty, without duplicates
    pub methods: Vec<Method>,
    pub path: String,
    pub handler: &'a FunctionDef,
    /// Location of the routing decorator
    pub span: Span,
}

impl RouteDecl<'_> {
    pub fn handler_name(&self) -> &str {
        self.handler.name.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    /// In source order, one entry per routing decorator
    pub routes: Vec<RouteDecl<'a>>,
    /// Constants in effect at the end of the module
    pub constants: ConstantTable,
    pub app_binding: Option<Ident>,
}

/// Collect the routes of a module.
///
/// Decorators whose path cannot be resolved, that are looked up on something other
/// than the application, or that name no usable method are skipped silently.
pub fn extract(module: &Module) -> Extraction<'_> {
    let mut routes = Vec::new();
    let state = traverse(module, |def, state| {
        for decorator in &def.decorators {
            let Some(route) = match_route_decorator(decorator) else { continue };
            if !state.is_app(route.object) {
                log::trace!("Skipping decorator on '{}', it is not the application", route.object);
                continue;
            }
            let Some(path) = route.path.and_then(|path| resolve(path, &state.constants)) else {
                log::debug!("Dropping route of handler '{}': path is not static", def.name);
                continue;
            };
            let methods = route.methods();
            if methods.is_empty() {
                log::debug!("Dropping route of handler '{}': no HTTP method", def.name);
                continue;
            }
            log::trace!("Route {methods:?} {path} -> {}", def.name);
            routes.push(RouteDecl { methods, path, handler: def, span: decorator.span });
        }
    });
    log::debug!("Extracted {} route(s) and {} constant(s)", routes.len(), state.constants.len());
    Extraction { routes, constants: state.constants, app_binding: state.app_binding }
}

#[cfg(test)]
mod tests {
    use turbox_lang_parser::parse_module;

    use super::*;

    fn routes(src: &str) -> Vec<(Vec<Method>, String, String)> {
        let module = parse_module(src).unwrap();
        extract(&module)
            .routes
            .into_iter()
            .map(|r| (r.methods.clone(), r.path.clone(), r.handler_name().to_string()))
            .collect()
    }

    fn route(methods: &[Method], path: &str, handler: &str) -> (Vec<Method>, String, String) {
        (methods.to_vec(), path.to_string(), handler.to_string())
    }

    #[test]
    fn resolves_constants_and_concatenation() {
        let src = r#"
from turbox import TurboX, Request
app = TurboX()
API = "/api"
@app.get(API + "/users")
def users(request: Request) -> str:
    return "users"
"#;
        assert_eq!(routes(src), vec![route(&[Method::Get], "/api/users", "users")]);
    }

    #[test]
    fn routes_inside_match_cases_are_extracted() {
        let src = r#"
app = TurboX()
API = "/api"
match ENV:
    case "prod":
        @app.get(API + "/health")
        def health(request): return "ok"
    case [API]:
        pass
@app.get(API + "/late")
def late(request): return "late"
"#;
        assert_eq!(routes(src), vec![route(&[Method::Get], "/api/health", "health")]);
    }

    #[test]
    fn dynamic_path_is_dropped_but_siblings_survive() {
        let src = r#"
app = TurboX()
@app.get(get_path())
def dynamic(request): return "a"
@app.get("/static")
def fixed(request): return "b"
"#;
        assert_eq!(routes(src), vec![route(&[Method::Get], "/static", "fixed")]);
    }

    #[test]
    fn imported_names_are_not_constants() {
        let src = r#"
from config import PREFIX
app = TurboX()
@app.get(PREFIX + "/a")
def a(request): return "a"
PREFIX = "/p"
@app.get(PREFIX + "/b")
def b(request): return "b"
"#;
        assert_eq!(routes(src), vec![route(&[Method::Get], "/p/b", "b")]);
    }

    #[test]
    fn reassignment_is_last_write_wins() {
        let src = r#"
X = "/a"
X = "/b"
@app.get(X)
def h(request): return "h"
"#;
        assert_eq!(routes(src), vec![route(&[Method::Get], "/b", "h")]);
    }

    #[test]
    fn methods_of_generic_route() {
        let src = r#"
@app.route("/items", methods=["get", "post"])
def items(request): return "i"
@app.route("/none", methods=["TRACE"])
def none(request): return "n"
@app.route("/default")
def default(request): return "d"
"#;
        assert_eq!(
            routes(src),
            vec![
                route(&[Method::Get, Method::Post], "/items", "items"),
                route(&[Method::Get], "/default", "default"),
            ]
        );
    }

    #[test]
    fn decorators_on_other_objects_are_ignored() {
        let src = r#"
app = TurboX()
@other.get("/x")
@app.get("/y")
@app.get
@app.api.get("/z")
def h(request): return "h"
"#;
        assert_eq!(routes(src), vec![route(&[Method::Get], "/y", "h")]);
    }

    #[test]
    fn without_application_binding_any_object_is_accepted() {
        let src = "@server.put('/x')\ndef h(request): return 'h'\n";
        assert_eq!(routes(src), vec![route(&[Method::Put], "/x", "h")]);
    }

    #[test]
    fn duplicate_routes_are_all_extracted() {
        let src = "@app.get('/x')\ndef a(request): return 'a'\n@app.get('/x')\ndef b(request): return 'b'\n";
        assert_eq!(routes(src).len(), 2);
    }

    #[test]
    fn extraction_reports_bindings() {
        let module = parse_module("API = '/api'\nweb = TurboX()\n").unwrap();
        let extraction = extract(&module);
        assert!(extraction.routes.is_empty());
        assert_eq!(extraction.constants.get("API"), Some("/api"));
        assert_eq!(extraction.app_binding.map(|app| app.id), Some("web".to_string()));
    }
}
