//! Contract checks run on an application before any code is generated.
//!
//! All checks run to completion; findings are collected as values in a
//! [Validation] and it is up to the caller to stop when errors were found.

mod features;
mod imports;
mod result;
mod returns;
mod routes;
mod signature;

use turbox_lang_ast::{FunctionDef, Module};
use turbox_lang_extractor::RouteDecl;

pub use result::*;
pub use signature::is_request_type;

/// Validate the extracted routes and the module they were extracted from.
pub fn validate(module: &Module, routes: &[RouteDecl<'_>]) -> Validation {
    let handlers = unique_handlers(routes);
    let mut validation = Validation::default();

    for def in &handlers {
        signature::check(def, &mut validation);
    }
    for def in &handlers {
        returns::check(def, &mut validation);
    }
    features::check(module, &mut validation);
    imports::check(module, &handlers, &mut validation);
    routes::check(module, &mut validation);

    log::debug!(
        "Validation found {} error(s) and {} warning(s)",
        validation.errors.len(),
        validation.warnings.len()
    );
    validation
}

/// Handlers in route order, each once even if it carries several routing decorators.
fn unique_handlers<'a>(routes: &[RouteDecl<'a>]) -> Vec<&'a FunctionDef> {
    let mut handlers: Vec<&'a FunctionDef> = Vec::new();
    for route in routes {
        if !handlers.iter().any(|def| std::ptr::eq(*def, route.handler)) {
            handlers.push(route.handler);
        }
    }
    handlers
}

#[cfg(test)]
mod tests {
    use turbox_lang_extractor::extract;
    use turbox_lang_parser::parse_module;

    use super::*;

    fn validate_src(src: &str) -> Validation {
        let module = parse_module(src).unwrap();
        let extraction = extract(&module);
        validate(&module, &extraction.routes)
    }

    #[test]
    fn valid_application_is_clean() {
        let src = r#"
from turbox import TurboX, Request

app = TurboX()

@app.route("/hello")
def hello(request: Request) -> str:
    return "Hello, World!"
"#;
        assert_eq!(validate_src(src), Validation::default());
    }

    #[test]
    fn two_parameters_give_exactly_one_signature_error() {
        let src = r#"
from turbox import TurboX, Request
app = TurboX()
@app.get("/a")
@app.post("/a")
def handler(request: Request, extra: int) -> str:
    return "a"
"#;
        let validation = validate_src(src);
        assert_eq!(validation.errors.len(), 1);
        assert!(matches!(validation.errors[0], ContractError::Arity { found: 2, .. }));
    }

    #[test]
    fn wrong_return_type_and_value() {
        let src = r#"
from turbox import TurboX, Request
app = TurboX()
@app.route("/age")
def get_age(request: Request) -> int:
    return 25
"#;
        let messages: Vec<_> = validate_src(src).errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Handler 'get_age' must return 'str', got 'int'",
                "Handler 'get_age' returns non-string value: int",
            ]
        );
    }

    #[test]
    fn unsupported_import_blocks_the_build() {
        let src = r#"
from turbox import TurboX
import json
app = TurboX()
@app.route("/data")
def get_data(request):
    return json.dumps({"key": "value"})
"#;
        let validation = validate_src(src);
        assert!(validation.has_errors());
        assert!(validation.errors.iter().any(|e| e.to_string().contains("json")));
        assert_eq!(validation.warnings.len(), 2);
    }

    #[test]
    fn checks_only_cover_extracted_handlers() {
        let src = r#"
from turbox import TurboX, Request
app = TurboX()
def helper(a, b):
    pass
@app.get(compute())
def dynamic(request: Request) -> str:
    pass
"#;
        let validation = validate_src(src);
        assert!(validation.errors.is_empty());
        assert!(matches!(validation.warnings.as_slice(), [ContractWarning::DynamicRoute { .. }]));
    }
}
