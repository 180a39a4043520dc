use turbox_lang_ast::*;
use turbox_lang_miette_util::codespan::Span;

use crate::Method;

/// Name of the application class whose instances carry the routing decorators.
pub const FRAMEWORK_CONSTRUCTOR: &str = "TurboX";

/// Attribute of the generic routing decorator, `app.route(path, methods=[...])`.
const GENERIC_ROUTE: &str = "route";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorKind {
    /// `obj.route(...)`
    Route,
    /// `obj.get(...)`, `obj.post(...)`, ...
    Shorthand(Method),
}

/// The `methods=` argument of a generic routing decorator.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodsSpec<'a> {
    /// No `methods=` argument
    Absent,
    /// A list or tuple display
    Listed {
        /// Recognised methods, upper-cased and without duplicates
        methods: Vec<Method>,
        /// Elements that are not string literals naming a known method
        ignored: Vec<&'a Expr>,
    },
    /// Some other expression, which is treated as absent
    Dynamic(&'a Expr),
}

/// A decorator of the shape `<name>.<route|get|post|...>(...)`.
#[derive(Debug, Clone)]
pub struct RouteDecorator<'a> {
    pub span: Span,
    /// The bare name the decorator is looked up on
    pub object: &'a Ident,
    pub kind: DecoratorKind,
    /// First positional argument
    pub path: Option<&'a Expr>,
    pub methods: MethodsSpec<'a>,
}

impl RouteDecorator<'_> {
    /// The methods this decorator registers its handler for.
    ///
    /// An empty result means the decorator declares no usable method.
    pub fn methods(&self) -> Vec<Method> {
        match (&self.kind, &self.methods) {
            (DecoratorKind::Shorthand(method), _) => vec![*method],
            (DecoratorKind::Route, MethodsSpec::Listed { methods, .. }) => methods.clone(),
            (DecoratorKind::Route, MethodsSpec::Absent | MethodsSpec::Dynamic(_)) => {
                vec![Method::Get]
            }
        }
    }
}

/// Recognise a routing decorator.
///
/// Decorators without a call, on chained attributes (`a.b.get(...)`) or with an
/// unknown attribute name are not routing decorators.
pub fn match_route_decorator(decorator: &Decorator) -> Option<RouteDecorator<'_>> {
    let Expr::Call(call) = &decorator.expr else { return None };
    let Expr::Attribute(Attribute { value, attr, .. }) = call.func.as_ref() else { return None };
    let Expr::Name(object) = value.as_ref() else { return None };

    let kind = if attr.as_str() == GENERIC_ROUTE {
        DecoratorKind::Route
    } else {
        DecoratorKind::Shorthand(Method::from_shorthand(attr.as_str())?)
    };
    let methods = match kind {
        DecoratorKind::Route => methods_spec(call),
        DecoratorKind::Shorthand(_) => MethodsSpec::Absent,
    };
    let path = call.args.first().filter(|arg| !matches!(arg, Expr::Starred(_)));

    Some(RouteDecorator { span: decorator.span, object, kind, path, methods })
}

fn methods_spec(call: &Call) -> MethodsSpec<'_> {
    let Some(keyword) = call.keyword("methods") else { return MethodsSpec::Absent };
    let (Expr::List(seq) | Expr::Tuple(seq)) = &keyword.value else {
        return MethodsSpec::Dynamic(&keyword.value);
    };
    let mut methods = Vec::new();
    let mut ignored = Vec::new();
    for elt in &seq.elts {
        match elt.as_str_literal().and_then(Method::parse) {
            Some(method) if !methods.contains(&method) => methods.push(method),
            Some(_) => {}
            None => ignored.push(elt),
        }
    }
    MethodsSpec::Listed { methods, ignored }
}

/// Whether `expr` constructs the application, e.g. `TurboX()` or `turbox.TurboX(port=80)`.
pub(crate) fn is_framework_constructor(expr: &Expr) -> bool {
    let Expr::Call(call) = expr else { return false };
    match call.func.as_ref() {
        Expr::Name(name) => name.as_str() == FRAMEWORK_CONSTRUCTOR,
        Expr::Attribute(attr) => attr.attr.as_str() == FRAMEWORK_CONSTRUCTOR,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_ast::*;
    use turbox_lang_parser::parse_exp;

    use super::*;

    fn decorator(src: &str) -> Decorator {
        let expr = parse_exp(src).unwrap();
        Decorator { span: expr.span(), expr }
    }

    #[test]
    fn shorthand() {
        let dec = decorator("app.post('/items')");
        let route = match_route_decorator(&dec).unwrap();
        assert_eq!(route.object.as_str(), "app");
        assert_eq!(route.kind, DecoratorKind::Shorthand(Method::Post));
        assert_eq!(route.methods(), vec![Method::Post]);
        assert_eq!(route.path.and_then(Expr::as_str_literal), Some("/items"));
    }

    #[test]
    fn generic_route_defaults_to_get() {
        let dec = decorator("app.route('/')");
        assert_eq!(match_route_decorator(&dec).unwrap().methods(), vec![Method::Get]);
    }

    #[test]
    fn methods_are_normalised() {
        let dec = decorator("app.route('/', methods=['post', 'GET', 'POST', 'TRACE', verb])");
        let route = match_route_decorator(&dec).unwrap();
        assert_eq!(route.methods(), vec![Method::Post, Method::Get]);
        let MethodsSpec::Listed { ignored, .. } = &route.methods else { panic!("expected a list") };
        let ignored: Vec<String> = ignored.iter().map(|e| e.to_string()).collect();
        assert_eq!(ignored, vec!["'TRACE'", "verb"]);
    }

    #[test]
    fn dynamic_methods_fall_back_to_get() {
        let dec = decorator("app.route('/', methods=ALLOWED)");
        let route = match_route_decorator(&dec).unwrap();
        assert!(matches!(route.methods, MethodsSpec::Dynamic(_)));
        assert_eq!(route.methods(), vec![Method::Get]);
    }

    #[test]
    fn only_direct_calls_on_a_name_match() {
        for src in ["app.get", "api.v1.get('/x')", "app.fetch('/x')", "get('/x')", "app().get('/x')"] {
            assert!(match_route_decorator(&decorator(src)).is_none(), "{src}");
        }
    }

    #[test]
    fn missing_path() {
        let dec = decorator("app.get()");
        assert!(match_route_decorator(&dec).unwrap().path.is_none());
    }

    #[test]
    fn framework_constructor() {
        assert!(is_framework_constructor(&parse_exp("TurboX()").unwrap()));
        assert!(is_framework_constructor(&parse_exp("turbox.TurboX(port=80)").unwrap()));
        assert!(!is_framework_constructor(&parse_exp("Flask(__name__)").unwrap()));
        assert!(!is_framework_constructor(&parse_exp("TurboX").unwrap()));
    }
}
