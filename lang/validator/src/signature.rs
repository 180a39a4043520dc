use turbox_lang_ast::*;
use turbox_lang_miette_util::ToMiette;

use crate::result::{ContractError, ContractWarning, Validation};

/// Check that a handler is declared as `def handler(request: Request) -> str`.
///
/// A wrong parameter count is reported once and suppresses the annotation checks.
pub fn check(def: &FunctionDef, validation: &mut Validation) {
    let handler = def.name.to_string();
    let params = &def.params;
    let single_positional = params.len() == 1
        && params.vararg.is_none()
        && params.kwonly.is_empty()
        && params.kwarg.is_none();
    let Some(param) = params.iter().next().filter(|_| single_positional) else {
        validation.error(ContractError::Arity {
            handler,
            found: params.len(),
            span: def.name.span.to_miette(),
        });
        return;
    };

    match &param.annotation {
        None => validation.warn(ContractWarning::MissingParamAnnotation {
            handler: handler.clone(),
            param: param.name.to_string(),
            span: param.span.to_miette(),
        }),
        Some(annotation) if !is_request_type(annotation) => {
            validation.error(ContractError::ParamType {
                handler: handler.clone(),
                found: annotation_text(annotation),
                span: annotation.span().to_miette(),
            })
        }
        Some(_) => {}
    }

    match &def.returns {
        None => validation.warn(ContractWarning::MissingReturnAnnotation {
            handler,
            span: def.name.span.to_miette(),
        }),
        Some(returns) if !is_str_type(returns) => validation.error(ContractError::ReturnType {
            handler,
            found: annotation_text(returns),
            span: returns.span().to_miette(),
        }),
        Some(_) => {}
    }
}

/// `Request`, `module.Request` or the forward reference `"Request"`.
pub fn is_request_type(annotation: &Expr) -> bool {
    match annotation {
        Expr::Name(name) => name.as_str() == "Request",
        Expr::Attribute(Attribute { value, attr, .. }) => {
            attr.as_str() == "Request" && matches!(value.as_ref(), Expr::Name(_))
        }
        other => other.as_str_literal() == Some("Request"),
    }
}

fn is_str_type(annotation: &Expr) -> bool {
    match annotation {
        Expr::Name(name) => name.as_str() == "str",
        other => other.as_str_literal() == Some("str"),
    }
}

/// How an annotation is named in messages; forward references are shown unquoted.
fn annotation_text(annotation: &Expr) -> String {
    match annotation.as_str_literal() {
        Some(text) => text.to_string(),
        None => annotation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_ast::*;
    use turbox_lang_parser::parse_module;

    use super::check;
    use crate::result::{ContractError, ContractWarning, Validation};

    fn check_def(src: &str) -> Validation {
        let module = parse_module(src).unwrap();
        let Stmt::FunctionDef(def) = &module.body[0] else { panic!("expected a function") };
        let mut validation = Validation::default();
        check(def, &mut validation);
        validation
    }

    #[test]
    fn well_formed_signature() {
        assert!(check_def("def h(request: Request) -> str: pass\n").is_clean());
        assert!(check_def("def h(req: turbox.Request) -> 'str': pass\n").is_clean());
        assert!(check_def("def h(req: 'Request', /) -> str: pass\n").is_clean());
    }

    #[test]
    fn wrong_parameter_count_is_a_single_error() {
        for src in [
            "def h(a: int, b: int) -> int: pass\n",
            "def h() -> str: pass\n",
            "def h(request: Request, *rest) -> str: pass\n",
            "def h(*, request: Request) -> str: pass\n",
            "def h(**kw): pass\n",
        ] {
            let validation = check_def(src);
            assert_eq!(validation.errors.len(), 1, "{src}");
            assert!(matches!(validation.errors[0], ContractError::Arity { .. }), "{src}");
            assert!(validation.warnings.is_empty(), "{src}");
        }
    }

    #[test]
    fn wrong_annotations_are_errors() {
        let validation = check_def("def h(request: dict) -> int: pass\n");
        assert_eq!(
            validation.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec![
                "Handler 'h' parameter must be of type 'Request', got 'dict'",
                "Handler 'h' must return 'str', got 'int'",
            ]
        );
    }

    #[test]
    fn missing_annotations_are_warnings() {
        let validation = check_def("def h(request): pass\n");
        assert!(validation.errors.is_empty());
        assert!(matches!(
            validation.warnings.as_slice(),
            [ContractWarning::MissingParamAnnotation { .. }, ContractWarning::MissingReturnAnnotation { .. }]
        ));
    }
}
