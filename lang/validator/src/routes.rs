use turbox_lang_ast::*;
use turbox_lang_extractor::{MethodsSpec, match_route_decorator, resolve, traverse};
use turbox_lang_miette_util::ToMiette;

use crate::result::{ContractWarning, Validation};

/// Re-scan every routing decorator of the application and report the ones the
/// extractor had to drop or could only partially understand.
pub fn check(module: &Module, validation: &mut Validation) {
    traverse(module, |def, state| {
        for decorator in &def.decorators {
            let Some(route) = match_route_decorator(decorator) else { continue };
            if !state.is_app(route.object) {
                continue;
            }
            let handler = def.name.to_string();

            if route.path.and_then(|path| resolve(path, &state.constants)).is_none() {
                let span = route.path.map_or(decorator.span, |path| path.span());
                validation.warn(ContractWarning::DynamicRoute {
                    handler: handler.clone(),
                    span: span.to_miette(),
                });
            }

            match &route.methods {
                MethodsSpec::Listed { ignored, .. } => {
                    for element in ignored {
                        validation.warn(ContractWarning::IgnoredRouteMethod {
                            handler: handler.clone(),
                            element: element.to_string(),
                            span: element.span().to_miette(),
                        });
                    }
                }
                MethodsSpec::Dynamic(expr) => {
                    validation.warn(ContractWarning::DynamicRouteMethods {
                        handler: handler.clone(),
                        span: expr.span().to_miette(),
                    });
                }
                MethodsSpec::Absent => {}
            }

            if route.methods().is_empty() {
                validation.warn(ContractWarning::NoRouteMethod {
                    handler,
                    span: decorator.span.to_miette(),
                });
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use turbox_lang_parser::parse_module;

    use super::check;
    use crate::result::{ContractWarning, Validation};

    fn scan(src: &str) -> Vec<ContractWarning> {
        let mut validation = Validation::default();
        check(&parse_module(src).unwrap(), &mut validation);
        assert!(validation.errors.is_empty());
        validation.warnings
    }

    #[test]
    fn dynamic_path_is_reported_by_handler_name() {
        let src = "app = TurboX()\n@app.get(get_path())\ndef dyn(r): return 'a'\n@app.get('/ok')\ndef ok(r): return 'b'\n";
        let warnings = scan(src);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "Route of handler 'dyn' has a path that cannot be resolved at build time"
        );
    }

    #[test]
    fn resolvable_paths_are_not_reported() {
        let src = "API = '/api'\n@app.get(API + '/a')\ndef a(r): pass\n@app.post(f'{API}/b')\ndef b(r): pass\n";
        assert!(scan(src).is_empty());
    }

    #[test]
    fn decorators_of_other_objects_are_not_reported() {
        let src = "app = TurboX()\n@cache.get(key())\ndef a(r): pass\n";
        assert!(scan(src).is_empty());
    }

    #[test]
    fn method_problems() {
        let src = "\
@app.route('/a', methods=['TRACE'])
def a(r): pass
@app.route('/b', methods=VERBS)
def b(r): pass
";
        let warnings = scan(src);
        assert!(matches!(
            warnings.as_slice(),
            [
                ContractWarning::IgnoredRouteMethod { .. },
                ContractWarning::NoRouteMethod { .. },
                ContractWarning::DynamicRouteMethods { .. },
            ]
        ));
    }
}
