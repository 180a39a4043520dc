use turbox_lang_ast::*;
use turbox_lang_miette_util::ToMiette;

use crate::result::{ContractWarning, Validation};

const FRAMEWORK_MODULE: &str = "turbox";

/// Warn when the framework, or its `Request` type used by a handler, is not imported.
pub fn check(module: &Module, handlers: &[&FunctionDef], validation: &mut Validation) {
    let mut scan = ImportScan::default();
    module.visit(&mut scan);

    if !scan.framework {
        validation.warn(ContractWarning::MissingFrameworkImport);
    }
    if scan.request {
        return;
    }
    for def in handlers {
        let annotation = def.params.iter().next().and_then(|param| param.annotation.as_ref());
        if let Some(annotation @ Expr::Name(name)) = annotation {
            if name.as_str() == "Request" {
                validation.warn(ContractWarning::RequestNotImported {
                    span: annotation.span().to_miette(),
                });
            }
        }
    }
}

fn is_framework_module(dotted: &str) -> bool {
    dotted == FRAMEWORK_MODULE
        || dotted.strip_prefix(FRAMEWORK_MODULE).is_some_and(|rest| rest.starts_with('.'))
}

#[derive(Default)]
struct ImportScan {
    framework: bool,
    request: bool,
}

impl Visitor for ImportScan {
    fn visit_import(&mut self, import: &Import) {
        if import.names.iter().any(|alias| is_framework_module(&alias.name)) {
            self.framework = true;
        }
    }

    fn visit_import_from(&mut self, import: &ImportFrom) {
        let Some(module) = import.module.as_deref() else { return };
        if import.level > 0 || !is_framework_module(module) {
            return;
        }
        self.framework = true;
        if import.names.iter().any(|alias| alias.name == "Request") {
            self.request = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_ast::*;
    use turbox_lang_parser::parse_module;

    use super::check;
    use crate::result::{ContractWarning, Validation};

    fn scan(src: &str) -> Vec<ContractWarning> {
        let module = parse_module(src).unwrap();
        let handlers: Vec<&FunctionDef> = module
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::FunctionDef(def) => Some(def),
                _ => None,
            })
            .collect();
        let mut validation = Validation::default();
        check(&module, &handlers, &mut validation);
        validation.warnings
    }

    #[test]
    fn framework_and_request_imported() {
        assert!(scan("from turbox import TurboX, Request\ndef h(r: Request): pass\n").is_empty());
        assert!(scan("import turbox\ndef h(r: turbox.Request): pass\n").is_empty());
    }

    #[test]
    fn missing_framework_import() {
        let warnings = scan("app = TurboX()\n");
        assert!(matches!(warnings.as_slice(), [ContractWarning::MissingFrameworkImport]));
    }

    #[test]
    fn request_used_but_not_imported() {
        let warnings = scan("from turbox import TurboX\ndef a(r: Request): pass\ndef b(r: str): pass\n");
        assert!(matches!(warnings.as_slice(), [ContractWarning::RequestNotImported { .. }]));
    }
}
