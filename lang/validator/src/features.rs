use turbox_lang_ast::*;
use turbox_lang_miette_util::ToMiette;
use turbox_lang_miette_util::codespan::Span;

use crate::result::{ContractError, ContractWarning, Validation};

/// Modules whose capabilities are not available in a compiled TurboX binary.
const UNSUPPORTED_MODULES: &[(&str, &str)] = &[
    ("json", "JSON module not available in Codon"),
    ("requests", "HTTP client not available in Codon"),
    ("asyncio", "Async/await not supported"),
    ("threading", "Threading module not available"),
    ("multiprocessing", "Multiprocessing not available"),
    ("concurrent", "Thread and process pools not available"),
    ("pickle", "Dynamic serialization not available in Codon"),
    ("socket", "Networking is provided by the TurboX runtime"),
];

/// Flag language features and imports anywhere in the module that cannot be compiled.
pub fn check(module: &Module, validation: &mut Validation) {
    module.visit(&mut FeatureScan { validation });
}

struct FeatureScan<'v> {
    validation: &'v mut Validation,
}

impl FeatureScan<'_> {
    fn check_module(&mut self, dotted: &str, span: Span) {
        let top = dotted.split('.').next().unwrap_or(dotted);
        if let Some((module, reason)) = UNSUPPORTED_MODULES.iter().find(|(name, _)| *name == top) {
            self.validation.error(ContractError::UnsupportedImport {
                module: module.to_string(),
                reason: reason.to_string(),
                span: span.to_miette(),
            });
        }
    }
}

impl Visitor for FeatureScan<'_> {
    fn visit_import(&mut self, import: &Import) {
        for alias in &import.names {
            self.check_module(&alias.name, alias.span);
        }
    }

    fn visit_import_from(&mut self, import: &ImportFrom) {
        if import.level > 0 {
            return;
        }
        if let Some(module) = &import.module {
            self.check_module(module, import.span);
        }
    }

    fn visit_function_def(&mut self, def: &FunctionDef) {
        if def.is_async {
            self.validation.error(ContractError::AsyncFunction {
                name: def.name.to_string(),
                span: def.name.span.to_miette(),
            });
        }
    }

    fn visit_lambda(&mut self, lambda: &Lambda) {
        self.validation.warn(ContractWarning::Lambda { span: lambda.span.to_miette() });
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_parser::parse_module;

    use super::check;
    use crate::result::{ContractWarning, Validation};

    fn scan(src: &str) -> Validation {
        let mut validation = Validation::default();
        check(&parse_module(src).unwrap(), &mut validation);
        validation
    }

    #[test]
    fn unsupported_imports() {
        let validation = scan("import os, json\nfrom asyncio import run\nimport concurrent.futures\nfrom . import pickle\n");
        let messages: Vec<_> = validation.errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec!["Unsupported import: json", "Unsupported import: asyncio", "Unsupported import: concurrent"]
        );
    }

    #[test]
    fn async_functions_anywhere() {
        let validation = scan("class C:\n    async def m(self):\n        pass\n");
        assert_eq!(validation.errors[0].to_string(), "Async functions not supported: m");
    }

    #[test]
    fn lambdas_are_warnings() {
        let validation = scan("key = lambda x: x\nitems = sorted(xs, key=lambda y: -y)\n");
        assert!(validation.errors.is_empty());
        assert_eq!(validation.warnings.len(), 2);
        assert!(matches!(validation.warnings[0], ContractWarning::Lambda { .. }));
    }
}
