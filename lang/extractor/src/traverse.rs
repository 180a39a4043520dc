use turbox_lang_ast::*;

use crate::ConstantTable;
use crate::decorator::is_framework_constructor;

/// Module-level bindings as seen at some point of the traversal.
#[derive(Debug, Clone, Default)]
pub struct ModuleState {
    pub constants: ConstantTable,
    /// The most recent `name = TurboX(...)` binding
    pub app_binding: Option<Ident>,
}

impl ModuleState {
    /// Whether a routing decorator looked up on `object` belongs to the tracked application.
    ///
    /// Before any application binding is seen every object is accepted.
    pub fn is_app(&self, object: &Ident) -> bool {
        self.app_binding.as_ref().is_none_or(|app| app == object)
    }
}

/// Walk the module in source order, tracking module-level bindings and calling
/// `on_def` for every function definition anywhere in the tree.
///
/// `on_def` sees the bindings in effect when the `def` statement executes, i.e.
/// before the function's own name is bound. Bodies of functions and classes do
/// not contribute bindings.
pub fn traverse<'a, F>(module: &'a Module, on_def: F) -> ModuleState
where
    F: FnMut(&'a FunctionDef, &ModuleState),
{
    let mut walker = Walker { state: ModuleState::default(), on_def };
    walker.module_block(&module.body);
    walker.state
}

struct Walker<F> {
    state: ModuleState,
    on_def: F,
}

impl<'a, F> Walker<F>
where
    F: FnMut(&'a FunctionDef, &ModuleState),
{
    fn module_block(&mut self, body: &'a [Stmt]) {
        for stmt in body {
            self.module_stmt(stmt);
        }
    }

    fn module_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::AnnAssign(AnnAssign { target, .. }) | Stmt::AugAssign(AugAssign { target, .. }) => {
                self.unbind_target(target)
            }
            Stmt::Delete(Delete { targets, .. }) => targets.iter().for_each(|t| self.unbind_target(t)),
            Stmt::Import(Import { names, .. }) | Stmt::ImportFrom(ImportFrom { names, .. }) => {
                for alias in names {
                    if let Some(name) = alias.bound_name() {
                        self.unbind(name);
                    }
                }
            }
            Stmt::If(If { body, orelse, .. }) | Stmt::While(While { body, orelse, .. }) => {
                self.module_block(body);
                self.module_block(orelse);
            }
            Stmt::For(For { target, body, orelse, .. }) => {
                self.unbind_target(target);
                self.module_block(body);
                self.module_block(orelse);
            }
            Stmt::Try(Try { body, handlers, orelse, finalbody, .. }) => {
                self.module_block(body);
                for handler in handlers {
                    if let Some(name) = &handler.name {
                        self.unbind(name.as_str());
                    }
                    self.module_block(&handler.body);
                }
                self.module_block(orelse);
                self.module_block(finalbody);
            }
            Stmt::With(With { items, body, .. }) => {
                for item in items {
                    if let Some(vars) = &item.optional_vars {
                        self.unbind_target(vars);
                    }
                }
                self.module_block(body);
            }
            Stmt::Match(Match { cases, .. }) => {
                for case in cases {
                    for name in &case.captures {
                        self.unbind(name.as_str());
                    }
                    self.module_block(&case.body);
                }
            }
            Stmt::FunctionDef(def) => {
                self.function_def(def);
                self.unbind(def.name.as_str());
            }
            Stmt::ClassDef(class) => {
                self.nested_block(&class.body);
                self.unbind(class.name.as_str());
            }
            _ => {}
        }
    }

    /// Statements outside of module scope: only look for function definitions.
    fn nested_block(&mut self, body: &'a [Stmt]) {
        for stmt in body {
            match stmt {
                Stmt::FunctionDef(def) => self.function_def(def),
                Stmt::ClassDef(class) => self.nested_block(&class.body),
                Stmt::If(If { body, orelse, .. })
                | Stmt::While(While { body, orelse, .. })
                | Stmt::For(For { body, orelse, .. }) => {
                    self.nested_block(body);
                    self.nested_block(orelse);
                }
                Stmt::Try(Try { body, handlers, orelse, finalbody, .. }) => {
                    self.nested_block(body);
                    for handler in handlers {
                        self.nested_block(&handler.body);
                    }
                    self.nested_block(orelse);
                    self.nested_block(finalbody);
                }
                Stmt::With(With { body, .. }) => self.nested_block(body),
                Stmt::Match(Match { cases, .. }) => {
                    for case in cases {
                        self.nested_block(&case.body);
                    }
                }
                _ => {}
            }
        }
    }

    fn function_def(&mut self, def: &'a FunctionDef) {
        (self.on_def)(def, &self.state);
        self.nested_block(&def.body);
    }

    fn assign(&mut self, assign: &Assign) {
        if is_framework_constructor(&assign.value) {
            for target in &assign.targets {
                self.unbind_target(target);
                if let Expr::Name(name) = target {
                    log::trace!("Application bound to '{name}'");
                    self.state.app_binding = Some(name.clone());
                }
            }
            return;
        }
        match assign.value.as_str_literal() {
            Some(value) => {
                for target in &assign.targets {
                    match target {
                        Expr::Name(name) => {
                            log::trace!("Constant {name} = {value:?}");
                            self.state.constants.insert(name.as_str(), value);
                        }
                        other => self.unbind_target(other),
                    }
                }
            }
            None => assign.targets.iter().for_each(|t| self.unbind_target(t)),
        }
    }

    /// Forget every name bound by an assignment target.
    fn unbind_target(&mut self, target: &Expr) {
        match target {
            Expr::Name(name) => self.unbind(name.as_str()),
            Expr::Tuple(seq) | Expr::List(seq) => seq.elts.iter().for_each(|t| self.unbind_target(t)),
            Expr::Starred(Starred { value, .. }) => self.unbind_target(value),
            _ => {}
        }
    }

    fn unbind(&mut self, name: &str) {
        if self.state.constants.invalidate(name).is_some() {
            log::trace!("Constant {name} invalidated by a non-literal binding");
        }
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_parser::parse_module;

    use super::traverse;

    fn visited(src: &str) -> Vec<(String, Option<String>)> {
        let module = parse_module(src).unwrap();
        let mut seen = Vec::new();
        traverse(&module, |def, state| {
            seen.push((def.name.id.clone(), state.constants.get("P").map(str::to_owned)))
        });
        seen
    }

    #[test]
    fn definitions_see_bindings_made_before_them() {
        let src = "def a(): pass\nP = '/x'\ndef b(): pass\nP = '/y'\ndef c(): pass\n";
        assert_eq!(
            visited(src),
            vec![
                ("a".to_string(), None),
                ("b".to_string(), Some("/x".to_string())),
                ("c".to_string(), Some("/y".to_string())),
            ]
        );
    }

    #[test]
    fn nested_definitions_are_visited() {
        let src = "\
P = '/x'
class Api:
    def method(self): pass
def outer():
    P = '/local'
    def inner(): pass
if True:
    def guarded(): pass
";
        let names: Vec<_> = visited(src).into_iter().map(|(name, p)| (name, p.unwrap())).collect();
        assert_eq!(names.len(), 4);
        assert!(names.iter().all(|(_, p)| p == "/x"));
        assert_eq!(names[2].0, "inner");
    }

    #[test]
    fn rebinding_invalidates_constants() {
        for rebinding in [
            "P = compute()",
            "P += '/z'",
            "P: str = '/z'",
            "import P",
            "from m import Q as P",
            "def P(): pass",
            "class P: pass",
            "for P in xs: pass",
            "with f() as P: pass",
            "P, Q = '/a', '/b'",
            "del P",
            "match x:\n    case [P, *_]: pass",
            "match x:\n    case {'k': P} if P: pass",
        ] {
            let src = format!("P = '/x'\n{rebinding}\n");
            let state = traverse(&parse_module(&src).unwrap(), |_, _| {});
            assert_eq!(state.constants.get("P"), None, "{rebinding}");
        }
    }

    #[test]
    fn module_scope_includes_compound_statements() {
        let src = "if DEBUG:\n    P = '/debug'\nelse:\n    P = '/prod'\ntry:\n    Q = '/q'\nexcept Exception:\n    pass\n";
        let state = traverse(&parse_module(src).unwrap(), |_, _| {});
        assert_eq!(state.constants.get("P"), Some("/prod"));
        assert_eq!(state.constants.get("Q"), Some("/q"));
    }

    #[test]
    fn function_bodies_do_not_bind() {
        let src = "def f():\n    P = '/local'\n";
        let state = traverse(&parse_module(src).unwrap(), |_, _| {});
        assert!(state.constants.is_empty());
    }

    #[test]
    fn chained_assignment_binds_all_names() {
        let state = traverse(&parse_module("A = B = '/x'\n").unwrap(), |_, _| {});
        assert_eq!(state.constants.get("A"), Some("/x"));
        assert_eq!(state.constants.get("B"), Some("/x"));
    }

    #[test]
    fn most_recent_application_binding_wins() {
        let src = "app = TurboX()\napi = turbox.TurboX(port=9000)\n";
        let state = traverse(&parse_module(src).unwrap(), |_, _| {});
        assert_eq!(state.app_binding.unwrap().as_str(), "api");
    }

    #[test]
    fn match_case_bodies_are_module_scope() {
        let src = "\
P = '/x'
match MODE:
    case 'debug':
        def debug(): pass
    case Mode.PROD | Mode.STAGING:
        Q = '/q'
        def prod(): pass
";
        assert_eq!(
            visited(src),
            vec![("debug".to_string(), Some("/x".to_string())), ("prod".to_string(), Some("/x".to_string()))]
        );
        let state = traverse(&parse_module(src).unwrap(), |_, _| {});
        assert_eq!(state.constants.get("Q"), Some("/q"));
    }
}
