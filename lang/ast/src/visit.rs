//! Read-only pre-order traversal of the syntax tree.
//!
//! Implement the hooks of [Visitor] that are of interest; [Visit::visit] calls
//! the hook for a node before descending into its children.

use crate::*;

#[rustfmt::skip]
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {}
    fn visit_expr(&mut self, expr: &Expr) {}
    fn visit_function_def(&mut self, def: &FunctionDef) {}
    fn visit_class_def(&mut self, def: &ClassDef) {}
    fn visit_import(&mut self, import: &Import) {}
    fn visit_import_from(&mut self, import: &ImportFrom) {}
    fn visit_return(&mut self, ret: &Return) {}
    fn visit_lambda(&mut self, lambda: &Lambda) {}
    fn visit_call(&mut self, call: &Call) {}
}

pub trait Visit {
    fn visit<V: Visitor>(&self, v: &mut V);
}

impl<T: Visit> Visit for Vec<T> {
    fn visit<V: Visitor>(&self, v: &mut V) {
        for x in self {
            x.visit(v);
        }
    }
}

impl<T: Visit> Visit for Option<T> {
    fn visit<V: Visitor>(&self, v: &mut V) {
        if let Some(x) = self {
            x.visit(v);
        }
    }
}

impl<T: Visit> Visit for Box<T> {
    fn visit<V: Visitor>(&self, v: &mut V) {
        self.as_ref().visit(v);
    }
}

impl Visit for Module {
    fn visit<V: Visitor>(&self, v: &mut V) {
        self.body.visit(v);
    }
}

impl Visit for Stmt {
    fn visit<V: Visitor>(&self, v: &mut V) {
        v.visit_stmt(self);
        match self {
            Stmt::Expr(ExprStmt { value, .. }) => value.visit(v),
            Stmt::Assign(Assign { targets, value, .. }) => {
                targets.visit(v);
                value.visit(v);
            }
            Stmt::AnnAssign(AnnAssign { target, annotation, value, .. }) => {
                target.visit(v);
                annotation.visit(v);
                value.visit(v);
            }
            Stmt::AugAssign(AugAssign { target, value, .. }) => {
                target.visit(v);
                value.visit(v);
            }
            Stmt::Pass(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Global(_) | Stmt::Nonlocal(_) => {}
            Stmt::Return(ret) => {
                v.visit_return(ret);
                ret.value.visit(v);
            }
            Stmt::Raise(Raise { exc, cause, .. }) => {
                exc.visit(v);
                cause.visit(v);
            }
            Stmt::Delete(Delete { targets, .. }) => targets.visit(v),
            Stmt::Assert(Assert { test, msg, .. }) => {
                test.visit(v);
                msg.visit(v);
            }
            Stmt::Import(import) => v.visit_import(import),
            Stmt::ImportFrom(import) => v.visit_import_from(import),
            Stmt::If(If { test, body, orelse, .. }) | Stmt::While(While { test, body, orelse, .. }) => {
                test.visit(v);
                body.visit(v);
                orelse.visit(v);
            }
            Stmt::For(For { target, iter, body, orelse, .. }) => {
                target.visit(v);
                iter.visit(v);
                body.visit(v);
                orelse.visit(v);
            }
            Stmt::Try(Try { body, handlers, orelse, finalbody, .. }) => {
                body.visit(v);
                for handler in handlers {
                    handler.typ.visit(v);
                    handler.body.visit(v);
                }
                orelse.visit(v);
                finalbody.visit(v);
            }
            Stmt::With(With { items, body, .. }) => {
                for item in items {
                    item.context.visit(v);
                    item.optional_vars.visit(v);
                }
                body.visit(v);
            }
            Stmt::Match(Match { subject, cases, .. }) => {
                subject.visit(v);
                for case in cases {
                    case.guard.visit(v);
                    case.body.visit(v);
                }
            }
            Stmt::FunctionDef(def) => def.visit(v),
            Stmt::ClassDef(def) => {
                v.visit_class_def(def);
                for decorator in &def.decorators {
                    decorator.expr.visit(v);
                }
                def.bases.visit(v);
                for kw in &def.keywords {
                    kw.value.visit(v);
                }
                def.body.visit(v);
            }
        }
    }
}

impl Visit for FunctionDef {
    fn visit<V: Visitor>(&self, v: &mut V) {
        v.visit_function_def(self);
        for decorator in &self.decorators {
            decorator.expr.visit(v);
        }
        self.params.visit(v);
        self.returns.visit(v);
        self.body.visit(v);
    }
}

impl Visit for Parameters {
    fn visit<V: Visitor>(&self, v: &mut V) {
        for param in self.iter() {
            param.annotation.visit(v);
            param.default.visit(v);
        }
    }
}

impl Visit for Expr {
    fn visit<V: Visitor>(&self, v: &mut V) {
        v.visit_expr(self);
        match self {
            Expr::Name(_) | Expr::Literal(_) => {}
            Expr::FString(FString { parts, .. }) => visit_fstring_parts(parts, v),
            Expr::Attribute(Attribute { value, .. }) => value.visit(v),
            Expr::Call(call) => {
                v.visit_call(call);
                call.func.visit(v);
                call.args.visit(v);
                for kw in &call.keywords {
                    kw.value.visit(v);
                }
            }
            Expr::Subscript(Subscript { value, index, .. }) => {
                value.visit(v);
                index.visit(v);
            }
            Expr::Slice(Slice { lower, upper, step, .. }) => {
                lower.visit(v);
                upper.visit(v);
                step.visit(v);
            }
            Expr::BinOp(BinOp { left, right, .. }) => {
                left.visit(v);
                right.visit(v);
            }
            Expr::UnaryOp(UnaryOp { operand, .. }) => operand.visit(v),
            Expr::BoolOp(BoolOp { values, .. }) => values.visit(v),
            Expr::Compare(Compare { left, comparators, .. }) => {
                left.visit(v);
                comparators.visit(v);
            }
            Expr::Lambda(lambda) => {
                v.visit_lambda(lambda);
                lambda.params.visit(v);
                lambda.body.visit(v);
            }
            Expr::IfExp(IfExp { test, body, orelse, .. }) => {
                test.visit(v);
                body.visit(v);
                orelse.visit(v);
            }
            Expr::NamedExpr(NamedExpr { value, .. }) => value.visit(v),
            Expr::Await(Await { value, .. }) => value.visit(v),
            Expr::Yield(Yield { value, .. }) => value.visit(v),
            Expr::YieldFrom(YieldFrom { value, .. }) => value.visit(v),
            Expr::Starred(Starred { value, .. }) => value.visit(v),
            Expr::List(seq) | Expr::Tuple(seq) | Expr::Set(seq) => seq.elts.visit(v),
            Expr::Dict(Dict { items, .. }) => {
                for item in items {
                    match item {
                        DictItem::Pair { key, value } => {
                            key.visit(v);
                            value.visit(v);
                        }
                        DictItem::Unpack(mapping) => mapping.visit(v),
                    }
                }
            }
            Expr::Comprehension(Comprehension { element, value, generators, .. }) => {
                element.visit(v);
                value.visit(v);
                for generator in generators {
                    generator.target.visit(v);
                    generator.iter.visit(v);
                    generator.ifs.visit(v);
                }
            }
        }
    }
}

fn visit_fstring_parts<V: Visitor>(parts: &[FStringPart], v: &mut V) {
    for part in parts {
        if let FStringPart::Field(field) = part {
            field.expr.visit(v);
            if let Some(spec) = &field.format_spec {
                visit_fstring_parts(spec, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_miette_util::codespan::Span;

    use super::*;

    fn name(id: &str) -> Expr {
        Expr::Name(Ident::new(Span::default(), id))
    }

    #[derive(Default)]
    struct Names(Vec<String>);

    impl Visitor for Names {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Name(ident) = expr {
                self.0.push(ident.id.clone());
            }
        }
    }

    #[test]
    fn visits_names_in_pre_order() {
        let call = Expr::Call(Call {
            span: Span::default(),
            func: Box::new(name("f")),
            args: vec![name("a")],
            keywords: vec![Keyword { span: Span::default(), arg: None, value: name("b") }],
        });
        let stmt = Stmt::Return(Return { span: Span::default(), value: Some(call) });

        let mut names = Names::default();
        stmt.visit(&mut names);
        assert_eq!(names.0, vec!["f", "a", "b"]);
    }
}
