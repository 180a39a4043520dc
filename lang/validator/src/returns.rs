use turbox_lang_ast::*;
use turbox_lang_miette_util::ToMiette;

use crate::result::{ContractError, Validation};

/// Check that a handler returns and that no return is obviously not a string.
pub fn check(def: &FunctionDef, validation: &mut Validation) {
    let handler = def.name.to_string();
    let mut returns = Vec::new();
    collect_returns(&def.body, &mut returns);

    if returns.is_empty() {
        validation.error(ContractError::MissingReturn {
            handler,
            span: def.name.span.to_miette(),
        });
        return;
    }

    for ret in returns {
        match &ret.value {
            None => validation.error(ContractError::EmptyReturn {
                handler: handler.clone(),
                span: ret.span.to_miette(),
            }),
            Some(value @ Expr::Literal(lit)) if !matches!(lit.kind, LiteralKind::Str(_)) => {
                validation.error(ContractError::NonStringReturn {
                    handler: handler.clone(),
                    typ: lit.kind.type_name().to_string(),
                    value: value.to_string(),
                    span: ret.span.to_miette(),
                })
            }
            Some(_) => {}
        }
    }
}

/// Return statements of a function body, not counting nested functions and classes.
pub(crate) fn collect_returns<'a>(body: &'a [Stmt], out: &mut Vec<&'a Return>) {
    for stmt in body {
        match stmt {
            Stmt::Return(ret) => out.push(ret),
            Stmt::If(If { body, orelse, .. })
            | Stmt::While(While { body, orelse, .. })
            | Stmt::For(For { body, orelse, .. }) => {
                collect_returns(body, out);
                collect_returns(orelse, out);
            }
            Stmt::Try(Try { body, handlers, orelse, finalbody, .. }) => {
                collect_returns(body, out);
                for handler in handlers {
                    collect_returns(&handler.body, out);
                }
                collect_returns(orelse, out);
                collect_returns(finalbody, out);
            }
            Stmt::With(With { body, .. }) => collect_returns(body, out),
            Stmt::Match(Match { cases, .. }) => {
                for case in cases {
                    collect_returns(&case.body, out);
                }
            }
            _ => {}
        }
    }
}
