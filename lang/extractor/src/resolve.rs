use turbox_lang_ast::*;

use crate::ConstantTable;

/// Fold a path expression to the string it evaluates to, if that is statically known.
///
/// Accepted shapes are string literals, `+` concatenation, f-strings with plain
/// `{expr}` fields and names bound in `constants`. Everything else is unresolved.
pub fn resolve(expr: &Expr, constants: &ConstantTable) -> Option<String> {
    match expr {
        Expr::Literal(Literal { kind: LiteralKind::Str(value), .. }) => Some(value.clone()),
        Expr::BinOp(BinOp { left, op: BinOperator::Add, right, .. }) => {
            let mut value = resolve(left, constants)?;
            value.push_str(&resolve(right, constants)?);
            Some(value)
        }
        Expr::FString(fstring) => {
            let mut value = String::new();
            for part in &fstring.parts {
                match part {
                    FStringPart::Literal(text) => value.push_str(text),
                    FStringPart::Field(field) if field.is_plain() => {
                        value.push_str(&resolve(&field.expr, constants)?)
                    }
                    FStringPart::Field(_) => return None,
                }
            }
            Some(value)
        }
        Expr::Name(ident) => constants.get(ident.as_str()).map(str::to_owned),
        _ => None,
    }
}
