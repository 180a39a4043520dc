//! Rendering expressions back to source text for diagnostics.
//!
//! The output is valid Python for the expression forms the parser accepts, with
//! parentheses added conservatively around nested operators.

use std::fmt;

use crate::*;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(ident) => write!(f, "{ident}"),
            Expr::Literal(lit) => write!(f, "{}", lit.kind),
            Expr::FString(fstring) => write!(f, "{fstring}"),
            Expr::Attribute(Attribute { value, attr, .. }) => {
                write_operand(f, value)?;
                write!(f, ".{attr}")
            }
            Expr::Call(Call { func, args, keywords, .. }) => {
                write_operand(f, func)?;
                write!(f, "(")?;
                let mut first = true;
                for arg in args {
                    write_sep(f, &mut first)?;
                    write!(f, "{arg}")?;
                }
                for kw in keywords {
                    write_sep(f, &mut first)?;
                    match &kw.arg {
                        Some(arg) => write!(f, "{arg}={}", kw.value)?,
                        None => write!(f, "**{}", kw.value)?,
                    }
                }
                write!(f, ")")
            }
            Expr::Subscript(Subscript { value, index, .. }) => {
                write_operand(f, value)?;
                match index.as_ref() {
                    Expr::Tuple(Sequence { elts, .. }) if !elts.is_empty() => {
                        write!(f, "[")?;
                        write_comma_separated(f, elts)?;
                        write!(f, "]")
                    }
                    index => write!(f, "[{index}]"),
                }
            }
            Expr::Slice(Slice { lower, upper, step, .. }) => {
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                write!(f, ":")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                if let Some(step) = step {
                    write!(f, ":{step}")?;
                }
                Ok(())
            }
            Expr::BinOp(BinOp { left, op, right, .. }) => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
            Expr::UnaryOp(UnaryOp { op, operand, .. }) => {
                match op {
                    UnaryOperator::Not => write!(f, "not ")?,
                    UnaryOperator::Neg => write!(f, "-")?,
                    UnaryOperator::Pos => write!(f, "+")?,
                    UnaryOperator::Invert => write!(f, "~")?,
                }
                write_operand(f, operand)
            }
            Expr::BoolOp(BoolOp { op, values, .. }) => {
                let sep = match op {
                    BoolOperator::And => " and ",
                    BoolOperator::Or => " or ",
                };
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{sep}")?;
                    }
                    write_operand(f, value)?;
                }
                Ok(())
            }
            Expr::Compare(Compare { left, ops, comparators, .. }) => {
                write_operand(f, left)?;
                for (op, comparator) in ops.iter().zip(comparators) {
                    write!(f, " {} ", op.symbol())?;
                    write_operand(f, comparator)?;
                }
                Ok(())
            }
            Expr::Lambda(Lambda { params, body, .. }) => {
                if params.is_empty() {
                    write!(f, "lambda: {body}")
                } else {
                    write!(f, "lambda {params}: {body}")
                }
            }
            Expr::IfExp(IfExp { test, body, orelse, .. }) => {
                write_operand(f, body)?;
                write!(f, " if ")?;
                write_operand(f, test)?;
                write!(f, " else ")?;
                write_operand(f, orelse)
            }
            Expr::NamedExpr(NamedExpr { target, value, .. }) => write!(f, "({target} := {value})"),
            Expr::Await(Await { value, .. }) => {
                write!(f, "await ")?;
                write_operand(f, value)
            }
            Expr::Yield(Yield { value: None, .. }) => write!(f, "(yield)"),
            Expr::Yield(Yield { value: Some(value), .. }) => write!(f, "(yield {value})"),
            Expr::YieldFrom(YieldFrom { value, .. }) => write!(f, "(yield from {value})"),
            Expr::Starred(Starred { value, .. }) => {
                write!(f, "*")?;
                write_operand(f, value)
            }
            Expr::List(Sequence { elts, .. }) => {
                write!(f, "[")?;
                write_comma_separated(f, elts)?;
                write!(f, "]")
            }
            Expr::Tuple(Sequence { elts, .. }) => {
                write!(f, "(")?;
                write_comma_separated(f, elts)?;
                if elts.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Expr::Set(Sequence { elts, .. }) if elts.is_empty() => write!(f, "set()"),
            Expr::Set(Sequence { elts, .. }) => {
                write!(f, "{{")?;
                write_comma_separated(f, elts)?;
                write!(f, "}}")
            }
            Expr::Dict(Dict { items, .. }) => {
                write!(f, "{{")?;
                let mut first = true;
                for item in items {
                    write_sep(f, &mut first)?;
                    match item {
                        DictItem::Pair { key, value } => write!(f, "{key}: {value}")?,
                        DictItem::Unpack(mapping) => write!(f, "**{mapping}")?,
                    }
                }
                write!(f, "}}")
            }
            Expr::Comprehension(comp) => write!(f, "{comp}"),
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Str(s) => write!(f, "{}", repr_str(s)),
            LiteralKind::Bytes(bytes) => {
                write!(f, "b'")?;
                for byte in bytes {
                    match byte {
                        b'\\' => write!(f, "\\\\")?,
                        b'\'' => write!(f, "\\'")?,
                        b'\n' => write!(f, "\\n")?,
                        b'\r' => write!(f, "\\r")?,
                        b'\t' => write!(f, "\\t")?,
                        0x20..=0x7e => write!(f, "{}", *byte as char)?,
                        _ => write!(f, "\\x{byte:02x}")?,
                    }
                }
                write!(f, "'")
            }
            LiteralKind::Int(n) | LiteralKind::Float(n) | LiteralKind::Complex(n) => write!(f, "{n}"),
            LiteralKind::Bool(true) => write!(f, "True"),
            LiteralKind::Bool(false) => write!(f, "False"),
            LiteralKind::None => write!(f, "None"),
            LiteralKind::Ellipsis => write!(f, "..."),
        }
    }
}

impl fmt::Display for FString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = String::new();
        write_fstring_parts(&mut body, &self.parts);
        let quote = if body.contains('\'') && !body.contains('"') { '"' } else { '\'' };
        write!(f, "f{quote}{body}{quote}")
    }
}

fn write_fstring_parts(out: &mut String, parts: &[FStringPart]) {
    for part in parts {
        match part {
            FStringPart::Literal(text) => {
                for c in text.chars() {
                    match c {
                        '{' => out.push_str("{{"),
                        '}' => out.push_str("}}"),
                        '\n' => out.push_str("\\n"),
                        '\\' => out.push_str("\\\\"),
                        c => out.push(c),
                    }
                }
            }
            FStringPart::Field(field) => {
                out.push('{');
                out.push_str(&field.expr.to_string());
                if field.debug {
                    out.push('=');
                }
                if let Some(conversion) = field.conversion {
                    out.push('!');
                    out.push(conversion);
                }
                if let Some(spec) = &field.format_spec {
                    out.push(':');
                    write_fstring_parts(out, spec);
                }
                out.push('}');
            }
        }
    }
}

impl fmt::Display for Comprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = match self.kind {
            ComprehensionKind::List => ("[", "]"),
            ComprehensionKind::Set | ComprehensionKind::Dict => ("{", "}"),
            ComprehensionKind::Generator => ("(", ")"),
        };
        write!(f, "{open}{}", self.element)?;
        if let Some(value) = &self.value {
            write!(f, ": {value}")?;
        }
        for generator in &self.generators {
            if generator.is_async {
                write!(f, " async")?;
            }
            write!(f, " for {} in ", generator.target)?;
            write_operand(f, &generator.iter)?;
            for cond in &generator.ifs {
                write!(f, " if ")?;
                write_operand(f, cond)?;
            }
        }
        write!(f, "{close}")
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for param in &self.posonly {
            write_sep(f, &mut first)?;
            write!(f, "{param}")?;
        }
        if !self.posonly.is_empty() {
            write_sep(f, &mut first)?;
            write!(f, "/")?;
        }
        for param in &self.args {
            write_sep(f, &mut first)?;
            write!(f, "{param}")?;
        }
        match &self.vararg {
            Some(vararg) => {
                write_sep(f, &mut first)?;
                write!(f, "*{vararg}")?;
            }
            None if !self.kwonly.is_empty() => {
                write_sep(f, &mut first)?;
                write!(f, "*")?;
            }
            None => {}
        }
        for param in &self.kwonly {
            write_sep(f, &mut first)?;
            write!(f, "{param}")?;
        }
        if let Some(kwarg) = &self.kwarg {
            write_sep(f, &mut first)?;
            write!(f, "**{kwarg}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(annotation) = &self.annotation {
            write!(f, ": {annotation}")?;
        }
        if let Some(default) = &self.default {
            if self.annotation.is_some() {
                write!(f, " = {default}")?;
            } else {
                write!(f, "={default}")?;
            }
        }
        Ok(())
    }
}

/// Quote a string the way Python's `repr` does.
pub fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn is_atomic(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Name(_)
            | Expr::Literal(_)
            | Expr::FString(_)
            | Expr::Attribute(_)
            | Expr::Call(_)
            | Expr::Subscript(_)
            | Expr::List(_)
            | Expr::Tuple(_)
            | Expr::Set(_)
            | Expr::Dict(_)
            | Expr::Comprehension(_)
            | Expr::NamedExpr(_)
            | Expr::Yield(_)
            | Expr::YieldFrom(_)
    )
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    if is_atomic(expr) { write!(f, "{expr}") } else { write!(f, "({expr})") }
}

fn write_sep(f: &mut fmt::Formatter<'_>, first: &mut bool) -> fmt::Result {
    if !*first {
        write!(f, ", ")?;
    }
    *first = false;
    Ok(())
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    let mut first = true;
    for expr in exprs {
        write_sep(f, &mut first)?;
        write!(f, "{expr}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::repr_str;

    #[test]
    fn repr_prefers_single_quotes() {
        assert_eq!(repr_str("hi"), "'hi'");
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_str("a\nb"), "'a\\nb'");
    }
}
