//! Transliteration of handler bodies.
//!
//! Only top-level `return "..."` and `return f"..."` statements are carried over.
//! Inside f-strings, plain `str` literal fields are inlined, plain names become
//! `{name}` placeholders and any other field becomes `{...}`. A handler without such a return gets a
//! fixed response naming it.

use std::fmt;

use turbox_lang_ast::*;

use crate::quote::quote_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Text(String),
    Placeholder(String),
    Opaque,
}

/// A recognised `return` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    Literal(String),
    Template(Vec<TemplatePart>),
}

impl ReturnShape {
    fn recognise(value: &Expr) -> Option<ReturnShape> {
        match value {
            Expr::Literal(Literal { kind: LiteralKind::Str(text), .. }) => {
                Some(ReturnShape::Literal(text.clone()))
            }
            Expr::FString(fstring) => {
                let parts = fstring
                    .parts
                    .iter()
                    .map(|part| match part {
                        FStringPart::Literal(text) => TemplatePart::Text(text.clone()),
                        FStringPart::Field(field) if field.is_plain() => template_field(&field.expr),
                        FStringPart::Field(_) => TemplatePart::Opaque,
                    })
                    .collect();
                Some(ReturnShape::Template(parts))
            }
            _ => None,
        }
    }

    /// The text of the emitted string literal, before quoting.
    pub fn text(&self) -> String {
        match self {
            ReturnShape::Literal(text) => text.clone(),
            ReturnShape::Template(parts) => parts
                .iter()
                .map(|part| match part {
                    TemplatePart::Text(text) => text.clone(),
                    TemplatePart::Placeholder(name) => format!("{{{name}}}"),
                    TemplatePart::Opaque => "{...}".to_string(),
                })
                .collect(),
        }
    }
}

fn template_field(expr: &Expr) -> TemplatePart {
    match expr {
        // Other literals print differently from their source text, e.g. `1_000` or `1e3`.
        Expr::Literal(Literal { kind: LiteralKind::Str(text), .. }) => TemplatePart::Text(text.clone()),
        Expr::Name(name) => TemplatePart::Placeholder(name.to_string()),
        _ => TemplatePart::Opaque,
    }
}

/// A handler function as emitted into the generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFunction {
    pub name: String,
    /// Empty if the body has no recognised return
    pub returns: Vec<ReturnShape>,
}

impl HandlerFunction {
    pub fn transliterate(def: &FunctionDef) -> Self {
        let returns: Vec<_> = def
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Return(Return { value: Some(value), .. }) => ReturnShape::recognise(value),
                _ => None,
            })
            .collect();
        if returns.is_empty() {
            log::debug!("Handler '{}' has no recognised return, emitting a fixed response", def.name);
        }
        HandlerFunction { name: def.name.to_string(), returns }
    }

    pub fn is_fallback(&self) -> bool {
        self.returns.is_empty()
    }
}

impl fmt::Display for HandlerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}(request: Request) -> str:", self.name)?;
        if self.returns.is_empty() {
            let fallback = format!("Response from {}", self.name);
            return write!(f, "\n    return {}", quote_str(&fallback));
        }
        for ret in &self.returns {
            write!(f, "\n    return {}", quote_str(&ret.text()))?;
        }
        Ok(())
    }
}
