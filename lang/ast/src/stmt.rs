use turbox_lang_miette_util::codespan::Span;

use crate::{Expr, HasSpan, Ident, Keyword};

// Stmt
//
//

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprStmt),
    Assign(Assign),
    AnnAssign(AnnAssign),
    AugAssign(AugAssign),
    Pass(Span),
    Break(Span),
    Continue(Span),
    Return(Return),
    Raise(Raise),
    Global(Names),
    Nonlocal(Names),
    Delete(Delete),
    Assert(Assert),
    Import(Import),
    ImportFrom(ImportFrom),
    If(If),
    While(While),
    For(For),
    Try(Try),
    With(With),
    Match(Match),
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
}

impl HasSpan for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Expr(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::AnnAssign(s) => s.span,
            Stmt::AugAssign(s) => s.span,
            Stmt::Pass(span) | Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Return(s) => s.span,
            Stmt::Raise(s) => s.span,
            Stmt::Global(s) | Stmt::Nonlocal(s) => s.span,
            Stmt::Delete(s) => s.span,
            Stmt::Assert(s) => s.span,
            Stmt::Import(s) => s.span,
            Stmt::ImportFrom(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::With(s) => s.span,
            Stmt::Match(s) => s.span,
            Stmt::FunctionDef(s) => s.span,
            Stmt::ClassDef(s) => s.span,
        }
    }
}

// Simple statements
//
//

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub span: Span,
    pub value: Expr,
}

/// `t1 = t2 = ... = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub span: Span,
    pub targets: Vec<Expr>,
    pub value: Expr,
}

/// `target: annotation [= value]`
#[derive(Debug, Clone, PartialEq)]
pub struct AnnAssign {
    pub span: Span,
    pub target: Expr,
    pub annotation: Expr,
    pub value: Option<Expr>,
}

/// `target op= value`
#[derive(Debug, Clone, PartialEq)]
pub struct AugAssign {
    pub span: Span,
    pub target: Expr,
    pub op: crate::BinOperator,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub span: Span,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raise {
    pub span: Span,
    pub exc: Option<Expr>,
    pub cause: Option<Expr>,
}

/// The name list of a `global` or `nonlocal` statement
#[derive(Debug, Clone, PartialEq)]
pub struct Names {
    pub span: Span,
    pub names: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub span: Span,
    pub targets: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assert {
    pub span: Span,
    pub test: Expr,
    pub msg: Option<Expr>,
}

// Imports
//
//

/// `import a.b.c [as d], ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub span: Span,
    pub names: Vec<Alias>,
}

/// `from [.]*module import a [as b], ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFrom {
    pub span: Span,
    /// `None` for `from . import x`
    pub module: Option<String>,
    /// Number of leading dots
    pub level: usize,
    pub names: Vec<Alias>,
}

/// A single imported name. `name` is dotted for plain imports and `*` for star imports.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub span: Span,
    pub name: String,
    pub asname: Option<Ident>,
}

impl Alias {
    /// The name this alias binds in the importing scope, if any.
    ///
    /// `import a.b` binds `a`, `import a.b as c` binds `c`, `from m import *` binds nothing nameable.
    pub fn bound_name(&self) -> Option<&str> {
        match &self.asname {
            Some(asname) => Some(asname.as_str()),
            None if self.name == "*" => None,
            None => self.name.split('.').next(),
        }
    }
}

// Compound statements
//
//

/// `if test: body else: orelse`. An `elif` chain is nested in `orelse`.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub span: Span,
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub span: Span,
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub span: Span,
    pub target: Expr,
    pub iter: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub span: Span,
    pub body: Vec<Stmt>,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Vec<Stmt>,
    pub finalbody: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    pub span: Span,
    pub typ: Option<Expr>,
    pub name: Option<Ident>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub span: Span,
    pub items: Vec<WithItem>,
    pub body: Vec<Stmt>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithItem {
    pub context: Expr,
    pub optional_vars: Option<Expr>,
}

/// `match subject:` with its `case` clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub span: Span,
    pub subject: Expr,
    pub cases: Vec<MatchCase>,
}

/// A `case` clause. Patterns are kept as source spans, only the names they
/// may bind are recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub span: Span,
    pub pattern: Span,
    /// Over-approximation of the names bound by the pattern
    pub captures: Vec<Ident>,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

// Definitions
//
//

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub span: Span,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub span: Span,
    pub name: Ident,
    pub params: Parameters,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Decorator>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub span: Span,
    pub name: Ident,
    pub bases: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Decorator>,
}

/// The parameter list of a function or lambda:
/// `posonly, /, args, *vararg, kwonly, **kwarg`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters {
    pub posonly: Vec<Param>,
    pub args: Vec<Param>,
    pub vararg: Option<Param>,
    pub kwonly: Vec<Param>,
    pub kwarg: Option<Param>,
}

impl Parameters {
    /// All declared parameters in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.posonly
            .iter()
            .chain(self.args.iter())
            .chain(self.vararg.iter())
            .chain(self.kwonly.iter())
            .chain(self.kwarg.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub span: Span,
    pub name: Ident,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
}
