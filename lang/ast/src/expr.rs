use turbox_lang_miette_util::codespan::Span;

use crate::{HasSpan, Ident, Parameters};

// Expr
//
//

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(Ident),
    Literal(Literal),
    FString(FString),
    Attribute(Attribute),
    Call(Call),
    Subscript(Subscript),
    Slice(Slice),
    BinOp(BinOp),
    UnaryOp(UnaryOp),
    BoolOp(BoolOp),
    Compare(Compare),
    Lambda(Lambda),
    IfExp(IfExp),
    NamedExpr(NamedExpr),
    Await(Await),
    Yield(Yield),
    YieldFrom(YieldFrom),
    Starred(Starred),
    List(Sequence),
    Tuple(Sequence),
    Set(Sequence),
    Dict(Dict),
    Comprehension(Comprehension),
}

impl Expr {
    /// The string payload if this expression is a plain `str` literal.
    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Expr::Literal(Literal { kind: LiteralKind::Str(s), .. }) => Some(s),
            _ => None,
        }
    }

    /// The identifier if this expression is a bare name.
    pub fn as_name(&self) -> Option<&Ident> {
        match self {
            Expr::Name(ident) => Some(ident),
            _ => None,
        }
    }
}

impl HasSpan for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Name(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::FString(e) => e.span,
            Expr::Attribute(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Subscript(e) => e.span,
            Expr::Slice(e) => e.span,
            Expr::BinOp(e) => e.span,
            Expr::UnaryOp(e) => e.span,
            Expr::BoolOp(e) => e.span,
            Expr::Compare(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::IfExp(e) => e.span,
            Expr::NamedExpr(e) => e.span,
            Expr::Await(e) => e.span,
            Expr::Yield(e) => e.span,
            Expr::YieldFrom(e) => e.span,
            Expr::Starred(e) => e.span,
            Expr::List(e) => e.span,
            Expr::Tuple(e) => e.span,
            Expr::Set(e) => e.span,
            Expr::Dict(e) => e.span,
            Expr::Comprehension(e) => e.span,
        }
    }
}

// Literals
//
//

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub span: Span,
    pub kind: LiteralKind,
}

/// Numbers are kept in their source spelling; nothing downstream does arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Str(String),
    Bytes(Vec<u8>),
    Int(String),
    Float(String),
    Complex(String),
    Bool(bool),
    None,
    Ellipsis,
}

impl LiteralKind {
    /// The name of the runtime type a literal of this kind evaluates to.
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralKind::Str(_) => "str",
            LiteralKind::Bytes(_) => "bytes",
            LiteralKind::Int(_) => "int",
            LiteralKind::Float(_) => "float",
            LiteralKind::Complex(_) => "complex",
            LiteralKind::Bool(_) => "bool",
            LiteralKind::None => "NoneType",
            LiteralKind::Ellipsis => "ellipsis",
        }
    }
}

/// An interpolated string literal, e.g. `f"/users/{name}"`.
///
/// Adjacent literals that are implicitly concatenated with an f-string are
/// merged into a single `FString` by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct FString {
    pub span: Span,
    pub parts: Vec<FStringPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FStringPart {
    Literal(String),
    Field(FormattedValue),
}

/// A replacement field `{expr!conv:spec}` inside an f-string.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedValue {
    pub span: Span,
    pub expr: Box<Expr>,
    /// One of `s`, `r` or `a`
    pub conversion: Option<char>,
    pub format_spec: Option<Vec<FStringPart>>,
    /// Whether the field uses the self-documenting `=` specifier
    pub debug: bool,
}

impl FormattedValue {
    /// A field without conversion, format spec or `=` specifier.
    pub fn is_plain(&self) -> bool {
        self.conversion.is_none() && self.format_spec.is_none() && !self.debug
    }
}

// Access and calls
//
//

/// Something of the form `value.attr`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub span: Span,
    pub value: Box<Expr>,
    pub attr: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub span: Span,
    pub func: Box<Expr>,
    /// Positional arguments, including `*args` as [Expr::Starred]
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

impl Call {
    pub fn keyword(&self, name: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|kw| kw.arg.as_ref().is_some_and(|arg| arg.id == name))
    }
}

/// A keyword argument `name=value`, or `**value` when `arg` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub span: Span,
    pub arg: Option<Ident>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscript {
    pub span: Span,
    pub value: Box<Expr>,
    pub index: Box<Expr>,
}

/// `lower:upper:step`, only valid as (part of) a subscript index
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub span: Span,
    pub lower: Option<Box<Expr>>,
    pub upper: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
}

// Operators
//
//

#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub span: Span,
    pub left: Box<Expr>,
    pub op: BinOperator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOperator::Add => "+",
            BinOperator::Sub => "-",
            BinOperator::Mult => "*",
            BinOperator::MatMult => "@",
            BinOperator::Div => "/",
            BinOperator::FloorDiv => "//",
            BinOperator::Mod => "%",
            BinOperator::Pow => "**",
            BinOperator::LShift => "<<",
            BinOperator::RShift => ">>",
            BinOperator::BitOr => "|",
            BinOperator::BitXor => "^",
            BinOperator::BitAnd => "&",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub span: Span,
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Neg,
    Pos,
    Invert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolOp {
    pub span: Span,
    pub op: BoolOperator,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOperator {
    And,
    Or,
}

/// A (possibly chained) comparison `left op1 c1 op2 c2 ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub span: Span,
    pub left: Box<Expr>,
    pub ops: Vec<CmpOperator>,
    pub comparators: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOperator::Eq => "==",
            CmpOperator::NotEq => "!=",
            CmpOperator::Lt => "<",
            CmpOperator::LtE => "<=",
            CmpOperator::Gt => ">",
            CmpOperator::GtE => ">=",
            CmpOperator::Is => "is",
            CmpOperator::IsNot => "is not",
            CmpOperator::In => "in",
            CmpOperator::NotIn => "not in",
        }
    }
}

// Other expression forms
//
//

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub span: Span,
    pub params: Box<Parameters>,
    pub body: Box<Expr>,
}

/// `body if test else orelse`
#[derive(Debug, Clone, PartialEq)]
pub struct IfExp {
    pub span: Span,
    pub test: Box<Expr>,
    pub body: Box<Expr>,
    pub orelse: Box<Expr>,
}

/// The walrus operator `target := value`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpr {
    pub span: Span,
    pub target: Ident,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Await {
    pub span: Span,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Yield {
    pub span: Span,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldFrom {
    pub span: Span,
    pub value: Box<Expr>,
}

/// `*value` in a call, display or assignment target
#[derive(Debug, Clone, PartialEq)]
pub struct Starred {
    pub span: Span,
    pub value: Box<Expr>,
}

/// The elements of a list, tuple or set display
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub span: Span,
    pub elts: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    pub span: Span,
    pub items: Vec<DictItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DictItem {
    Pair { key: Expr, value: Expr },
    /// `**mapping`
    Unpack(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

/// A list, set or dict comprehension or a generator expression.
///
/// For dict comprehensions `element` is the key and `value` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub span: Span,
    pub kind: ComprehensionKind,
    pub element: Box<Expr>,
    pub value: Option<Box<Expr>>,
    pub generators: Vec<Generator>,
}

/// One `[async] for target in iter if cond ...` clause
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
    pub is_async: bool,
}
