use std::fmt;

use logos::Logos;

mod layout;

pub use layout::Lexer;

#[derive(Default, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[default]
    InvalidToken,
    UnterminatedString,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The raw text of a string or bytes literal as it appears in the source.
///
/// Escape sequences and replacement fields are left untouched; they are
/// interpreted by the parser, which knows the spans of the enclosing token.
#[derive(Clone, Debug, PartialEq)]
pub struct StrLit {
    /// Lower-cased prefix, e.g. `""`, `"f"`, `"rb"`
    pub prefix: String,
    /// Everything between the opening and the closing quotes
    pub body: String,
    /// Byte offset of `body` relative to the start of the token
    pub body_offset: usize,
}

impl StrLit {
    pub fn is_raw(&self) -> bool {
        self.prefix.contains('r')
    }

    pub fn is_bytes(&self) -> bool {
        self.prefix.contains('b')
    }

    pub fn is_format(&self) -> bool {
        self.prefix.contains('f')
    }
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\f]+", skip r"#[^\r\n]*", skip r"\\\r?\n", error = LexicalError)]
//              ^^^^^^^^        ^^^^^^^^^^        ^^^^^^^^^
//                (1)              (2)               (3)
// Horizontal whitespace (1) only matters at the start of a logical line, where
// the layout pass measures it from the source directly.
// Comments run to the end of the physical line (2).
// A backslash immediately before a line break joins the two lines (3).
pub enum Token {
    // Keywords
    //
    //
    #[token("False")]
    False,
    #[token("None")]
    None,
    #[token("True")]
    True,
    #[token("and")]
    And,
    #[token("as")]
    As,
    #[token("assert")]
    Assert,
    #[token("async")]
    Async,
    #[token("await")]
    Await,
    #[token("break")]
    Break,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("def")]
    Def,
    #[token("del")]
    Del,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("except")]
    Except,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("from")]
    From,
    #[token("global")]
    Global,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("lambda")]
    Lambda,
    #[token("nonlocal")]
    Nonlocal,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("pass")]
    Pass,
    #[token("raise")]
    Raise,
    #[token("return")]
    Return,
    #[token("try")]
    Try,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("yield")]
    Yield,

    // Parens, Braces and Brackets
    //
    //
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Delimiters
    //
    //
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token("=")]
    Assign,
    #[token(":=")]
    Walrus,

    // Operators
    //
    //
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("@")]
    At,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token("&")]
    Amper,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,

    // Augmented assignment
    //
    //
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("**=")]
    DoubleStarEq,
    #[token("/=")]
    SlashEq,
    #[token("//=")]
    DoubleSlashEq,
    #[token("%=")]
    PercentEq,
    #[token("@=")]
    AtEq,
    #[token("<<=")]
    LShiftEq,
    #[token(">>=")]
    RShiftEq,
    #[token("&=")]
    AmperEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,

    // Layout
    //
    // `Indent` and `Dedent` are never produced by the logos lexer itself, they
    // are synthesised by the layout pass in [Lexer].
    #[regex(r"\r?\n")]
    Newline,
    Indent,
    Dedent,

    // Identifiers
    //
    // We use the following unicode categories:
    // L = letters of any script
    // N = numbers of any script
    #[regex(r"[a-zA-Z_\p{L}][a-zA-Z0-9_\p{L}\p{N}]*", |lex| lex.slice().to_string())]
    Name(String),

    // Literals
    //
    // Numbers keep their spelling; underscores are allowed between digits.
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"0[xX][0-9a-fA-F_]+", |lex| lex.slice().to_string())]
    #[regex(r"0[oO][0-7_]+", |lex| lex.slice().to_string())]
    #[regex(r"0[bB][01_]+", |lex| lex.slice().to_string())]
    Int(String),
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    Float(String),
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?[jJ]", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[jJ]", |lex| lex.slice().to_string())]
    Imaginary(String),
    /// Only the prefix and opening quote are matched by the regex, the rest of
    /// the literal is consumed by [lex_string].
    #[regex(r#"[rRbBfFuU]{0,2}["']"#, lex_string)]
    Str(StrLit),
}

/// Consume a string literal whose prefix and opening quote have just been matched.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<StrLit, LexicalError> {
    let opening = lex.slice();
    let quote = opening.as_bytes()[opening.len() - 1];
    let prefix = opening[..opening.len() - 1].to_ascii_lowercase();

    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let triple = bytes.starts_with(&[quote, quote]);
    let body_start = if triple { 2 } else { 0 };

    let mut i = body_start;
    loop {
        match bytes.get(i) {
            None => return Err(LexicalError::UnterminatedString),
            // An escaped character never terminates the literal, not even in raw strings.
            Some(b'\\') => i += 2,
            Some(b'\n') if !triple => return Err(LexicalError::UnterminatedString),
            Some(&b) if b == quote => {
                if !triple {
                    let body = rest[body_start..i].to_string();
                    lex.bump(i + 1);
                    return Ok(StrLit { body_offset: prefix.len() + 1, prefix, body });
                }
                if bytes[i..].starts_with(&[quote, quote, quote]) {
                    let body = rest[body_start..i].to_string();
                    lex.bump(i + 3);
                    return Ok(StrLit { body_offset: prefix.len() + 3, prefix, body });
                }
                i += 1;
            }
            Some(_) => i += 1,
        }
    }
}

impl Token {
    /// Whether this token opens a bracketed region in which line breaks are insignificant.
    pub fn is_opening_bracket(&self) -> bool {
        matches!(self, Token::LParen | Token::LBracket | Token::LBrace)
    }

    pub fn is_closing_bracket(&self) -> bool {
        matches!(self, Token::RParen | Token::RBracket | Token::RBrace)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Token::Newline => return write!(f, "newline"),
            Token::Indent => return write!(f, "indent"),
            Token::Dedent => return write!(f, "dedent"),
            Token::Name(name) => return write!(f, "name '{name}'"),
            Token::Int(n) | Token::Float(n) | Token::Imaginary(n) => return write!(f, "number {n}"),
            Token::Str(_) => return write!(f, "string literal"),
            Token::False => "False",
            Token::None => "None",
            Token::True => "True",
            Token::And => "and",
            Token::As => "as",
            Token::Assert => "assert",
            Token::Async => "async",
            Token::Await => "await",
            Token::Break => "break",
            Token::Class => "class",
            Token::Continue => "continue",
            Token::Def => "def",
            Token::Del => "del",
            Token::Elif => "elif",
            Token::Else => "else",
            Token::Except => "except",
            Token::Finally => "finally",
            Token::For => "for",
            Token::From => "from",
            Token::Global => "global",
            Token::If => "if",
            Token::Import => "import",
            Token::In => "in",
            Token::Is => "is",
            Token::Lambda => "lambda",
            Token::Nonlocal => "nonlocal",
            Token::Not => "not",
            Token::Or => "or",
            Token::Pass => "pass",
            Token::Raise => "raise",
            Token::Return => "return",
            Token::Try => "try",
            Token::While => "while",
            Token::With => "with",
            Token::Yield => "yield",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Ellipsis => "...",
            Token::Arrow => "->",
            Token::Assign => "=",
            Token::Walrus => ":=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::DoubleStar => "**",
            Token::Slash => "/",
            Token::DoubleSlash => "//",
            Token::Percent => "%",
            Token::At => "@",
            Token::LShift => "<<",
            Token::RShift => ">>",
            Token::Amper => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Tilde => "~",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEq => "<=",
            Token::GreaterEq => ">=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::DoubleStarEq => "**=",
            Token::SlashEq => "/=",
            Token::DoubleSlashEq => "//=",
            Token::PercentEq => "%=",
            Token::AtEq => "@=",
            Token::LShiftEq => "<<=",
            Token::RShiftEq => ">>=",
            Token::AmperEq => "&=",
            Token::PipeEq => "|=",
            Token::CaretEq => "^=",
        };
        write!(f, "'{text}'")
    }
}

#[cfg(test)]
mod lexer_tests {
    use logos::Logos;

    use super::{StrLit, Token};

    fn tokens(input: &str) -> Vec<Token> {
        Token::lexer(input).map(|tok| tok.unwrap()).collect()
    }

    fn str_lit(prefix: &str, body: &str, body_offset: usize) -> Token {
        Token::Str(StrLit { prefix: prefix.to_string(), body: body.to_string(), body_offset })
    }

    #[test]
    fn keywords_and_names() {
        assert_eq!(
            tokens("def define"),
            vec![Token::Def, Token::Name("define".to_string())]
        );
    }

    #[test]
    fn string_lit_simple() {
        assert_eq!(tokens(r#""hi""#), vec![str_lit("", "hi", 1)]);
    }

    #[test]
    fn string_lit_prefixed() {
        assert_eq!(tokens(r#"f'/a/{x}'"#), vec![str_lit("f", "/a/{x}", 2)]);
        assert_eq!(tokens(r#"Rb"\d""#), vec![str_lit("rb", r"\d", 3)]);
    }

    #[test]
    fn string_lit_escaped_quote() {
        assert_eq!(tokens(r#""a\"b""#), vec![str_lit("", r#"a\"b"#, 1)]);
    }

    #[test]
    fn string_lit_triple_quoted() {
        assert_eq!(tokens("\"\"\"a\n\"b\" c\"\"\""), vec![str_lit("", "a\n\"b\" c", 3)]);
    }

    #[test]
    fn string_lit_empty() {
        assert_eq!(tokens(r#""" x"#), vec![str_lit("", "", 1), Token::Name("x".to_string())]);
    }

    #[test]
    fn string_lit_unterminated() {
        let mut lexer = Token::lexer("'abc\n'");
        assert!(lexer.next().unwrap().is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens("1 0x1f 1.5 .5 1e3 2j"),
            vec![
                Token::Int("1".to_string()),
                Token::Int("0x1f".to_string()),
                Token::Float("1.5".to_string()),
                Token::Float(".5".to_string()),
                Token::Float("1e3".to_string()),
                Token::Imaginary("2j".to_string()),
            ]
        );
    }

    #[test]
    fn comments_and_continuations_are_skipped() {
        assert_eq!(
            tokens("a # comment\nb \\\n c"),
            vec![
                Token::Name("a".to_string()),
                Token::Newline,
                Token::Name("b".to_string()),
                Token::Name("c".to_string()),
            ]
        );
    }

    #[test]
    fn operators_prefer_longest_match() {
        assert_eq!(
            tokens("**= // -> :="),
            vec![Token::DoubleStarEq, Token::DoubleSlash, Token::Arrow, Token::Walrus]
        );
    }
}
