//! String, bytes and f-string literals.
//!
//! The lexer hands over the raw body of every literal; here escape sequences are
//! decoded, adjacent literals are concatenated and replacement fields of
//! f-strings are parsed as expressions in their own right.

use turbox_lang_ast::*;
use turbox_lang_miette_util::codespan::Span;

use super::Parser;
use crate::lexer::{StrLit, Token};
use crate::result::{ParseError, ParseResult};

impl Parser {
    /// One or more adjacent string literals, concatenated.
    pub(super) fn strings(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut literals = Vec::new();
        while let Some(Token::Str(_)) = self.peek() {
            if let Some((tok_start, Token::Str(lit), tok_end)) = self.bump() {
                literals.push((Span::new(tok_start, tok_end), lit));
            }
        }
        let span = self.span_from(start);

        let is_bytes = literals.first().is_some_and(|(_, lit)| lit.is_bytes());
        if literals.iter().any(|(_, lit)| lit.is_bytes() != is_bytes) {
            return Err(ParseError::invalid_string("cannot mix bytes and nonbytes literals", span));
        }

        if is_bytes {
            let mut bytes = Vec::new();
            for (lit_span, lit) in &literals {
                bytes.extend(decode_bytes(&lit.body, lit.is_raw(), *lit_span)?);
            }
            return Ok(Expr::Literal(Literal { span, kind: LiteralKind::Bytes(bytes) }));
        }

        if !literals.iter().any(|(_, lit)| lit.is_format()) {
            let mut value = String::new();
            for (lit_span, lit) in &literals {
                value.push_str(&decode_str(&lit.body, lit.is_raw(), *lit_span)?);
            }
            return Ok(Expr::Literal(Literal { span, kind: LiteralKind::Str(value) }));
        }

        let mut parts = Vec::new();
        for (lit_span, lit) in &literals {
            if lit.is_format() {
                let base = lit_span.start().to_usize() + lit.body_offset;
                let mut fstring = FStringParser { lit, base, pos: 0, span: *lit_span };
                for part in fstring.parts(false)? {
                    push_part(&mut parts, part);
                }
            } else {
                let text = decode_str(&lit.body, lit.is_raw(), *lit_span)?;
                push_part(&mut parts, FStringPart::Literal(text));
            }
        }
        Ok(Expr::FString(FString { span, parts }))
    }
}

/// Append a part, merging adjacent literal text and dropping empty text.
fn push_part(parts: &mut Vec<FStringPart>, part: FStringPart) {
    match (parts.last_mut(), part) {
        (_, FStringPart::Literal(text)) if text.is_empty() => {}
        (Some(FStringPart::Literal(prev)), FStringPart::Literal(text)) => prev.push_str(&text),
        (_, part) => parts.push(part),
    }
}

/// Decode the escape sequences of a `str` literal body.
pub(crate) fn decode_str(body: &str, raw: bool, span: Span) -> ParseResult<String> {
    if raw {
        return Ok(body.to_string());
    }
    decode_escapes(body, false, span)
}

/// Decode the escape sequences of a `bytes` literal body.
pub(crate) fn decode_bytes(body: &str, raw: bool, span: Span) -> ParseResult<Vec<u8>> {
    if !body.is_ascii() {
        return Err(ParseError::invalid_string(
            "bytes can only contain ASCII literal characters",
            span,
        ));
    }
    let decoded = if raw { body.to_string() } else { decode_escapes(body, true, span)? };
    // Every char is at most U+00FF here, see `decode_escapes`.
    Ok(decoded.chars().map(|c| c as u8).collect())
}

fn decode_escapes(body: &str, bytes: bool, span: Span) -> ParseResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err(ParseError::invalid_string("trailing backslash", span));
        };
        match escape {
            '\n' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if bytes && value > 0xff {
                    return Err(ParseError::invalid_string("octal escape value > 0o377", span));
                }
                out.push(code_point(value, span)?);
            }
            'x' => out.push(code_point(hex_escape(&mut chars, 2, span)?, span)?),
            'u' if !bytes => out.push(code_point(hex_escape(&mut chars, 4, span)?, span)?),
            'U' if !bytes => out.push(code_point(hex_escape(&mut chars, 8, span)?, span)?),
            'N' if !bytes => {
                return Err(ParseError::invalid_string(
                    "named unicode escapes are not supported",
                    span,
                ));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

fn hex_escape(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    digits: usize,
    span: Span,
) -> ParseResult<u32> {
    let mut value = 0;
    for _ in 0..digits {
        let digit = chars.next().and_then(|c| c.to_digit(16)).ok_or_else(|| {
            ParseError::invalid_string(format!("truncated \\x escape, expected {digits} hex digits"), span)
        })?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn code_point(value: u32, span: Span) -> ParseResult<char> {
    char::from_u32(value)
        .ok_or_else(|| ParseError::invalid_string(format!("illegal code point U+{value:X}"), span))
}

/// Splits the body of an f-string into literal text and replacement fields.
struct FStringParser<'a> {
    lit: &'a StrLit,
    /// Source offset of the body
    base: usize,
    /// Current byte offset into the body
    pos: usize,
    /// Span of the whole literal token
    span: Span,
}

impl FStringParser<'_> {
    fn body(&self) -> &str {
        &self.lit.body
    }

    fn byte(&self, offset: usize) -> Option<u8> {
        self.body().as_bytes().get(offset).copied()
    }

    fn error_here(&self, reason: &str) -> ParseError {
        let at = self.base + self.pos;
        ParseError::invalid_string(format!("f-string: {reason}"), Span::new(at, at + 1))
    }

    /// Parts up to the end of the body, or up to the `}` closing a format spec.
    fn parts(&mut self, in_format_spec: bool) -> ParseResult<Vec<FStringPart>> {
        let mut parts = Vec::new();
        let mut text = String::new();
        while let Some(b) = self.byte(self.pos) {
            match b {
                b'{' if !in_format_spec && self.byte(self.pos + 1) == Some(b'{') => {
                    text.push('{');
                    self.pos += 2;
                }
                b'{' => {
                    self.flush(&mut parts, &mut text)?;
                    parts.push(FStringPart::Field(self.field()?));
                }
                b'}' if in_format_spec => break,
                b'}' if self.byte(self.pos + 1) == Some(b'}') => {
                    text.push('}');
                    self.pos += 2;
                }
                b'}' => return Err(self.error_here("single '}' is not allowed")),
                b'\\' if !self.lit.is_raw() => {
                    // Keep the escape pair together, it is decoded on flush.
                    let escaped: String = self.body()[self.pos..].chars().take(2).collect();
                    self.pos += escaped.len();
                    text.push_str(&escaped);
                }
                _ => {
                    let c = self.body()[self.pos..].chars().next().unwrap_or_default();
                    text.push(c);
                    self.pos += c.len_utf8().max(1);
                }
            }
        }
        self.flush(&mut parts, &mut text)?;
        Ok(parts)
    }

    fn flush(&self, parts: &mut Vec<FStringPart>, text: &mut String) -> ParseResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let decoded = decode_str(text, self.lit.is_raw(), self.span)?;
        push_part(parts, FStringPart::Literal(decoded));
        text.clear();
        Ok(())
    }

    /// A replacement field starting at the current `{`.
    fn field(&mut self) -> ParseResult<FormattedValue> {
        let open = self.pos;
        self.pos += 1;
        let expr_start = self.pos;

        // Find the end of the expression: a `}`, `!` or `:` outside of brackets and strings.
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        loop {
            let Some(b) = self.byte(self.pos) else {
                return Err(self.error_here("expecting '}'"));
            };
            if let Some(q) = quote {
                if b == b'\\' {
                    self.pos += 1;
                } else if b == q {
                    quote = None;
                }
                self.pos += 1;
                continue;
            }
            match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' if depth > 0 => depth -= 1,
                b'}' => break,
                b'!' if depth == 0 && self.byte(self.pos + 1) != Some(b'=') => break,
                b':' if depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }

        let raw_expr = &self.body()[expr_start..self.pos];
        let trimmed = raw_expr.trim_end();
        let debug = trimmed.ends_with('=')
            && !["==", "!=", "<=", ">="].iter().any(|op| trimmed.ends_with(op));
        let expr_text = if debug { &trimmed[..trimmed.len() - 1] } else { raw_expr };
        if expr_text.trim().is_empty() {
            return Err(self.error_here("empty expression not allowed"));
        }
        let expr = Parser::nested(expr_text, self.base + expr_start)?.parse_single_expression()?;

        let conversion = if self.byte(self.pos) == Some(b'!') {
            self.pos += 1;
            match self.byte(self.pos) {
                Some(c @ (b's' | b'r' | b'a')) => {
                    self.pos += 1;
                    Some(c as char)
                }
                _ => return Err(self.error_here("invalid conversion character")),
            }
        } else {
            None
        };

        let format_spec = if self.byte(self.pos) == Some(b':') {
            self.pos += 1;
            Some(self.parts(true)?)
        } else {
            None
        };

        if self.byte(self.pos) != Some(b'}') {
            return Err(self.error_here("expecting '}'"));
        }
        self.pos += 1;

        Ok(FormattedValue {
            span: Span::new(self.base + open, self.base + self.pos),
            expr: Box::new(expr),
            conversion,
            format_spec,
            debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_miette_util::codespan::Span;

    use super::{decode_bytes, decode_str};

    #[test]
    fn decodes_common_escapes() {
        let span = Span::default();
        assert_eq!(decode_str(r"a\tb\n\x41é\101\'", false, span).unwrap(), "a\tb\nA\u{e9}A'");
    }

    #[test]
    fn keeps_unknown_escapes() {
        assert_eq!(decode_str(r"\d+", false, Span::default()).unwrap(), r"\d+");
    }

    #[test]
    fn raw_strings_are_verbatim() {
        assert_eq!(decode_str(r"\n", true, Span::default()).unwrap(), r"\n");
    }

    #[test]
    fn bytes_escapes() {
        assert_eq!(decode_bytes(r"\xff\x00a", false, Span::default()).unwrap(), vec![0xff, 0, b'a']);
        assert!(decode_bytes("é", false, Span::default()).is_err());
    }

    #[test]
    fn truncated_hex_escape() {
        assert!(decode_str(r"\x4", false, Span::default()).is_err());
    }
}
