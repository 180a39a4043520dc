use std::collections::VecDeque;

use logos::{Logos, SpannedIter};
use turbox_lang_miette_util::ToMiette;
use turbox_lang_miette_util::codespan::Span;

use super::Token;
use crate::result::ParseError;

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

/// Tab stops are at multiples of 8 columns.
const TAB_WIDTH: usize = 8;

/// Token iterator which synthesises `Newline`, `Indent` and `Dedent` from the
/// physical layout of the source.
///
/// Line breaks are only significant outside of brackets, and blank or
/// comment-only lines never produce tokens. At the end of input a final
/// `Newline` and one `Dedent` per open block are emitted.
pub struct Lexer<'input> {
    input: &'input str,
    // instead of an iterator over characters, we have a token iterator
    token_stream: SpannedIter<'input, Token>,
    /// Stack of indentation columns of the enclosing blocks, bottom is always 0
    indents: Vec<usize>,
    /// Nesting depth of open brackets
    depth: usize,
    at_line_start: bool,
    /// Lex a single expression without any layout tokens (used for f-string fields)
    nested: bool,
    pending: VecDeque<(usize, Token, usize)>,
    done: bool,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        // the Token::lexer() method is provided by the Logos trait
        Self {
            input,
            token_stream: Token::lexer(input).spanned(),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            nested: false,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// A lexer for an expression embedded in another token, e.g. a replacement field.
    pub fn nested(input: &'input str) -> Self {
        Self { nested: true, at_line_start: false, ..Self::new(input) }
    }

    fn column(&self, offset: usize) -> usize {
        let line_start = self.input[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.input[line_start..offset].chars().fold(0, |column, c| match c {
            '\t' => (column / TAB_WIDTH + 1) * TAB_WIDTH,
            '\x0c' => 0,
            _ => column + 1,
        })
    }

    fn current_indent(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    /// Compare the indentation of the first token of a logical line with the
    /// enclosing blocks and queue the resulting `Indent`/`Dedent` tokens.
    fn indent_to(&mut self, offset: usize) -> Result<(), ParseError> {
        let column = self.column(offset);
        if column > self.current_indent() {
            self.indents.push(column);
            self.pending.push_back((offset, Token::Indent, offset));
            return Ok(());
        }
        while column < self.current_indent() {
            self.indents.pop();
            self.pending.push_back((offset, Token::Dedent, offset));
        }
        if column != self.current_indent() {
            return Err(ParseError::InconsistentDedent {
                span: Span::new(offset, offset).to_miette(),
            });
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.done = true;
        if self.nested {
            return;
        }
        let end = self.input.len();
        if !self.at_line_start {
            self.pending.push_back((end, Token::Newline, end));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.pending.push_back((end, Token::Dedent, end));
        }
    }

    fn fail(&mut self, err: ParseError) -> Option<Spanned<Token, usize, ParseError>> {
        self.done = true;
        self.pending.clear();
        Some(Err(err))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Spanned<Token, usize, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }
            match self.token_stream.next() {
                None => self.finish(),
                Some((Err(err), span)) => {
                    return self.fail(ParseError::lexical(err, Span::from(span)));
                }
                Some((Ok(Token::Newline), span)) => {
                    if self.nested || self.depth > 0 || self.at_line_start {
                        continue;
                    }
                    self.at_line_start = true;
                    return Some(Ok((span.start, Token::Newline, span.end)));
                }
                Some((Ok(token), span)) => {
                    if self.at_line_start {
                        self.at_line_start = false;
                        if let Err(err) = self.indent_to(span.start) {
                            return self.fail(err);
                        }
                    }
                    if token.is_opening_bracket() {
                        self.depth += 1;
                    } else if token.is_closing_bracket() {
                        if self.depth == 0 {
                            let bracket = match token {
                                Token::RParen => ")",
                                Token::RBracket => "]",
                                _ => "}",
                            };
                            return self.fail(ParseError::UnmatchedBracket {
                                bracket: bracket.to_string(),
                                span: Span::from(span).to_miette(),
                            });
                        }
                        self.depth -= 1;
                    }
                    self.pending.push_back((span.start, token, span.end));
                }
            }
        }
    }
}

#[cfg(test)]
mod layout_tests {
    use super::{Lexer, Token};
    use crate::ParseError;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).map(|tok| tok.unwrap().1).collect()
    }

    fn name(s: &str) -> Token {
        Token::Name(s.to_string())
    }

    #[test]
    fn indented_block() {
        assert_eq!(
            tokens("if x:\n    y\nz\n"),
            vec![
                Token::If,
                name("x"),
                Token::Colon,
                Token::Newline,
                Token::Indent,
                name("y"),
                Token::Newline,
                Token::Dedent,
                name("z"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(
            tokens("\n# leading\nx\n\n   # indented comment\ny"),
            vec![name("x"), Token::Newline, name("y"), Token::Newline]
        );
    }

    #[test]
    fn newlines_inside_brackets_are_ignored() {
        assert_eq!(
            tokens("f(a,\n      b)\n"),
            vec![
                name("f"),
                Token::LParen,
                name("a"),
                Token::Comma,
                name("b"),
                Token::RParen,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn dedents_are_closed_at_end_of_input() {
        assert_eq!(
            tokens("def f():\n\tif x:\n\t\treturn"),
            vec![
                Token::Def,
                name("f"),
                Token::LParen,
                Token::RParen,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::If,
                name("x"),
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Return,
                Token::Newline,
                Token::Dedent,
                Token::Dedent,
            ]
        );
    }

    #[test]
    fn inconsistent_dedent() {
        let result: Result<Vec<_>, _> = Lexer::new("if x:\n    y\n  z\n").collect();
        assert!(matches!(result, Err(ParseError::InconsistentDedent { .. })));
    }

    #[test]
    fn unmatched_closing_bracket() {
        let result: Result<Vec<_>, _> = Lexer::new("x)\n").collect();
        assert!(matches!(result, Err(ParseError::UnmatchedBracket { .. })));
    }

    #[test]
    fn nested_lexer_emits_no_layout() {
        let toks: Vec<_> = Lexer::nested(" a +\n b").map(|tok| tok.unwrap().1).collect();
        assert_eq!(toks, vec![name("a"), Token::Plus, name("b")]);
    }
}
