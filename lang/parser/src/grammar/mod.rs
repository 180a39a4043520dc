//! Recursive-descent parser for the accepted Python subset.
//!
//! Statements live in this module, expressions in [expr] and string literals
//! in [strings]. Every parsing function consumes exactly the tokens of the
//! construct it returns and fails with the first error it encounters.

use turbox_lang_ast::*;
use turbox_lang_miette_util::ToMiette;
use turbox_lang_miette_util::codespan::Span;

use crate::lexer::{Lexer, Token};
use crate::result::{ParseError, ParseResult};

mod expr;
mod strings;

/// Deepest nesting of brackets, unary operators and blocks, as in CPython.
pub(crate) const MAX_NESTING: usize = 200;

pub(crate) struct Parser {
    tokens: Vec<(usize, Token, usize)>,
    pos: usize,
    /// End offset of the most recently consumed token
    last_end: usize,
    /// Offset reported for errors at the end of input
    eof: usize,
    /// Current recursion depth, see [MAX_NESTING]
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
        Ok(Parser { tokens, pos: 0, last_end: 0, eof: source.len(), depth: 0 })
    }

    /// A parser for an expression that occurs at byte offset `base` of the enclosing source.
    pub fn nested(source: &str, base: usize) -> ParseResult<Self> {
        let tokens = Lexer::nested(source)
            .map(|tok| tok.map(|(start, tok, end)| (start + base, tok, end + base)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| shift_error(err, base))?;
        Ok(Parser { tokens, pos: 0, last_end: base, eof: base + source.len(), depth: 0 })
    }

    // Token cursor
    //
    //

    fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(_, tok, _)| tok)
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn at_name(&self) -> bool {
        matches!(self.peek(), Some(Token::Name(_)))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Start offset of the next token.
    fn start(&self) -> usize {
        self.tokens.get(self.pos).map(|(start, _, _)| *start).unwrap_or(self.eof)
    }

    fn bump(&mut self) -> Option<(usize, Token, usize)> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.last_end = token.2;
        Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<Span> {
        match self.tokens.get(self.pos) {
            Some((start, tok, end)) if *tok == token => {
                let span = Span::new(*start, *end);
                self.bump();
                Ok(span)
            }
            _ => Err(self.unexpected(&token.to_string())),
        }
    }

    fn expect_name(&mut self) -> ParseResult<Ident> {
        match self.tokens.get(self.pos) {
            Some((start, Token::Name(id), end)) => {
                let ident = Ident::new(Span::new(*start, *end), id.clone());
                self.bump();
                Ok(ident)
            }
            _ => Err(self.unexpected("a name")),
        }
    }

    /// Run `parse` one nesting level deeper, failing instead of exhausting the stack.
    fn nest<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            let start = self.start();
            return Err(ParseError::TooDeeplyNested {
                limit: MAX_NESTING,
                span: Span::new(start, start).to_miette(),
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn at_soft_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Name(name)) if name == keyword)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((start, tok, end)) => ParseError::UnexpectedToken {
                found: tok.to_string(),
                expected: expected.to_string(),
                span: Span::new(*start, *end).to_miette(),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span: Span::new(self.eof, self.eof).to_miette(),
            },
        }
    }

    // Statements
    //
    //

    pub fn parse_file(mut self) -> ParseResult<Module> {
        let mut body = Vec::new();
        while !self.at_end() {
            if self.eat(&Token::Newline) {
                continue;
            }
            body.extend(self.statement()?);
        }
        Ok(Module { body })
    }

    /// Parse a single expression spanning the whole input.
    pub fn parse_single_expression(mut self) -> ParseResult<Expr> {
        let expr = self.star_expressions()?;
        if !self.at_end() {
            return Err(self.unexpected("end of expression"));
        }
        Ok(expr)
    }

    fn statement(&mut self) -> ParseResult<Vec<Stmt>> {
        match self.peek() {
            Some(
                Token::Def
                | Token::Class
                | Token::At
                | Token::Async
                | Token::If
                | Token::While
                | Token::For
                | Token::Try
                | Token::With,
            ) => Ok(vec![self.compound_statement()?]),
            _ if self.at_soft_keyword("match") => match self.match_statement()? {
                Some(stmt) => Ok(vec![stmt]),
                None => self.simple_statements(),
            },
            _ => self.simple_statements(),
        }
    }

    fn simple_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = vec![self.simple_statement()?];
        while self.eat(&Token::Semicolon) {
            if self.at(&Token::Newline) {
                break;
            }
            stmts.push(self.simple_statement()?);
        }
        self.expect(Token::Newline)?;
        Ok(stmts)
    }

    /// `: NEWLINE INDENT stmt+ DEDENT` or `: simple_stmts`
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.nest(Self::suite)
    }

    fn suite(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(Token::Colon)?;
        if !self.eat(&Token::Newline) {
            return self.simple_statements();
        }
        if !self.eat(&Token::Indent) {
            return Err(self.unexpected("an indented block"));
        }
        let mut body = Vec::new();
        while !self.eat(&Token::Dedent) {
            if self.at_end() {
                return Err(self.unexpected("dedent"));
            }
            body.extend(self.statement()?);
        }
        Ok(body)
    }

    fn at_simple_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Newline | Token::Semicolon))
    }

    fn simple_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        match self.peek() {
            Some(Token::Pass) => {
                self.bump();
                Ok(Stmt::Pass(self.span_from(start)))
            }
            Some(Token::Break) => {
                self.bump();
                Ok(Stmt::Break(self.span_from(start)))
            }
            Some(Token::Continue) => {
                self.bump();
                Ok(Stmt::Continue(self.span_from(start)))
            }
            Some(Token::Return) => {
                self.bump();
                let value = if self.at_simple_end() { None } else { Some(self.star_expressions()?) };
                Ok(Stmt::Return(Return { span: self.span_from(start), value }))
            }
            Some(Token::Raise) => {
                self.bump();
                let exc = if self.at_simple_end() { None } else { Some(self.expression()?) };
                let cause = if exc.is_some() && self.eat(&Token::From) {
                    Some(self.expression()?)
                } else {
                    None
                };
                Ok(Stmt::Raise(Raise { span: self.span_from(start), exc, cause }))
            }
            Some(Token::Global | Token::Nonlocal) => {
                let is_global = self.at(&Token::Global);
                self.bump();
                let mut names = vec![self.expect_name()?];
                while self.eat(&Token::Comma) {
                    names.push(self.expect_name()?);
                }
                let names = Names { span: self.span_from(start), names };
                Ok(if is_global { Stmt::Global(names) } else { Stmt::Nonlocal(names) })
            }
            Some(Token::Del) => {
                self.bump();
                let mut targets = vec![self.bitwise_or()?];
                while self.eat(&Token::Comma) {
                    if self.at_simple_end() {
                        break;
                    }
                    targets.push(self.bitwise_or()?);
                }
                for target in &targets {
                    check_target(target)?;
                }
                Ok(Stmt::Delete(Delete { span: self.span_from(start), targets }))
            }
            Some(Token::Assert) => {
                self.bump();
                let test = self.expression()?;
                let msg = if self.eat(&Token::Comma) { Some(self.expression()?) } else { None };
                Ok(Stmt::Assert(Assert { span: self.span_from(start), test, msg }))
            }
            Some(Token::Import) => self.import_statement(),
            Some(Token::From) => self.import_from_statement(),
            _ => self.expression_statement(),
        }
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let first = self.assignment_value()?;

        if self.eat(&Token::Colon) {
            check_single_target(&first)?;
            let annotation = self.expression()?;
            let value =
                if self.eat(&Token::Assign) { Some(self.assignment_value()?) } else { None };
            return Ok(Stmt::AnnAssign(AnnAssign {
                span: self.span_from(start),
                target: first,
                annotation,
                value,
            }));
        }

        if let Some(op) = self.peek().and_then(augmented_operator) {
            check_single_target(&first)?;
            self.bump();
            let value = self.assignment_value()?;
            return Ok(Stmt::AugAssign(AugAssign {
                span: self.span_from(start),
                target: first,
                op,
                value,
            }));
        }

        if self.at(&Token::Assign) {
            let mut targets = vec![first];
            while self.eat(&Token::Assign) {
                targets.push(self.assignment_value()?);
            }
            let value = targets.pop().ok_or_else(|| self.unexpected("an expression"))?;
            for target in &targets {
                check_target(target)?;
            }
            return Ok(Stmt::Assign(Assign { span: self.span_from(start), targets, value }));
        }

        Ok(Stmt::Expr(ExprStmt { span: self.span_from(start), value: first }))
    }

    fn assignment_value(&mut self) -> ParseResult<Expr> {
        if self.at(&Token::Yield) { self.yield_expression() } else { self.star_expressions() }
    }

    // Imports
    //
    //

    fn dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_name()?.id;
        while self.eat(&Token::Dot) {
            name.push('.');
            name.push_str(&self.expect_name()?.id);
        }
        Ok(name)
    }

    fn import_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.expect(Token::Import)?;
        let mut names = Vec::new();
        loop {
            let alias_start = self.start();
            let name = self.dotted_name()?;
            let asname = if self.eat(&Token::As) { Some(self.expect_name()?) } else { None };
            names.push(Alias { span: self.span_from(alias_start), name, asname });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(Stmt::Import(Import { span: self.span_from(start), names }))
    }

    fn import_from_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.expect(Token::From)?;
        let mut level = 0;
        loop {
            if self.eat(&Token::Dot) {
                level += 1;
            } else if self.eat(&Token::Ellipsis) {
                level += 3;
            } else {
                break;
            }
        }
        let module = if self.at_name() { Some(self.dotted_name()?) } else { None };
        if level == 0 && module.is_none() {
            return Err(self.unexpected("a module name"));
        }
        self.expect(Token::Import)?;

        let mut names = Vec::new();
        let star_start = self.start();
        if self.eat(&Token::Star) {
            names.push(Alias { span: self.span_from(star_start), name: "*".to_string(), asname: None });
        } else {
            let parenthesized = self.eat(&Token::LParen);
            loop {
                let alias_start = self.start();
                let name = self.expect_name()?.id;
                let asname = if self.eat(&Token::As) { Some(self.expect_name()?) } else { None };
                names.push(Alias { span: self.span_from(alias_start), name, asname });
                if !self.eat(&Token::Comma) || (parenthesized && self.at(&Token::RParen)) {
                    break;
                }
            }
            if parenthesized {
                self.expect(Token::RParen)?;
            }
        }
        Ok(Stmt::ImportFrom(ImportFrom { span: self.span_from(start), module, level, names }))
    }

    // Compound statements
    //
    //

    fn compound_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        match self.peek() {
            Some(Token::At) => {
                let decorators = self.decorators()?;
                let start = self.start();
                match self.peek() {
                    Some(Token::Def) => self.function_def(start, decorators, false),
                    Some(Token::Async) => {
                        self.bump();
                        self.function_def(start, decorators, true)
                    }
                    Some(Token::Class) => self.class_def(start, decorators),
                    _ => Err(self.unexpected("'def' or 'class' after decorators")),
                }
            }
            Some(Token::Def) => self.function_def(start, Vec::new(), false),
            Some(Token::Class) => self.class_def(start, Vec::new()),
            Some(Token::If) => Ok(Stmt::If(self.if_statement()?)),
            Some(Token::While) => self.while_statement(),
            Some(Token::For) => self.for_statement(start, false),
            Some(Token::Try) => self.try_statement(),
            Some(Token::With) => self.with_statement(start, false),
            Some(Token::Async) => {
                self.bump();
                match self.peek() {
                    Some(Token::Def) => self.function_def(start, Vec::new(), true),
                    Some(Token::For) => self.for_statement(start, true),
                    Some(Token::With) => self.with_statement(start, true),
                    _ => Err(self.unexpected("'def', 'for' or 'with' after 'async'")),
                }
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    fn decorators(&mut self) -> ParseResult<Vec<Decorator>> {
        let mut decorators = Vec::new();
        while self.at(&Token::At) {
            let start = self.start();
            self.bump();
            let expr = self.named_expression()?;
            let span = self.span_from(start);
            self.expect(Token::Newline)?;
            decorators.push(Decorator { span, expr });
        }
        Ok(decorators)
    }

    fn function_def(
        &mut self,
        start: usize,
        decorators: Vec<Decorator>,
        is_async: bool,
    ) -> ParseResult<Stmt> {
        self.expect(Token::Def)?;
        let name = self.expect_name()?;
        self.expect(Token::LParen)?;
        let params = self.parameters(true, &Token::RParen)?;
        self.expect(Token::RParen)?;
        let returns = if self.eat(&Token::Arrow) { Some(self.expression()?) } else { None };
        let body = self.block()?;
        Ok(Stmt::FunctionDef(FunctionDef {
            span: self.span_from(start),
            name,
            params,
            returns,
            body,
            decorators,
            is_async,
        }))
    }

    /// Parameter list up to (not including) `close`.
    ///
    /// Annotations are only accepted for `def`, never for `lambda`.
    fn parameters(&mut self, annotated: bool, close: &Token) -> ParseResult<Parameters> {
        let mut params = Parameters::default();
        let mut seen_star = false;
        loop {
            if self.at(close) {
                break;
            }
            let start = self.start();
            if self.at(&Token::Slash) {
                if seen_star || !params.posonly.is_empty() || params.args.is_empty() {
                    return Err(self.unexpected("a parameter"));
                }
                self.bump();
                params.posonly = std::mem::take(&mut params.args);
            } else if self.eat(&Token::DoubleStar) {
                params.kwarg = Some(self.param(start, annotated, false)?);
            } else if self.at(&Token::Star) {
                if seen_star {
                    return Err(self.unexpected("a parameter"));
                }
                self.bump();
                seen_star = true;
                if self.at_name() {
                    params.vararg = Some(self.param(start, annotated, false)?);
                }
            } else {
                let param = self.param(start, annotated, true)?;
                if seen_star {
                    params.kwonly.push(param);
                } else {
                    params.args.push(param);
                }
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn param(&mut self, start: usize, annotated: bool, with_default: bool) -> ParseResult<Param> {
        let name = self.expect_name()?;
        let annotation =
            if annotated && self.eat(&Token::Colon) { Some(self.expression()?) } else { None };
        let default =
            if with_default && self.eat(&Token::Assign) { Some(self.expression()?) } else { None };
        Ok(Param { span: self.span_from(start), name, annotation, default })
    }

    fn class_def(&mut self, start: usize, decorators: Vec<Decorator>) -> ParseResult<Stmt> {
        self.expect(Token::Class)?;
        let name = self.expect_name()?;
        let (bases, keywords) = if self.eat(&Token::LParen) {
            let arguments = self.call_arguments()?;
            self.expect(Token::RParen)?;
            arguments
        } else {
            (Vec::new(), Vec::new())
        };
        let body = self.block()?;
        Ok(Stmt::ClassDef(ClassDef {
            span: self.span_from(start),
            name,
            bases,
            keywords,
            body,
            decorators,
        }))
    }

    /// `if` or `elif` and everything that follows it.
    fn if_statement(&mut self) -> ParseResult<If> {
        let start = self.start();
        self.bump();
        let test = self.named_expression()?;
        let body = self.block()?;
        let orelse = if self.at(&Token::Elif) {
            vec![Stmt::If(self.if_statement()?)]
        } else if self.eat(&Token::Else) {
            self.block()?
        } else {
            Vec::new()
        };
        Ok(If { span: self.span_from(start), test, body, orelse })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.expect(Token::While)?;
        let test = self.named_expression()?;
        let body = self.block()?;
        let orelse = if self.eat(&Token::Else) { self.block()? } else { Vec::new() };
        Ok(Stmt::While(While { span: self.span_from(start), test, body, orelse }))
    }

    fn for_statement(&mut self, start: usize, is_async: bool) -> ParseResult<Stmt> {
        self.expect(Token::For)?;
        let target = self.target_list()?;
        self.expect(Token::In)?;
        let iter = self.star_expressions()?;
        let body = self.block()?;
        let orelse = if self.eat(&Token::Else) { self.block()? } else { Vec::new() };
        Ok(Stmt::For(For { span: self.span_from(start), target, iter, body, orelse, is_async }))
    }

    fn try_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.expect(Token::Try)?;
        let body = self.block()?;

        let mut handlers = Vec::new();
        while self.at(&Token::Except) {
            let handler_start = self.start();
            self.bump();
            // `except*` for exception groups
            self.eat(&Token::Star);
            let typ = if self.at(&Token::Colon) { None } else { Some(self.expression()?) };
            let name = if self.eat(&Token::As) { Some(self.expect_name()?) } else { None };
            let body = self.block()?;
            handlers.push(ExceptHandler { span: self.span_from(handler_start), typ, name, body });
        }

        let orelse = if self.eat(&Token::Else) { self.block()? } else { Vec::new() };
        let finalbody = if self.eat(&Token::Finally) { self.block()? } else { Vec::new() };
        if handlers.is_empty() && finalbody.is_empty() {
            return Err(self.unexpected("'except' or 'finally'"));
        }
        Ok(Stmt::Try(Try { span: self.span_from(start), body, handlers, orelse, finalbody }))
    }

    fn with_statement(&mut self, start: usize, is_async: bool) -> ParseResult<Stmt> {
        self.expect(Token::With)?;
        let items = match self.parenthesized_with_items() {
            Some(items) => items,
            None => self.with_items(None)?,
        };
        let body = self.block()?;
        Ok(Stmt::With(With { span: self.span_from(start), items, body, is_async }))
    }

    /// `with (a as x, b as y,):`. Restores the position if the parentheses
    /// turn out to belong to the first context expression.
    fn parenthesized_with_items(&mut self) -> Option<Vec<WithItem>> {
        if !self.at(&Token::LParen) {
            return None;
        }
        let (pos, last_end) = (self.pos, self.last_end);
        self.bump();
        if let Ok(items) = self.with_items(Some(&Token::RParen)) {
            if self.eat(&Token::RParen) && self.at(&Token::Colon) {
                return Some(items);
            }
        }
        self.pos = pos;
        self.last_end = last_end;
        None
    }

    fn with_items(&mut self, close: Option<&Token>) -> ParseResult<Vec<WithItem>> {
        let mut items = Vec::new();
        loop {
            let context = self.expression()?;
            let optional_vars = if self.eat(&Token::As) {
                let target = self.star_target()?;
                check_target(&target)?;
                Some(target)
            } else {
                None
            };
            items.push(WithItem { context, optional_vars });
            if !self.eat(&Token::Comma) || close.is_some_and(|close| self.at(close)) {
                break;
            }
        }
        Ok(items)
    }

    /// `match subject:` followed by an indented block of `case` clauses.
    ///
    /// `match` is a soft keyword: returns `None` with the position unchanged if
    /// the line is not a match statement.
    fn match_statement(&mut self) -> ParseResult<Option<Stmt>> {
        let (pos, last_end) = (self.pos, self.last_end);
        let start = self.start();
        self.bump();
        let subject = match self.star_expressions() {
            Ok(subject) if self.at(&Token::Colon) && self.peek_nth(1) == Some(&Token::Newline) => subject,
            _ => {
                self.pos = pos;
                self.last_end = last_end;
                return Ok(None);
            }
        };
        self.expect(Token::Colon)?;
        self.expect(Token::Newline)?;
        if !self.eat(&Token::Indent) {
            return Err(self.unexpected("an indented block"));
        }
        let mut cases = Vec::new();
        while !self.eat(&Token::Dedent) {
            if !self.at_soft_keyword("case") {
                return Err(self.unexpected("'case'"));
            }
            cases.push(self.match_case()?);
        }
        Ok(Some(Stmt::Match(Match { span: self.span_from(start), subject, cases })))
    }

    fn match_case(&mut self) -> ParseResult<MatchCase> {
        let start = self.start();
        self.bump();
        let (pattern_start, pattern_pos) = (self.start(), self.pos);
        let mut captures = Vec::new();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Some(Token::Colon | Token::If) if depth == 0 => break,
                None | Some(Token::Newline) => return Err(self.unexpected("':'")),
                Some(tok) if tok.is_opening_bracket() => depth += 1,
                Some(tok) if tok.is_closing_bracket() => depth = depth.saturating_sub(1),
                Some(Token::Name(_)) => {
                    // Class names, keyword names and dotted value patterns bind nothing.
                    let after_dot = self.pos > 0
                        && matches!(self.tokens.get(self.pos - 1), Some((_, Token::Dot, _)));
                    let before = self.peek_nth(1);
                    let binds = !after_dot
                        && !matches!(before, Some(Token::Dot | Token::LParen | Token::Assign));
                    if binds {
                        captures.push(self.expect_name()?);
                        continue;
                    }
                }
                Some(_) => {}
            }
            self.bump();
        }
        if self.pos == pattern_pos {
            return Err(self.unexpected("a pattern"));
        }
        let pattern = self.span_from(pattern_start);
        let guard = if self.eat(&Token::If) { Some(self.named_expression()?) } else { None };
        let body = self.block()?;
        Ok(MatchCase { span: self.span_from(start), pattern, captures, guard, body })
    }
}

fn augmented_operator(token: &Token) -> Option<BinOperator> {
    let op = match token {
        Token::PlusEq => BinOperator::Add,
        Token::MinusEq => BinOperator::Sub,
        Token::StarEq => BinOperator::Mult,
        Token::AtEq => BinOperator::MatMult,
        Token::SlashEq => BinOperator::Div,
        Token::DoubleSlashEq => BinOperator::FloorDiv,
        Token::PercentEq => BinOperator::Mod,
        Token::DoubleStarEq => BinOperator::Pow,
        Token::LShiftEq => BinOperator::LShift,
        Token::RShiftEq => BinOperator::RShift,
        Token::PipeEq => BinOperator::BitOr,
        Token::CaretEq => BinOperator::BitXor,
        Token::AmperEq => BinOperator::BitAnd,
        _ => return None,
    };
    Some(op)
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal(_) | Expr::FString(_) => "literal",
        Expr::Call(_) => "function call",
        Expr::Lambda(_) => "lambda",
        Expr::Comprehension(_) => "comprehension",
        Expr::Await(_) => "await expression",
        Expr::Yield(_) | Expr::YieldFrom(_) => "yield expression",
        Expr::Compare(_) => "comparison",
        Expr::NamedExpr(_) => "named expression",
        Expr::IfExp(_) => "conditional expression",
        Expr::Dict(_) => "dict literal",
        Expr::Set(_) => "set display",
        _ => "expression",
    }
}

/// Targets of `=`, `for`, `with ... as` and `del`.
fn check_target(expr: &Expr) -> ParseResult<()> {
    match expr {
        Expr::Name(_) | Expr::Attribute(_) | Expr::Subscript(_) => Ok(()),
        Expr::Starred(Starred { value, .. }) => check_target(value),
        Expr::Tuple(Sequence { elts, .. }) | Expr::List(Sequence { elts, .. }) => {
            elts.iter().try_for_each(check_target)
        }
        other => Err(ParseError::InvalidTarget {
            what: describe(other).to_string(),
            span: other.span().to_miette(),
        }),
    }
}

/// Targets of annotated and augmented assignments.
fn check_single_target(expr: &Expr) -> ParseResult<()> {
    match expr {
        Expr::Name(_) | Expr::Attribute(_) | Expr::Subscript(_) => Ok(()),
        Expr::Tuple(_) | Expr::List(_) => Err(ParseError::InvalidTarget {
            what: "tuple or list in this context".to_string(),
            span: expr.span().to_miette(),
        }),
        other => check_target(other),
    }
}

fn shift_error(err: ParseError, base: usize) -> ParseError {
    let shift = |span: miette::SourceSpan| {
        miette::SourceSpan::new((span.offset() + base).into(), span.len())
    };
    match err {
        ParseError::InvalidToken { span } => ParseError::InvalidToken { span: shift(span) },
        ParseError::UnterminatedString { span } => {
            ParseError::UnterminatedString { span: shift(span) }
        }
        ParseError::InconsistentDedent { span } => {
            ParseError::InconsistentDedent { span: shift(span) }
        }
        ParseError::UnmatchedBracket { bracket, span } => {
            ParseError::UnmatchedBracket { bracket, span: shift(span) }
        }
        ParseError::UnexpectedToken { found, expected, span } => {
            ParseError::UnexpectedToken { found, expected, span: shift(span) }
        }
        ParseError::UnexpectedEof { expected, span } => {
            ParseError::UnexpectedEof { expected, span: shift(span) }
        }
        ParseError::InvalidString { reason, span } => {
            ParseError::InvalidString { reason, span: shift(span) }
        }
        ParseError::InvalidTarget { what, span } => {
            ParseError::InvalidTarget { what, span: shift(span) }
        }
        ParseError::TooDeeplyNested { limit, span } => {
            ParseError::TooDeeplyNested { limit, span: shift(span) }
        }
    }
}
