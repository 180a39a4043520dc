use turbox_lang_ast::*;

use super::{Parser, check_target};
use crate::lexer::Token;
use crate::result::ParseResult;

impl Parser {
    /// Whether the next token can begin an expression.
    fn starts_expression(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Name(_)
                    | Token::Int(_)
                    | Token::Float(_)
                    | Token::Imaginary(_)
                    | Token::Str(_)
                    | Token::True
                    | Token::False
                    | Token::None
                    | Token::Ellipsis
                    | Token::LParen
                    | Token::LBracket
                    | Token::LBrace
                    | Token::Minus
                    | Token::Plus
                    | Token::Tilde
                    | Token::Not
                    | Token::Lambda
                    | Token::Await
                    | Token::Star
            )
        )
    }

    /// A comma-separated list of expressions, which forms a tuple if it contains a comma.
    pub(super) fn star_expressions(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.star_expression()?;
        if !self.at(&Token::Comma) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if !self.starts_expression() {
                break;
            }
            elts.push(self.star_expression()?);
        }
        Ok(Expr::Tuple(Sequence { span: self.span_from(start), elts }))
    }

    fn star_expression(&mut self) -> ParseResult<Expr> {
        if self.at(&Token::Star) {
            let start = self.start();
            self.bump();
            let value = self.bitwise_or()?;
            return Ok(Expr::Starred(Starred { span: self.span_from(start), value: Box::new(value) }));
        }
        self.expression()
    }

    fn star_named_expression(&mut self) -> ParseResult<Expr> {
        if self.at(&Token::Star) { self.star_expression() } else { self.named_expression() }
    }

    pub(super) fn named_expression(&mut self) -> ParseResult<Expr> {
        if self.at_name() && self.peek_nth(1) == Some(&Token::Walrus) {
            let start = self.start();
            let target = self.expect_name()?;
            self.bump();
            let value = self.expression()?;
            return Ok(Expr::NamedExpr(NamedExpr {
                span: self.span_from(start),
                target,
                value: Box::new(value),
            }));
        }
        self.expression()
    }

    pub(super) fn expression(&mut self) -> ParseResult<Expr> {
        self.nest(Self::conditional)
    }

    /// `body if test else orelse`, a lambda, or a plain disjunction.
    fn conditional(&mut self) -> ParseResult<Expr> {
        if self.at(&Token::Lambda) {
            return self.lambda();
        }
        let start = self.start();
        let body = self.disjunction()?;
        if !self.eat(&Token::If) {
            return Ok(body);
        }
        let test = self.disjunction()?;
        self.expect(Token::Else)?;
        let orelse = self.expression()?;
        Ok(Expr::IfExp(IfExp {
            span: self.span_from(start),
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        }))
    }

    fn lambda(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(Token::Lambda)?;
        let params = self.parameters(false, &Token::Colon)?;
        self.expect(Token::Colon)?;
        let body = self.expression()?;
        Ok(Expr::Lambda(Lambda { span: self.span_from(start), params: Box::new(params), body: Box::new(body) }))
    }

    pub(super) fn yield_expression(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(Token::Yield)?;
        if self.eat(&Token::From) {
            let value = self.expression()?;
            return Ok(Expr::YieldFrom(YieldFrom {
                span: self.span_from(start),
                value: Box::new(value),
            }));
        }
        let value =
            if self.starts_expression() { Some(Box::new(self.star_expressions()?)) } else { None };
        Ok(Expr::Yield(Yield { span: self.span_from(start), value }))
    }

    // Boolean operators and comparisons
    //
    //

    fn disjunction(&mut self) -> ParseResult<Expr> {
        self.bool_op(BoolOperator::Or, &Token::Or, Self::conjunction)
    }

    fn conjunction(&mut self) -> ParseResult<Expr> {
        self.bool_op(BoolOperator::And, &Token::And, Self::inversion)
    }

    fn bool_op(
        &mut self,
        op: BoolOperator,
        token: &Token,
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let first = operand(self)?;
        if !self.at(token) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(token) {
            values.push(operand(self)?);
        }
        Ok(Expr::BoolOp(BoolOp { span: self.span_from(start), op, values }))
    }

    fn inversion(&mut self) -> ParseResult<Expr> {
        if self.at(&Token::Not) {
            let start = self.start();
            self.bump();
            let operand = self.nest(Self::inversion)?;
            return Ok(Expr::UnaryOp(UnaryOp {
                span: self.span_from(start),
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            }));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let left = self.bitwise_or()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        loop {
            let op = match (self.peek(), self.peek_nth(1)) {
                (Some(Token::EqEq), _) => CmpOperator::Eq,
                (Some(Token::NotEq), _) => CmpOperator::NotEq,
                (Some(Token::Less), _) => CmpOperator::Lt,
                (Some(Token::LessEq), _) => CmpOperator::LtE,
                (Some(Token::Greater), _) => CmpOperator::Gt,
                (Some(Token::GreaterEq), _) => CmpOperator::GtE,
                (Some(Token::In), _) => CmpOperator::In,
                (Some(Token::Not), Some(Token::In)) => {
                    self.bump();
                    CmpOperator::NotIn
                }
                (Some(Token::Is), Some(Token::Not)) => {
                    self.bump();
                    CmpOperator::IsNot
                }
                (Some(Token::Is), _) => CmpOperator::Is,
                _ => break,
            };
            self.bump();
            ops.push(op);
            comparators.push(self.bitwise_or()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(Expr::Compare(Compare {
            span: self.span_from(start),
            left: Box::new(left),
            ops,
            comparators,
        }))
    }

    // Binary operators
    //
    //

    fn binary_level(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expr>,
        operator: fn(&Token) -> Option<BinOperator>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let mut left = operand(self)?;
        while let Some(op) = self.peek().and_then(operator) {
            self.bump();
            let right = operand(self)?;
            left = Expr::BinOp(BinOp {
                span: self.span_from(start),
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    pub(super) fn bitwise_or(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::bitwise_xor, |tok| match tok {
            Token::Pipe => Some(BinOperator::BitOr),
            _ => None,
        })
    }

    fn bitwise_xor(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::bitwise_and, |tok| match tok {
            Token::Caret => Some(BinOperator::BitXor),
            _ => None,
        })
    }

    fn bitwise_and(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::shift_expr, |tok| match tok {
            Token::Amper => Some(BinOperator::BitAnd),
            _ => None,
        })
    }

    fn shift_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::sum, |tok| match tok {
            Token::LShift => Some(BinOperator::LShift),
            Token::RShift => Some(BinOperator::RShift),
            _ => None,
        })
    }

    fn sum(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::term, |tok| match tok {
            Token::Plus => Some(BinOperator::Add),
            Token::Minus => Some(BinOperator::Sub),
            _ => None,
        })
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::factor, |tok| match tok {
            Token::Star => Some(BinOperator::Mult),
            Token::Slash => Some(BinOperator::Div),
            Token::DoubleSlash => Some(BinOperator::FloorDiv),
            Token::Percent => Some(BinOperator::Mod),
            Token::At => Some(BinOperator::MatMult),
            _ => None,
        })
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOperator::Pos,
            Some(Token::Minus) => UnaryOperator::Neg,
            Some(Token::Tilde) => UnaryOperator::Invert,
            _ => return self.power(),
        };
        let start = self.start();
        self.bump();
        let operand = self.nest(Self::factor)?;
        Ok(Expr::UnaryOp(UnaryOp { span: self.span_from(start), op, operand: Box::new(operand) }))
    }

    fn power(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let base = self.await_primary()?;
        if !self.eat(&Token::DoubleStar) {
            return Ok(base);
        }
        let exponent = self.factor()?;
        Ok(Expr::BinOp(BinOp {
            span: self.span_from(start),
            left: Box::new(base),
            op: BinOperator::Pow,
            right: Box::new(exponent),
        }))
    }

    fn await_primary(&mut self) -> ParseResult<Expr> {
        if !self.at(&Token::Await) {
            return self.primary();
        }
        let start = self.start();
        self.bump();
        let value = self.primary()?;
        Ok(Expr::Await(Await { span: self.span_from(start), value: Box::new(value) }))
    }

    // Primaries
    //
    //

    fn primary(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut expr = self.atom()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.bump();
                    let attr = self.expect_name()?;
                    expr = Expr::Attribute(Attribute {
                        span: self.span_from(start),
                        value: Box::new(expr),
                        attr,
                    });
                }
                Some(Token::LParen) => {
                    self.bump();
                    let (args, keywords) = self.call_arguments()?;
                    self.expect(Token::RParen)?;
                    expr = Expr::Call(Call {
                        span: self.span_from(start),
                        func: Box::new(expr),
                        args,
                        keywords,
                    });
                }
                Some(Token::LBracket) => {
                    self.bump();
                    let index = self.slices()?;
                    self.expect(Token::RBracket)?;
                    expr = Expr::Subscript(Subscript {
                        span: self.span_from(start),
                        value: Box::new(expr),
                        index: Box::new(index),
                    });
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Arguments of a call or class definition, up to (not including) the closing parenthesis.
    pub(super) fn call_arguments(&mut self) -> ParseResult<(Vec<Expr>, Vec<Keyword>)> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        loop {
            if self.at(&Token::RParen) {
                break;
            }
            let start = self.start();
            if self.eat(&Token::DoubleStar) {
                let value = self.expression()?;
                keywords.push(Keyword { span: self.span_from(start), arg: None, value });
            } else if self.at(&Token::Star) {
                args.push(self.star_expression()?);
            } else if self.at_name() && self.peek_nth(1) == Some(&Token::Assign) {
                let arg = self.expect_name()?;
                self.bump();
                let value = self.expression()?;
                keywords.push(Keyword { span: self.span_from(start), arg: Some(arg), value });
            } else {
                let value = self.named_expression()?;
                if self.at_comprehension() {
                    let generators = self.comprehension_clauses()?;
                    args.push(Expr::Comprehension(Comprehension {
                        span: self.span_from(start),
                        kind: ComprehensionKind::Generator,
                        element: Box::new(value),
                        value: None,
                        generators,
                    }));
                } else {
                    args.push(value);
                }
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok((args, keywords))
    }

    fn slices(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.slice()?;
        if !self.at(&Token::Comma) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if self.at(&Token::RBracket) {
                break;
            }
            elts.push(self.slice()?);
        }
        Ok(Expr::Tuple(Sequence { span: self.span_from(start), elts }))
    }

    fn slice(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let lower = if self.at(&Token::Colon) {
            None
        } else {
            let expr = self.star_named_expression()?;
            if !self.at(&Token::Colon) {
                return Ok(expr);
            }
            Some(Box::new(expr))
        };
        self.expect(Token::Colon)?;
        let ends_slice =
            |p: &Self| matches!(p.peek(), Some(Token::Colon | Token::RBracket | Token::Comma));
        let upper = if ends_slice(self) { None } else { Some(Box::new(self.expression()?)) };
        let step = if self.eat(&Token::Colon) && !ends_slice(self) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        Ok(Expr::Slice(Slice { span: self.span_from(start), lower, upper, step }))
    }

    // Atoms
    //
    //

    fn atom(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let kind = match self.peek() {
            Some(Token::Name(_)) => return Ok(Expr::Name(self.expect_name()?)),
            Some(Token::Str(_)) => return self.strings(),
            Some(Token::LParen) => return self.parenthesized(),
            Some(Token::LBracket) => return self.list_display(),
            Some(Token::LBrace) => return self.brace_display(),
            Some(Token::True) => LiteralKind::Bool(true),
            Some(Token::False) => LiteralKind::Bool(false),
            Some(Token::None) => LiteralKind::None,
            Some(Token::Ellipsis) => LiteralKind::Ellipsis,
            Some(Token::Int(n)) => LiteralKind::Int(n.clone()),
            Some(Token::Float(n)) => LiteralKind::Float(n.clone()),
            Some(Token::Imaginary(n)) => LiteralKind::Complex(n.clone()),
            _ => return Err(self.unexpected("an expression")),
        };
        self.bump();
        Ok(Expr::Literal(Literal { span: self.span_from(start), kind }))
    }

    fn at_comprehension(&self) -> bool {
        self.at(&Token::For) || (self.at(&Token::Async) && self.peek_nth(1) == Some(&Token::For))
    }

    /// One or more `[async] for targets in iter [if cond]*` clauses.
    fn comprehension_clauses(&mut self) -> ParseResult<Vec<Generator>> {
        let mut generators = Vec::new();
        while self.at_comprehension() {
            let is_async = self.eat(&Token::Async);
            self.expect(Token::For)?;
            let target = self.target_list()?;
            self.expect(Token::In)?;
            let iter = self.disjunction()?;
            let mut ifs = Vec::new();
            while self.eat(&Token::If) {
                ifs.push(self.disjunction()?);
            }
            generators.push(Generator { target, iter, ifs, is_async });
        }
        Ok(generators)
    }

    /// `( )`, `(expr)`, `(yield ...)`, a tuple or a generator expression.
    fn parenthesized(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(Token::LParen)?;
        if self.eat(&Token::RParen) {
            return Ok(Expr::Tuple(Sequence { span: self.span_from(start), elts: Vec::new() }));
        }
        if self.at(&Token::Yield) {
            let expr = self.yield_expression()?;
            self.expect(Token::RParen)?;
            return Ok(expr);
        }
        let first = self.star_named_expression()?;
        if self.at_comprehension() {
            let generators = self.comprehension_clauses()?;
            self.expect(Token::RParen)?;
            return Ok(Expr::Comprehension(Comprehension {
                span: self.span_from(start),
                kind: ComprehensionKind::Generator,
                element: Box::new(first),
                value: None,
                generators,
            }));
        }
        if !self.at(&Token::Comma) {
            self.expect(Token::RParen)?;
            return Ok(first);
        }
        let elts = self.sequence_rest(first, &Token::RParen)?;
        Ok(Expr::Tuple(Sequence { span: self.span_from(start), elts }))
    }

    /// Remaining comma-separated elements of a display, including the closing bracket.
    fn sequence_rest(&mut self, first: Expr, close: &Token) -> ParseResult<Vec<Expr>> {
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if self.at(close) {
                break;
            }
            elts.push(self.star_named_expression()?);
        }
        self.expect(close.clone())?;
        Ok(elts)
    }

    fn list_display(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(Token::LBracket)?;
        if self.eat(&Token::RBracket) {
            return Ok(Expr::List(Sequence { span: self.span_from(start), elts: Vec::new() }));
        }
        let first = self.star_named_expression()?;
        if self.at_comprehension() {
            let generators = self.comprehension_clauses()?;
            self.expect(Token::RBracket)?;
            return Ok(Expr::Comprehension(Comprehension {
                span: self.span_from(start),
                kind: ComprehensionKind::List,
                element: Box::new(first),
                value: None,
                generators,
            }));
        }
        let elts = self.sequence_rest(first, &Token::RBracket)?;
        Ok(Expr::List(Sequence { span: self.span_from(start), elts }))
    }

    /// Dict and set displays and comprehensions.
    fn brace_display(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(Token::LBrace)?;
        if self.eat(&Token::RBrace) {
            return Ok(Expr::Dict(Dict { span: self.span_from(start), items: Vec::new() }));
        }

        let first = if self.eat(&Token::DoubleStar) {
            DictItem::Unpack(self.bitwise_or()?)
        } else {
            let key = self.star_named_expression()?;
            if !self.eat(&Token::Colon) {
                // A set
                if self.at_comprehension() {
                    let generators = self.comprehension_clauses()?;
                    self.expect(Token::RBrace)?;
                    return Ok(Expr::Comprehension(Comprehension {
                        span: self.span_from(start),
                        kind: ComprehensionKind::Set,
                        element: Box::new(key),
                        value: None,
                        generators,
                    }));
                }
                let elts = self.sequence_rest(key, &Token::RBrace)?;
                return Ok(Expr::Set(Sequence { span: self.span_from(start), elts }));
            }
            let value = self.expression()?;
            if self.at_comprehension() {
                let generators = self.comprehension_clauses()?;
                self.expect(Token::RBrace)?;
                return Ok(Expr::Comprehension(Comprehension {
                    span: self.span_from(start),
                    kind: ComprehensionKind::Dict,
                    element: Box::new(key),
                    value: Some(Box::new(value)),
                    generators,
                }));
            }
            DictItem::Pair { key, value }
        };

        let mut items = vec![first];
        while self.eat(&Token::Comma) {
            if self.at(&Token::RBrace) {
                break;
            }
            if self.eat(&Token::DoubleStar) {
                items.push(DictItem::Unpack(self.bitwise_or()?));
            } else {
                let key = self.expression()?;
                self.expect(Token::Colon)?;
                let value = self.expression()?;
                items.push(DictItem::Pair { key, value });
            }
        }
        self.expect(Token::RBrace)?;
        Ok(Expr::Dict(Dict { span: self.span_from(start), items }))
    }

    // Targets
    //
    //

    pub(super) fn star_target(&mut self) -> ParseResult<Expr> {
        if !self.at(&Token::Star) {
            return self.bitwise_or();
        }
        let start = self.start();
        self.bump();
        let value = self.bitwise_or()?;
        Ok(Expr::Starred(Starred { span: self.span_from(start), value: Box::new(value) }))
    }

    /// The targets of a `for` loop or comprehension, which must not swallow the `in`.
    pub(super) fn target_list(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.star_target()?;
        let target = if self.at(&Token::Comma) {
            let mut elts = vec![first];
            while self.eat(&Token::Comma) {
                if self.at(&Token::In) {
                    break;
                }
                elts.push(self.star_target()?);
            }
            Expr::Tuple(Sequence { span: self.span_from(start), elts })
        } else {
            first
        };
        check_target(&target)?;
        Ok(target)
    }
}
