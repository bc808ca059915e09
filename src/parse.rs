//! Recursive-descent parsing of a token stream into a [`Program`].
//!
//! Class members and statements are told apart by peeking at most
//! [`Parser::MAX_LOOKAHEAD`] tokens ahead. Binary expressions are parsed by
//! precedence climbing over [`Operator::precedence`].
//!
//! The first syntax error aborts the parse: every rule returns a
//! [`ParseError`] that is propagated with `?` up to [`parse`], which reports
//! it to the sink once.

use crate::{
    diagnostic::DiagnosticSink,
    expression::{Expression, Reference},
    program::{Class, Member, Param, Program, Type},
    statement::{Block, Statement},
    token::{Keyword, Operator, Separator, Token, TokenKind},
};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: Expected,
        found: TokenKind,
    },
    #[error("expected {expected}, reached end of tokens")]
    EndOfTokens { expected: Expected },
    #[error("unexpected token in class member: {0}")]
    UnexpectedMember(TokenKind),
    #[error("unexpected token in expression: {0}")]
    UnexpectedExpression(TokenKind),
    #[error("a program must contain at least one class")]
    EmptyProgram,
    #[error("nesting is too deep (maximum {max} levels)")]
    NestingTooDeep { max: usize },
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Identifier,
    Type,
    Keyword(Keyword),
    Separator(Separator),
    ClassMember,
    Statement,
    Expression,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => f.write_str("identifier"),
            Self::Type => f.write_str("type"),
            Self::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            Self::Separator(separator) => {
                write!(f, "separator `{separator}`")
            }
            Self::ClassMember => f.write_str("class member"),
            Self::Statement => f.write_str("statement"),
            Self::Expression => f.write_str("expression"),
        }
    }
}

type PResult<T> = Result<T, ParseError>;

/// Parses `tokens` into a program.
///
/// On failure the error is reported to `sink` exactly once and returned; no
/// partial tree is produced.
pub fn parse(
    tokens: &[Token],
    sink: &mut dyn DiagnosticSink,
) -> Result<Program, ParseError> {
    Parser::new(tokens).program().map_err(|error| {
        tracing::debug!(offset = error.offset, %error, "parse aborted");
        sink.report(error.to_string(), error.offset);
        error
    })
}

pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    /// How far past the current token any decision may look.
    pub const MAX_LOOKAHEAD: usize = 2;

    /// How many statements or expressions may enclose one another before
    /// the parse is abandoned instead of exhausting the stack.
    pub const MAX_NESTING_DEPTH: usize = 128;

    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    pub fn program(&mut self) -> PResult<Program> {
        let mut body = Vec::new();
        while self.peek().is_some() {
            body.push(self.class()?);
        }
        if body.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyProgram, 0));
        }
        Ok(Program { body })
    }

    fn class(&mut self) -> PResult<Class> {
        self.expect_keyword(Keyword::Class)?;
        let id = self.expect_identifier()?;
        let parent = if self.consume_keyword(Keyword::Extends) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        tracing::trace!(class = %id, ?parent, "parsing class");
        self.expect_separator(Separator::OpenBrace)?;
        let members = self.until(Separator::CloseBrace, Self::member)?;
        Ok(Class {
            id,
            parent,
            members,
        })
    }

    fn member(&mut self) -> PResult<Member> {
        let Some(first) = self.peek() else {
            return Err(self.error_here(Expected::ClassMember));
        };
        if first.kind.is_type_like() {
            if self.check_separator_at(2, Separator::OpenParen) {
                tracing::trace!(offset = first.offset, "member is a method");
                return self.method();
            }
            if self.check_separator_at(2, Separator::Assign)
                || self.check_separator_at(2, Separator::Semicolon)
            {
                tracing::trace!(offset = first.offset, "member is a field");
                return self.field();
            }
            if matches!(first.kind, TokenKind::Identifier(_))
                && self.check_separator_at(1, Separator::OpenParen)
            {
                tracing::trace!(
                    offset = first.offset,
                    "member is a constructor"
                );
                return self.constructor();
            }
        }
        Err(ParseError::new(
            ParseErrorKind::UnexpectedMember(first.kind.clone()),
            first.offset,
        ))
    }

    fn field(&mut self) -> PResult<Member> {
        let t = self.expect_type()?;
        let id = self.expect_identifier()?;
        let exp = self.initializer()?;
        self.expect_separator(Separator::Semicolon)?;
        Ok(Member::Field { t, id, exp })
    }

    fn method(&mut self) -> PResult<Member> {
        let return_type = self.expect_type()?;
        let id = self.expect_identifier()?;
        let params = self.params()?;
        let block = self.block()?;
        Ok(Member::Method {
            return_type,
            id,
            params,
            block,
        })
    }

    fn constructor(&mut self) -> PResult<Member> {
        let id = self.expect_identifier()?;
        let params = self.params()?;
        let block = self.block()?;
        Ok(Member::Constructor { id, params, block })
    }

    fn params(&mut self) -> PResult<Vec<Param>> {
        self.expect_separator(Separator::OpenParen)?;
        self.delimited_until(
            Separator::Comma,
            Separator::CloseParen,
            0,
            Self::param,
        )
    }

    fn param(&mut self) -> PResult<Param> {
        let t = self.expect_type()?;
        let id = self.expect_identifier()?;
        Ok(Param { t, id })
    }

    /// `("=" expr)?`, shared by fields and declarations.
    fn initializer(&mut self) -> PResult<Option<Expression>> {
        if self.consume_separator(Separator::Assign) {
            Ok(Some(self.expression()?))
        } else {
            Ok(None)
        }
    }

    fn block(&mut self) -> PResult<Block> {
        self.expect_separator(Separator::OpenBrace)?;
        let stmts = self.until(Separator::CloseBrace, Self::statement)?;
        Ok(Block { stmts })
    }

    fn statement(&mut self) -> PResult<Statement> {
        self.nested(Self::statement_body)
    }

    fn statement_body(&mut self) -> PResult<Statement> {
        let Some(token) = self.peek() else {
            return Err(self.error_here(Expected::Statement));
        };
        match &token.kind {
            TokenKind::Separator(Separator::Semicolon) => {
                self.advance();
                Ok(Statement::Empty)
            }
            TokenKind::Separator(Separator::OpenBrace) => {
                Ok(Statement::Block(self.block()?))
            }
            TokenKind::Keyword(Keyword::If) => self.if_statement(),
            TokenKind::Keyword(Keyword::While) => self.while_statement(),
            TokenKind::Keyword(Keyword::Return) => self.return_statement(),
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                self.expect_separator(Separator::Semicolon)?;
                Ok(Statement::Break)
            }
            kind if kind.is_type_like() && self.at_declaration() => {
                let t = self.expect_type()?;
                let id = self.expect_identifier()?;
                let exp = self.initializer()?;
                self.expect_separator(Separator::Semicolon)?;
                Ok(Statement::Declaration { t, id, exp })
            }
            _ => {
                let exp = self.expression()?;
                self.expect_separator(Separator::Semicolon)?;
                Ok(Statement::Expression(exp))
            }
        }
    }

    /// `type id` followed by `=` or `;`.
    fn at_declaration(&self) -> bool {
        matches!(
            self.peek_nth(1).map(|token| &token.kind),
            Some(TokenKind::Identifier(_))
        ) && (self.check_separator_at(2, Separator::Assign)
            || self.check_separator_at(2, Separator::Semicolon))
    }

    fn if_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(Keyword::If)?;
        let cond = self.condition()?;
        let then = Box::new(self.statement()?);
        let r#else = if self.consume_keyword(Keyword::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Statement::If { cond, then, r#else })
    }

    fn while_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(Keyword::While)?;
        let cond = self.condition()?;
        let body = Box::new(self.statement()?);
        Ok(Statement::While { cond, body })
    }

    fn return_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(Keyword::Return)?;
        let exp = if self.check_separator_at(0, Separator::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_separator(Separator::Semicolon)?;
        Ok(Statement::Return { exp })
    }

    fn condition(&mut self) -> PResult<Expression> {
        self.expect_separator(Separator::OpenParen)?;
        let cond = self.expression()?;
        self.expect_separator(Separator::CloseParen)?;
        Ok(cond)
    }

    pub fn expression(&mut self) -> PResult<Expression> {
        self.binary(0)
    }

    fn binary(&mut self, min_precedence: u8) -> PResult<Expression> {
        self.nested(|parser| parser.climb(min_precedence))
    }

    fn climb(&mut self, min_precedence: u8) -> PResult<Expression> {
        let mut left = self.primary()?;
        while let Some(operator) = self
            .peek_operator()
            .filter(|operator| operator.precedence() >= min_precedence)
        {
            self.advance();
            let right = self.binary(operator.precedence() + 1)?;
            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn primary(&mut self) -> PResult<Expression> {
        let Some(token) = self.peek() else {
            return Err(self.error_here(Expected::Expression));
        };
        match &token.kind {
            TokenKind::Literal(value) => {
                self.advance();
                Ok(Expression::Literal(*value))
            }
            TokenKind::Identifier(_) => {
                let reference = self.reference()?;
                if self.consume_separator(Separator::Assign) {
                    let exp = Box::new(self.expression()?);
                    Ok(Expression::Assignment { reference, exp })
                } else if self.consume_separator(Separator::OpenParen) {
                    let args = self.args()?;
                    Ok(Expression::Call { reference, args })
                } else {
                    Ok(Expression::Reference(reference))
                }
            }
            TokenKind::Keyword(Keyword::New) => {
                self.advance();
                let id = self.expect_identifier()?;
                self.expect_separator(Separator::OpenParen)?;
                let args = self.args()?;
                Ok(Expression::New { id, args })
            }
            TokenKind::Separator(Separator::OpenParen) => {
                self.advance();
                let exp = self.binary(0)?;
                self.expect_separator(Separator::CloseParen)?;
                Ok(exp)
            }
            kind => Err(ParseError::new(
                ParseErrorKind::UnexpectedExpression(kind.clone()),
                token.offset,
            )),
        }
    }

    fn reference(&mut self) -> PResult<Reference> {
        self.separated(Separator::Dot, Self::expect_identifier)
            .map(Reference)
    }

    /// Arguments after the opening `(`, through the closing `)`.
    fn args(&mut self) -> PResult<Vec<Expression>> {
        self.delimited_until(
            Separator::Comma,
            Separator::CloseParen,
            0,
            Self::expression,
        )
    }

    /// Elements up to and including `terminator`, with no minimum count.
    fn until<T>(
        &mut self,
        terminator: Separator,
        mut element: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut elements = Vec::new();
        while self.peek().is_some()
            && !self.check_separator_at(0, terminator)
        {
            elements.push(element(self)?);
        }
        self.expect_separator(terminator)?;
        Ok(elements)
    }

    /// One or more elements for as long as `separator` recurs.
    fn separated<T>(
        &mut self,
        separator: Separator,
        mut element: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut elements = vec![element(self)?];
        while self.consume_separator(separator) {
            elements.push(element(self)?);
        }
        Ok(elements)
    }

    /// Elements up to and including `terminator`, at least `min` of them.
    ///
    /// A `separator` between elements is consumed when present but not
    /// required, so `(a b)` yields two elements.
    fn delimited_until<T>(
        &mut self,
        separator: Separator,
        terminator: Separator,
        min: usize,
        mut element: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut elements = Vec::new();
        while elements.len() < min || !self.check_separator_at(0, terminator)
        {
            elements.push(element(self)?);
            self.consume_separator(separator);
        }
        self.expect_separator(terminator)?;
        Ok(elements)
    }

    fn peek(&self) -> Option<&'t Token> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        debug_assert!(n <= Self::MAX_LOOKAHEAD);
        self.tokens.get(self.position + n)
    }

    fn peek_operator(&self) -> Option<Operator> {
        match self.peek()?.kind {
            TokenKind::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn check_separator_at(&self, n: usize, separator: Separator) -> bool {
        matches!(
            self.peek_nth(n),
            Some(Token { kind: TokenKind::Separator(s), .. }) if *s == separator
        )
    }

    fn consume_separator(&mut self, separator: Separator) -> bool {
        let matched = self.check_separator_at(0, separator);
        if matched {
            self.position += 1;
        }
        matched
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = matches!(
            self.peek(),
            Some(Token { kind: TokenKind::Keyword(k), .. }) if *k == keyword
        );
        if matched {
            self.position += 1;
        }
        matched
    }

    fn expect_separator(&mut self, separator: Separator) -> PResult<()> {
        if self.consume_separator(separator) {
            Ok(())
        } else {
            Err(self.error_here(Expected::Separator(separator)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> PResult<()> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_here(Expected::Keyword(keyword)))
        }
    }

    fn expect_identifier(&mut self) -> PResult<String> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => {
                self.position += 1;
                Ok(name.clone())
            }
            _ => Err(self.error_here(Expected::Identifier)),
        }
    }

    fn expect_type(&mut self) -> PResult<Type> {
        let t = match self.peek().map(|token| &token.kind) {
            Some(TokenKind::TypeName(name)) => name.as_str().to_owned(),
            Some(TokenKind::Identifier(name)) => name.clone(),
            _ => return Err(self.error_here(Expected::Type)),
        };
        self.position += 1;
        Ok(t)
    }

    /// Runs `rule` one nesting level deeper, failing once the depth passes
    /// [`Self::MAX_NESTING_DEPTH`].
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= Self::MAX_NESTING_DEPTH {
            let offset = self
                .peek()
                .or_else(|| self.tokens.last())
                .map_or(0, |token| token.offset);
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep {
                    max: Self::MAX_NESTING_DEPTH,
                },
                offset,
            ));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// An error for the current token, or for running out of tokens.
    fn error_here(&self, expected: Expected) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::new(
                ParseErrorKind::Mismatch {
                    expected,
                    found: token.kind.clone(),
                },
                token.offset,
            ),
            None => ParseError::new(
                ParseErrorKind::EndOfTokens { expected },
                self.tokens.last().map_or(0, |token| token.offset),
            ),
        }
    }
}
