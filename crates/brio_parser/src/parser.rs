use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ast::{
    BlockStatement, BooleanLiteral, CallExpression, Expression, FunctionLiteral, Identifier,
    IfExpression, InfixExpression, IntegerLiteral, PrefixExpression, Program, Statement,
};
use crate::lexer::{LexError, Lexer};
use crate::token::{Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("line {line}: expected next token to be {expected}, got {found} instead")]
    UnexpectedToken {
        line: usize,
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("line {line}: no prefix parse rule for {kind}")]
    NoPrefixRule { line: usize, kind: TokenKind },
    #[error("line {line}: could not parse {literal} as an integer: {source}")]
    InvalidInteger {
        line: usize,
        literal: String,
        source: std::num::ParseIntError,
    },
}

type ParseResult<T> = Result<T, ParseError>;

/// Binding strength of each operator, weakest first.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
enum Precedence {
    Lowest,
    /// `==` and `!=`
    Equals,
    /// `<` and `>`
    LessGreater,
    /// `+` and `-`
    Sum,
    /// `*` and `/`
    Product,
    /// Unary `!` and `-`
    Prefix,
    /// Function application via `(`
    Call,
}

impl Precedence {
    fn of(kind: TokenKind) -> Precedence {
        use TokenKind::*;

        match kind {
            Eq | NotEq => Precedence::Equals,
            LessThan | GreaterThan => Precedence::LessGreater,
            Plus | Minus => Precedence::Sum,
            Star | Slash => Precedence::Product,
            LeftParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,

    current_token: Token,
    peek_token: Token,
}

impl<'a> Parser<'a> {
    /// Create a parser primed with the first two tokens from the lexer.
    pub fn new(mut lexer: Lexer<'a>) -> ParseResult<Parser<'a>> {
        let current_token = lexer.next_token()?;
        let peek_token = lexer.next_token()?;

        Ok(Parser {
            lexer,
            current_token,
            peek_token,
        })
    }

    /// Parse statements until end of input, stopping at the first error.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        debug!("parsing program");
        let mut program = Program::new();

        while self.current_token.kind != TokenKind::Eof {
            program.statements.push(self.parse_statement()?);
            self.next_token()?;
        }

        Ok(program)
    }

    fn next_token(&mut self) -> ParseResult<()> {
        let next = self.lexer.next_token()?;
        self.current_token = std::mem::replace(&mut self.peek_token, next);
        Ok(())
    }

    fn current_token_is(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.kind)
    }

    /// Advance if the next token has the expected kind, error otherwise.
    fn expect_peek(&mut self, expected: TokenKind) -> ParseResult<()> {
        if self.peek_token_is(expected) {
            self.next_token()?;
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                line: self.peek_token.line,
                expected,
                found: self.peek_token.kind,
            })
        }
    }

    fn expect_peek_identifier(&mut self) -> ParseResult<Identifier> {
        if !self.peek_token_is(TokenKind::Identifier) {
            return Err(ParseError::UnexpectedToken {
                line: self.peek_token.line,
                expected: TokenKind::Identifier,
                found: self.peek_token.kind,
            });
        }
        self.next_token()?;

        Ok(Identifier {
            token: self.current_token.clone(),
            name: self.current_token.literal.clone(),
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<Statement> {
        let token = self.current_token.clone();

        let name = self.expect_peek_identifier()?;
        self.expect_peek(TokenKind::Assign)?;
        self.next_token()?;

        let value = self.parse_expression(Precedence::Lowest)?;

        // Trailing semicolon is optional
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token()?;
        }

        Ok(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let token = self.current_token.clone();

        self.next_token()?;
        let value = self.parse_expression(Precedence::Lowest)?;

        // Trailing semicolon is optional
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token()?;
        }

        Ok(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let token = self.current_token.clone();

        let expression = self.parse_expression(Precedence::Lowest)?;

        // Trailing semicolon is optional
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token()?;
        }

        Ok(Statement::Expression { token, expression })
    }

    /// Precedence-climbing core: parse a prefix expression for the current
    /// token, then fold in infix expressions while the lookahead binds
    /// tighter than `precedence`.
    fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            left = match self.peek_token.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::LessThan
                | TokenKind::GreaterThan
                | TokenKind::Eq
                | TokenKind::NotEq => {
                    self.next_token()?;
                    self.parse_infix_expression(left)?
                }
                TokenKind::LeftParen => {
                    self.next_token()?;
                    self.parse_call_expression(left)?
                }
                // No infix rule for the lookahead
                _ => break,
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expression> {
        match self.current_token.kind {
            TokenKind::Identifier => Ok(self.parse_identifier()),
            TokenKind::Integer => self.parse_integer_literal(),
            TokenKind::True | TokenKind::False => Ok(self.parse_boolean_literal()),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LeftParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Fn => self.parse_function_literal(),
            kind => Err(ParseError::NoPrefixRule {
                line: self.current_token.line,
                kind,
            }),
        }
    }

    fn parse_identifier(&self) -> Expression {
        Expression::Identifier(Identifier {
            token: self.current_token.clone(),
            name: self.current_token.literal.clone(),
        })
    }

    fn parse_integer_literal(&self) -> ParseResult<Expression> {
        let token = self.current_token.clone();

        let value = token.literal.parse().map_err(|source| ParseError::InvalidInteger {
            line: token.line,
            literal: token.literal.clone(),
            source,
        })?;

        Ok(Expression::Integer(IntegerLiteral { token, value }))
    }

    fn parse_boolean_literal(&self) -> Expression {
        Expression::Boolean(BooleanLiteral {
            token: self.current_token.clone(),
            value: self.current_token_is(TokenKind::True),
        })
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current_token.clone();
        let operator = token.kind;

        self.next_token()?;
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(Box::new(PrefixExpression {
            token,
            operator,
            right,
        })))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let token = self.current_token.clone();
        let operator = token.kind;
        let precedence = Precedence::of(operator);

        self.next_token()?;
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(Box::new(InfixExpression {
            token,
            operator,
            left,
            right,
        })))
    }

    fn parse_grouped_expression(&mut self) -> ParseResult<Expression> {
        self.next_token()?;

        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;

        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current_token.clone();

        self.expect_peek(TokenKind::LeftParen)?;
        self.next_token()?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;

        self.expect_peek(TokenKind::LeftBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token()?;
            self.expect_peek(TokenKind::LeftBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If(Box::new(IfExpression {
            token,
            condition,
            consequence,
            alternative,
        })))
    }

    /// Parse statements between `{` and `}`. The current token is the `{`
    /// on entry and the `}` on exit.
    fn parse_block_statement(&mut self) -> ParseResult<BlockStatement> {
        let token = self.current_token.clone();
        let mut statements = Vec::new();

        self.next_token()?;
        while !self.current_token_is(TokenKind::RightBrace) {
            if self.current_token_is(TokenKind::Eof) {
                return Err(ParseError::UnexpectedToken {
                    line: self.current_token.line,
                    expected: TokenKind::RightBrace,
                    found: TokenKind::Eof,
                });
            }
            statements.push(self.parse_statement()?);
            self.next_token()?;
        }

        Ok(BlockStatement { token, statements })
    }

    fn parse_function_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current_token.clone();

        self.expect_peek(TokenKind::LeftParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LeftBrace)?;
        let body = self.parse_block_statement()?;

        Ok(Expression::Function(Box::new(FunctionLiteral {
            token,
            parameters,
            body: Rc::new(body),
        })))
    }

    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_token_is(TokenKind::RightParen) {
            self.next_token()?;
            return Ok(parameters);
        }

        parameters.push(self.expect_peek_identifier()?);
        while self.peek_token_is(TokenKind::Comma) {
            self.next_token()?;
            parameters.push(self.expect_peek_identifier()?);
        }
        self.expect_peek(TokenKind::RightParen)?;

        Ok(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> ParseResult<Expression> {
        let token = self.current_token.clone();
        let arguments = self.parse_call_arguments()?;

        Ok(Expression::Call(Box::new(CallExpression {
            token,
            callee,
            arguments,
        })))
    }

    fn parse_call_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();

        if self.peek_token_is(TokenKind::RightParen) {
            self.next_token()?;
            return Ok(arguments);
        }

        self.next_token()?;
        arguments.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_token_is(TokenKind::Comma) {
            self.next_token()?;
            self.next_token()?;
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(TokenKind::RightParen)?;

        Ok(arguments)
    }
}
