use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: unexpected character '{character}'")]
    UnexpectedCharacter { character: char, line: usize },
}

type LexResult<T> = Result<T, LexError>;

pub struct Lexer<'a> {
    input_iter: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input_iter: input.chars().peekable(),
            line: 1,
        }
    }

    /// Consume the next character from the input.
    fn read_char(&mut self) -> Option<char> {
        let next = self.input_iter.next();
        if next == Some('\n') {
            self.line += 1;
        }
        next
    }

    /// Get the next character from the input without consuming it.
    fn peek_char(&mut self) -> Option<&char> {
        self.input_iter.peek()
    }

    /// Consume whitespace until a non-whitespace character is found.
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek_char() {
            if c.is_whitespace() {
                self.read_char();
            } else {
                break;
            }
        }
    }

    /// Read the current and following characters as an integer token.
    /// The literal is kept as text; the parser converts it to a value.
    fn read_number(&mut self, first: char, line: usize) -> Token {
        let mut literal = String::new();
        literal.push(first);

        while let Some(&c) = self.peek_char() {
            if is_digit(c) {
                literal.push(c);
                self.read_char();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Integer, literal, line)
    }

    /// Read the current and following characters as an identifier or a
    /// keyword (if the text is reserved).
    fn read_identifier_or_keyword(&mut self, first: char, line: usize) -> Token {
        let mut literal = String::new();
        literal.push(first);

        while let Some(&c) = self.peek_char() {
            if is_identifier_char(c) {
                literal.push(c);
                self.read_char();
            } else {
                break;
            }
        }

        match TokenKind::lookup_keyword(&literal) {
            Some(kind) => Token::new(kind, literal, line),
            None => Token::new(TokenKind::Identifier, literal, line),
        }
    }

    /// Scan the next token. Once the input is exhausted, every further
    /// call yields an end-of-input token.
    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        let line = self.line;

        let token = if let Some(c) = self.read_char() {
            match c {
                '=' => match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        Token::new(TokenKind::Eq, "==", line)
                    }
                    _ => Token::new(TokenKind::Assign, "=", line),
                },
                '!' => match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        Token::new(TokenKind::NotEq, "!=", line)
                    }
                    _ => Token::new(TokenKind::Bang, "!", line),
                },

                '+' => Token::new(TokenKind::Plus, "+", line),
                '-' => Token::new(TokenKind::Minus, "-", line),
                '*' => Token::new(TokenKind::Star, "*", line),
                '/' => Token::new(TokenKind::Slash, "/", line),
                '<' => Token::new(TokenKind::LessThan, "<", line),
                '>' => Token::new(TokenKind::GreaterThan, ">", line),

                ',' => Token::new(TokenKind::Comma, ",", line),
                ';' => Token::new(TokenKind::Semicolon, ";", line),

                '(' => Token::new(TokenKind::LeftParen, "(", line),
                ')' => Token::new(TokenKind::RightParen, ")", line),
                '{' => Token::new(TokenKind::LeftBrace, "{", line),
                '}' => Token::new(TokenKind::RightBrace, "}", line),

                c if is_digit(c) => self.read_number(c, line),
                c if is_identifier_start(c) => self.read_identifier_or_keyword(c, line),

                _ => return Err(LexError::UnexpectedCharacter { character: c, line }),
            }
        } else {
            Token::new(TokenKind::Eof, "", line)
        };

        Ok(token)
    }
}

/// Whether or not the given character is a digit.
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Whether or not the given character may start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether or not the given character may continue an identifier.
/// Digits are allowed past the first character.
fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || is_digit(c)
}
