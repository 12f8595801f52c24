//! Lexing and parsing for brio source text.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
