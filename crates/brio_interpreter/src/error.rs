use thiserror::Error;

use brio_parser::token::TokenKind;

/// An error raised while evaluating a program.
///
/// Runtime errors are first-class values during evaluation, so they can
/// bubble up through nested expressions before the interpreter surfaces
/// them to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        operator: TokenKind,
        left: &'static str,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownOperator {
        operator: TokenKind,
        left: &'static str,
        right: &'static str,
    },
    #[error("type mismatch: {operator}{operand}")]
    PrefixTypeMismatch {
        operator: TokenKind,
        operand: &'static str,
    },
    #[error("type mismatch: expected a BOOLEAN condition, got {0}")]
    NonBooleanCondition(&'static str),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("expected {expected} argument(s) but got {got}.")]
    WrongArgumentCount { expected: usize, got: usize },
}
