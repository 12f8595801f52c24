//! Tree-walking evaluation for brio programs.

mod environment;
mod error;
mod evaluator;
mod interpreter;
pub mod object;

pub use environment::Environment;
pub use error::RuntimeError;
pub use evaluator::Evaluator;
pub use interpreter::{Interpreter, InterpreterError};

// Parse-tier errors, re-exported so embedders can match on them without
// depending on the parser crate directly.
pub use brio_parser::lexer::LexError;
pub use brio_parser::parser::ParseError;
