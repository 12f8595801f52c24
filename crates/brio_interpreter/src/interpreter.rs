use std::{cell::RefCell, rc::Rc};

use thiserror::Error;
use tracing::debug;

use brio_parser::{
    lexer::Lexer,
    parser::{ParseError, Parser},
};

use crate::{
    environment::Environment, error::RuntimeError, evaluator::Evaluator, object::Object,
};

/// An error surfaced to the embedding caller, from either tier: a static
/// lex/parse failure or a runtime evaluation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpreterError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Eval(RuntimeError),
    #[error("expect {expected}, got {actual}")]
    UnexpectedType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// The embedding entry point: a persistent global environment behind a
/// one-call-at-a-time evaluation API.
///
/// Bindings survive across calls, so a definition executed once can be
/// used by every later snippet.
///
/// # Examples
/// ```rust
/// use brio_interpreter::Interpreter;
///
/// let mut interpreter = Interpreter::new();
/// interpreter.execute(
///     "let fun = fn(x) { if (x > 10) { return x * 3; } else { return x * 5; } };",
/// )?;
///
/// assert_eq!(interpreter.eval_int("fun(5)")?, 25);
/// assert_eq!(interpreter.eval_int("fun(11)")?, 33);
/// # Ok::<(), brio_interpreter::InterpreterError>(())
/// ```
pub struct Interpreter {
    env: Rc<RefCell<Environment>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Rc::new(RefCell::new(Environment::new())),
        }
    }

    /// Run a program for its effect on the environment, discarding the
    /// resulting value.
    pub fn execute(&mut self, source: &str) -> Result<(), InterpreterError> {
        self.eval(source)?;
        Ok(())
    }

    /// Run a program and require the resulting value to be an integer.
    pub fn eval_int(&mut self, source: &str) -> Result<i64, InterpreterError> {
        let obj = self.eval(source)?;

        match obj.as_ref() {
            Object::Integer(value) => Ok(*value),
            other => Err(InterpreterError::UnexpectedType {
                expected: "INTEGER",
                actual: other.type_name(),
            }),
        }
    }

    /// Run a program and hand back whatever value it produced.
    pub fn eval(&mut self, source: &str) -> Result<Rc<Object>, InterpreterError> {
        debug!("interpreting source");
        let lexer = Lexer::new(source);
        let mut parser = Parser::new(lexer)?;
        let program = parser.parse_program()?;

        let result = Evaluator::new_with_env(Rc::clone(&self.env)).eval(program);
        match result.as_ref() {
            Object::Error(error) => Err(InterpreterError::Eval(error.clone())),
            _ => Ok(result),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
