use std::{cell::RefCell, fmt::Display, rc::Rc};

use brio_parser::ast::{BlockStatement, Identifier};

use crate::{environment::Environment, error::RuntimeError};

#[derive(Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    Function(Function),
    /// Special object to encapsulate a return-ed value while it goes up
    /// scopes. This is never seen by the user.
    ReturnValue(Rc<Object>),
    Error(RuntimeError),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        use Object::*;

        match self {
            Integer(_) => "INTEGER",
            Boolean(_) => "BOOLEAN",
            Null => "NULL",
            Function(_) => "FUNCTION",
            ReturnValue(obj) => obj.type_name(),
            Error(_) => "ERROR",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Object::*;

        match self {
            Integer(value) => write!(f, "{}", value),
            Boolean(value) => write!(f, "{}", value),
            Null => write!(f, "null"),
            Function(function) => write!(f, "{}", function),
            ReturnValue(obj) => write!(f, "{}", obj),
            Error(error) => write!(f, "Error: {}", error),
        }
    }
}

#[derive(Debug)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub env: Rc<RefCell<Environment>>,
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.name.clone())
            .collect();

        write!(f, "fn ({}) {{\n{}\n}}", params.join(", "), self.body)
    }
}

impl PartialEq for Function {
    fn eq(&self, _: &Function) -> bool {
        // This should never be used?
        panic!("PartialEq is not implemented for `function`");
    }
}
