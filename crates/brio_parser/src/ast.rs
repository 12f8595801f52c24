use std::fmt::Display;
use std::rc::Rc;

use crate::token::{Token, TokenKind};

/// Root of a parsed source text.
#[derive(Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            statements: Vec::new(),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub enum Statement {
    Let {
        /// The `let` token.
        token: Token,
        /// The name being bound.
        name: Identifier,
        /// The value being assigned.
        value: Expression,
    },
    Return {
        /// The `return` token.
        token: Token,
        /// The value being returned.
        value: Expression,
    },
    Expression {
        /// First token of the expression.
        token: Token,
        expression: Expression,
    },
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;

        match self {
            Let { name, value, .. } => {
                write!(f, "{} {} = {};", TokenKind::Let, name, value)
            }
            Return { value, .. } => write!(f, "{} {};", TokenKind::Return, value),
            Expression { expression, .. } => write!(f, "{}", expression),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Expression {
    // Literals
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),

    // Complex
    Prefix(Box<PrefixExpression>),
    Infix(Box<InfixExpression>),
    If(Box<IfExpression>),
    Function(Box<FunctionLiteral>),
    Call(Box<CallExpression>),
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;

        match self {
            Identifier(identifier) => write!(f, "{}", identifier),
            Integer(literal) => write!(f, "{}", literal),
            Boolean(literal) => write!(f, "{}", literal),

            Prefix(prefix) => write!(f, "{}", prefix),
            Infix(infix) => write!(f, "{}", infix),
            If(if_expression) => write!(f, "{}", if_expression),
            Function(function) => write!(f, "{}", function),
            Call(call) => write!(f, "{}", call),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

impl Display for BooleanLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, PartialEq)]
pub struct PrefixExpression {
    /// The operator token.
    pub token: Token,
    pub operator: TokenKind,
    pub right: Expression,
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({op}{r})", op = self.operator, r = self.right)
    }
}

#[derive(Debug, PartialEq)]
pub struct InfixExpression {
    /// The operator token.
    pub token: Token,
    pub operator: TokenKind,
    pub left: Expression,
    pub right: Expression,
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({l} {op} {r})",
            l = self.left,
            op = self.operator,
            r = self.right
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct BlockStatement {
    /// The `{` token.
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct IfExpression {
    /// The `if` token.
    pub token: Token,
    pub condition: Expression,
    /// Block evaluated when the condition is true.
    pub consequence: BlockStatement,
    /// Block evaluated when the condition is false.
    pub alternative: Option<BlockStatement>,
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(if {} {}", self.condition, self.consequence)?;

        if let Some(ref alternative) = self.alternative {
            write!(f, " else {}", alternative)?;
        }

        write!(f, ")")
    }
}

#[derive(Debug, PartialEq)]
pub struct FunctionLiteral {
    /// The `fn` token.
    pub token: Token,
    /// Parameter identifiers.
    pub parameters: Vec<Identifier>,
    /// Shared with every function value created from this literal.
    pub body: Rc<BlockStatement>,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(fn({}) {})",
            self.parameters
                .iter()
                .map(|parameter| parameter.to_string())
                .collect::<Vec<String>>()
                .join(", "),
            self.body
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct CallExpression {
    /// The `(` token that opens the argument list.
    pub token: Token,
    pub callee: Expression,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})",
            self.callee,
            self.arguments
                .iter()
                .map(|argument| argument.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{Expression, Identifier, Program, Statement};
    use crate::token::{Token, TokenKind};

    #[test]
    fn display_program() {
        let program = Program {
            statements: vec![Statement::Let {
                token: Token::new(TokenKind::Let, "let", 1),
                name: Identifier {
                    token: Token::new(TokenKind::Identifier, "myVar", 1),
                    name: "myVar".to_string(),
                },
                value: Expression::Identifier(Identifier {
                    token: Token::new(TokenKind::Identifier, "anotherVar", 1),
                    name: "anotherVar".to_string(),
                }),
            }],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;")
    }
}
