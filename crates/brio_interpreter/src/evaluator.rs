use std::{cell::RefCell, rc::Rc};

use tracing::{debug, trace};

use crate::{
    environment::Environment,
    error::RuntimeError,
    object::{Function, Object},
};

use brio_parser::{
    ast::{BlockStatement, Expression, Identifier, Program, Statement},
    token::TokenKind,
};

pub struct Evaluator {
    env: Rc<RefCell<Environment>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::new_with_env(Rc::new(RefCell::new(Environment::new())))
    }

    pub fn new_with_env(env: Rc<RefCell<Environment>>) -> Self {
        Evaluator { env }
    }

    pub fn eval(&mut self, program: Program) -> Rc<Object> {
        debug!("evaluating program");
        let mut result = Rc::new(Object::Null);

        for statement in &program.statements {
            let val = self.eval_statement(statement);

            match val.as_ref() {
                // If a return value is found, immediately return and stop evaluating statements
                // Unwrap the return value into a final value so the program can use it
                Object::ReturnValue(inner_value) => return Rc::clone(inner_value),
                Object::Error(_) => return val,
                _ => result = val,
            }
        }

        result
    }

    // Similar to eval (for programs) but doesn't unwrap return values
    fn eval_block_statement(&mut self, block: &BlockStatement) -> Rc<Object> {
        let mut result = Rc::new(Object::Null);

        for statement in &block.statements {
            let val = self.eval_statement(statement);

            match val.as_ref() {
                // If a return value is found, immediately return and stop evaluating statements
                // Don't unwrap the return value, we might be in a nested block which also needs to return
                Object::ReturnValue(_) => return val,
                Object::Error(_) => return val,
                _ => result = val,
            }
        }

        result
    }

    fn eval_statement(&mut self, statement: &Statement) -> Rc<Object> {
        match statement {
            Statement::Expression { expression, .. } => self.eval_expression(expression),
            Statement::Return { value, .. } => {
                let obj = self.eval_expression(value);

                // No need to encapsulate an Error with a ReturnValue since they both bubble up the same way
                if obj.is_error() {
                    return obj;
                }

                Rc::new(Object::ReturnValue(obj))
            }
            Statement::Let { name, value, .. } => {
                let obj = self.eval_expression(value);
                // Early return the first error received
                if obj.is_error() {
                    return obj;
                }

                // Add the variable to the surrounding environment
                self.env.borrow_mut().set(name.name.clone(), obj);

                Rc::new(Object::Null)
            }
        }
    }

    fn eval_expression(&mut self, expression: &Expression) -> Rc<Object> {
        match expression {
            Expression::Integer(literal) => Rc::new(Object::Integer(literal.value)),
            Expression::Boolean(literal) => Rc::new(Object::Boolean(literal.value)),
            Expression::Identifier(identifier) => self.eval_identifier_expression(identifier),

            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right);
                // Early return the first error received
                if right.is_error() {
                    return right;
                }
                self.eval_prefix_expression(prefix.operator, right)
            }
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left);
                // Early return the first error received
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expression(&infix.right);
                // Early return the first error received
                if right.is_error() {
                    return right;
                }
                self.eval_infix_expression(infix.operator, left, right)
            }

            Expression::If(if_expression) => self.eval_if_expression(
                &if_expression.condition,
                &if_expression.consequence,
                &if_expression.alternative,
            ),

            Expression::Function(function) => Rc::new(Object::Function(Function {
                parameters: function.parameters.clone(),
                body: Rc::clone(&function.body),
                env: Rc::clone(&self.env),
            })),
            Expression::Call(call) => {
                let function = self.eval_expression(&call.callee);
                // Early return the first error received
                if function.is_error() {
                    return function;
                }
                let arguments = self.eval_expressions(&call.arguments);
                if arguments.len() == 1 && arguments.first().unwrap().is_error() {
                    return Rc::clone(arguments.first().unwrap());
                }

                self.apply_function(function, arguments)
            }
        }
    }

    fn eval_expressions(&mut self, expressions: &[Expression]) -> Vec<Rc<Object>> {
        let mut result = Vec::new();
        for expression in expressions {
            let evaluated = self.eval_expression(expression);
            if evaluated.is_error() {
                return vec![evaluated];
            }
            result.push(evaluated);
        }
        result
    }

    fn eval_identifier_expression(&self, identifier: &Identifier) -> Rc<Object> {
        match self.env.borrow().get(&identifier.name) {
            Some(obj) => obj,
            None => Rc::new(Object::Error(RuntimeError::IdentifierNotFound(
                identifier.name.clone(),
            ))),
        }
    }

    fn eval_prefix_expression(&self, operator: TokenKind, right: Rc<Object>) -> Rc<Object> {
        match operator {
            TokenKind::Bang => self.eval_bang_operator_expression(right),
            TokenKind::Minus => self.eval_minus_prefix_operator_expression(right),
            // The parser only builds prefix expressions for `!` and `-`
            _ => unreachable!("unknown prefix operator {}{:?}", operator, right),
        }
    }

    fn eval_bang_operator_expression(&self, right: Rc<Object>) -> Rc<Object> {
        match *right {
            Object::Boolean(true) => Rc::new(Object::Boolean(false)),
            Object::Boolean(false) => Rc::new(Object::Boolean(true)),
            _ => Rc::new(Object::Error(RuntimeError::PrefixTypeMismatch {
                operator: TokenKind::Bang,
                operand: right.type_name(),
            })),
        }
    }

    fn eval_minus_prefix_operator_expression(&self, right: Rc<Object>) -> Rc<Object> {
        match *right {
            Object::Integer(value) => Rc::new(Object::Integer(-value)),
            _ => Rc::new(Object::Error(RuntimeError::PrefixTypeMismatch {
                operator: TokenKind::Minus,
                operand: right.type_name(),
            })),
        }
    }

    fn eval_infix_expression(
        &self,
        operator: TokenKind,
        left: Rc<Object>,
        right: Rc<Object>,
    ) -> Rc<Object> {
        match (left.as_ref(), right.as_ref()) {
            (Object::Integer(left_value), Object::Integer(right_value)) => {
                self.eval_integer_infix_expression(operator, *left_value, *right_value)
            }

            (Object::Boolean(left_value), Object::Boolean(right_value)) => {
                self.eval_boolean_infix_expression(operator, *left_value, *right_value)
            }

            (_, _) => Rc::new(Object::Error(RuntimeError::TypeMismatch {
                operator,
                left: left.type_name(),
                right: right.type_name(),
            })),
        }
    }

    fn eval_integer_infix_expression(
        &self,
        operator: TokenKind,
        left_value: i64,
        right_value: i64,
    ) -> Rc<Object> {
        match operator {
            TokenKind::Plus => Rc::new(Object::Integer(left_value + right_value)),
            TokenKind::Minus => Rc::new(Object::Integer(left_value - right_value)),
            TokenKind::Star => Rc::new(Object::Integer(left_value * right_value)),
            TokenKind::Slash => Rc::new(Object::Integer(left_value / right_value)),

            TokenKind::LessThan => Rc::new(Object::Boolean(left_value < right_value)),
            TokenKind::GreaterThan => Rc::new(Object::Boolean(left_value > right_value)),
            TokenKind::Eq => Rc::new(Object::Boolean(left_value == right_value)),
            TokenKind::NotEq => Rc::new(Object::Boolean(left_value != right_value)),

            operator => Rc::new(Object::Error(RuntimeError::UnknownOperator {
                operator,
                left: "INTEGER",
                right: "INTEGER",
            })),
        }
    }

    fn eval_boolean_infix_expression(
        &self,
        operator: TokenKind,
        left_value: bool,
        right_value: bool,
    ) -> Rc<Object> {
        match operator {
            // NOTE: No truthy/implicit conversion
            TokenKind::Eq => Rc::new(Object::Boolean(left_value == right_value)),
            TokenKind::NotEq => Rc::new(Object::Boolean(left_value != right_value)),

            operator => Rc::new(Object::Error(RuntimeError::UnknownOperator {
                operator,
                left: "BOOLEAN",
                right: "BOOLEAN",
            })),
        }
    }

    fn eval_if_expression(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: &Option<BlockStatement>,
    ) -> Rc<Object> {
        let evaluated_condition = self.eval_expression(condition);
        // Early return the first error received
        if evaluated_condition.is_error() {
            return evaluated_condition;
        }

        match *evaluated_condition {
            Object::Boolean(value) => {
                if value {
                    self.eval_block_statement(consequence)
                } else if let Some(alternative) = alternative {
                    self.eval_block_statement(alternative)
                } else {
                    Rc::new(Object::Null)
                }
            }
            _ => Rc::new(Object::Error(RuntimeError::NonBooleanCondition(
                evaluated_condition.type_name(),
            ))),
        }
    }

    fn apply_function(&mut self, function: Rc<Object>, arguments: Vec<Rc<Object>>) -> Rc<Object> {
        match function.as_ref() {
            Object::Function(function) => {
                // Check that number of args & params matches
                if arguments.len() != function.parameters.len() {
                    return Rc::new(Object::Error(RuntimeError::WrongArgumentCount {
                        expected: function.parameters.len(),
                        got: arguments.len(),
                    }));
                }

                trace!(parameters = function.parameters.len(), "applying function");

                // Remember current environment (when exiting from call)
                let current_env = Rc::clone(&self.env);
                // Create a new scoped environment for function
                let mut scoped_env = Environment::new_enclosed(Rc::clone(&function.env));

                // Add arguments as variables in function's environment
                for (parameter, obj) in function.parameters.iter().zip(arguments.iter()) {
                    scoped_env.set(parameter.name.clone(), Rc::clone(obj));
                }

                self.env = Rc::new(RefCell::new(scoped_env));

                let result = self.eval_block_statement(&function.body);

                self.env = current_env;

                // Unwrap one level so a `return` inside the body stops the
                // function, not the whole calling program
                match result.as_ref() {
                    Object::ReturnValue(inner_value) => Rc::clone(inner_value),
                    _ => result,
                }
            }
            _ => Rc::new(Object::Error(RuntimeError::NotAFunction(
                function.type_name(),
            ))),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{error::RuntimeError, evaluator::Evaluator, object::Object};

    use brio_parser::{lexer::Lexer, parser::Parser, token::TokenKind};

    #[test]
    fn eval_integer_expression() {
        let tests = vec![
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("20 + 2 * -10", 0),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * 3 * 3 + 10", 37),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_integer_object(evaluated, expected_value);
        }
    }

    #[test]
    fn eval_boolean_expression() {
        let tests = vec![
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 > 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == 2", false),
            ("1 != 2", true),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("true != false", true),
            ("false != true", true),
            ("(1 < 2) == true", true),
            ("(1 < 2) == false", false),
            ("(1 > 2) == true", false),
            ("(1 > 2) == false", true),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_boolean_object(evaluated, expected_value);
        }
    }

    #[test]
    fn eval_bang_operator() {
        let tests = vec![
            ("!true", false),
            ("!false", true),
            ("!!true", true),
            ("!!false", false),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_boolean_object(evaluated, expected_value);
        }
    }

    #[test]
    fn eval_if_else_expression() {
        let tests = vec![
            ("if (true) { 10 }", Object::Integer(10)),
            ("if (false) { 10 }", Object::Null),
            ("if (1 < 2) { 10 }", Object::Integer(10)),
            ("if (1 > 2) { 10 }", Object::Null),
            ("if (1 > 2) { 10 } else { 20 }", Object::Integer(20)),
            ("if (1 < 2) { 10 } else { 20 }", Object::Integer(10)),
        ];

        for (input, expected_obj) in tests {
            let evaluated = evaluate(input);

            match expected_obj {
                Object::Integer(expected_value) => test_integer_object(evaluated, expected_value),
                Object::Null => test_null_object(evaluated),
                _ => panic!("expected integer or null but got {}", expected_obj),
            }
        }
    }

    #[test]
    fn eval_return_statements() {
        let tests = vec![
            ("return 10;", 10),
            ("return 10; 9;", 10),
            ("return 2 * 5; 9;", 10),
            ("9; return 2 * 5; 9;", 10),
            (
                "
                if (10 > 1) {
                  if (10 > 1) {
                    return 10;
                  }

                  return 1;
                }
                ",
                10,
            ),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_integer_object(evaluated, expected_value)
        }
    }

    #[test]
    fn eval_let_statements() {
        let tests = vec![
            ("let a = 5; a;", 5),
            ("let a = 5 * 5; a;", 25),
            ("let a = 5; let b = a; b;", 5),
            ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_integer_object(evaluated, expected_value)
        }
    }

    #[test]
    fn eval_function_expression() {
        let input = "fn(x) { x + 2; }";
        let evaluated = evaluate(input);

        match evaluated.as_ref() {
            Object::Function(function) => {
                if function.parameters.len() != 1 {
                    panic!(
                        "expected function object with 1 parameter but got {}",
                        function.parameters.len(),
                    )
                }

                let parameter = function.parameters.first().unwrap();
                if parameter.name != "x" {
                    panic!(
                        "expected function parameter to be x but got {}",
                        parameter.name
                    )
                }

                if function.body.to_string() != "(x + 2)" {
                    panic!(
                        "expected function body to be (x + 2) but got {}",
                        function.body
                    )
                }
            }
            obj => panic!("expected function object but got {}", obj),
        }
    }

    #[test]
    fn eval_call_expression() {
        let tests = vec![
            ("let identity = fn(x) { x; }; identity(5);", 5),
            ("let identity = fn(x) { return x; }; identity(5);", 5),
            ("let double = fn(x) { x * 2; }; double(5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
            ("fn(x) { x; }(5)", 5),
            (
                "
                let adder = fn(x) { fn(y) { x + y } };
                let fiveAdder = adder(5);
                fiveAdder(3);
                ",
                8,
            ),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_integer_object(evaluated, expected_value);
        }
    }

    #[test]
    fn return_stops_the_function_not_the_caller() {
        let tests = vec![
            ("let f = fn() { return 5; 9; }; f() + 1;", 6),
            ("let f = fn() { if (true) { return 5; } 9; }; f() * 2;", 10),
            ("let f = fn() { return 5; }; let g = fn() { f() + 1; }; g();", 6),
        ];

        for (input, expected_value) in tests {
            let evaluated = evaluate(input);
            test_integer_object(evaluated, expected_value);
        }
    }

    #[test]
    fn closures_see_later_bindings() {
        let input = "
            let a = 5;
            let f = fn() { a; };
            let a = 25;
            f();
            ";

        let evaluated = evaluate(input);
        test_integer_object(evaluated, 25);
    }

    #[test]
    fn error_handling() {
        let tests = vec![
            (
                "5 + true;",
                RuntimeError::TypeMismatch {
                    operator: TokenKind::Plus,
                    left: "INTEGER",
                    right: "BOOLEAN",
                },
            ),
            (
                "5 + true; 5;",
                RuntimeError::TypeMismatch {
                    operator: TokenKind::Plus,
                    left: "INTEGER",
                    right: "BOOLEAN",
                },
            ),
            (
                "-true",
                RuntimeError::PrefixTypeMismatch {
                    operator: TokenKind::Minus,
                    operand: "BOOLEAN",
                },
            ),
            (
                "!5",
                RuntimeError::PrefixTypeMismatch {
                    operator: TokenKind::Bang,
                    operand: "INTEGER",
                },
            ),
            (
                "true + false;",
                RuntimeError::UnknownOperator {
                    operator: TokenKind::Plus,
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                },
            ),
            (
                "5; true + false; 5",
                RuntimeError::UnknownOperator {
                    operator: TokenKind::Plus,
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                },
            ),
            (
                "if (10 > 1) { true + false; }",
                RuntimeError::UnknownOperator {
                    operator: TokenKind::Plus,
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                },
            ),
            (
                "
                if (10 > 1) {
                  if (10 > 1) {
                    return true + false;
                  }
                  return 1;
                }
                ",
                RuntimeError::UnknownOperator {
                    operator: TokenKind::Plus,
                    left: "BOOLEAN",
                    right: "BOOLEAN",
                },
            ),
            (
                "if (1) { 10 }",
                RuntimeError::NonBooleanCondition("INTEGER"),
            ),
            ("foobar", RuntimeError::IdentifierNotFound("foobar".into())),
            (
                "let add = fn(x, y) { x + y; }; add(1);",
                RuntimeError::WrongArgumentCount {
                    expected: 2,
                    got: 1,
                },
            ),
            ("5(1)", RuntimeError::NotAFunction("INTEGER")),
            ("true(1)", RuntimeError::NotAFunction("BOOLEAN")),
        ];

        for (input, expected_error) in tests {
            let evaluated = evaluate(input);
            test_error_object(evaluated, expected_error)
        }
    }

    fn evaluate(input: &str) -> Rc<Object> {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer).expect("priming the parser should not fail");

        match parser.parse_program() {
            Ok(program) => Evaluator::new().eval(program),
            Err(error) => panic!("parser error: {}", error),
        }
    }

    fn test_integer_object(obj: Rc<Object>, expected_value: i64) {
        match *obj {
            Object::Integer(value) => {
                if value != expected_value {
                    panic!(
                        "expected integer object with value {} but got {:?}",
                        expected_value, obj
                    )
                }
            }
            _ => panic!("expected integer object but got {:?}", obj),
        }
    }

    fn test_boolean_object(obj: Rc<Object>, expected_value: bool) {
        match *obj {
            Object::Boolean(value) => {
                if value != expected_value {
                    panic!(
                        "expected boolean object with value {} but got {:?}",
                        expected_value, obj
                    )
                }
            }
            _ => panic!("expected boolean object but got {:?}", obj),
        }
    }

    fn test_null_object(obj: Rc<Object>) {
        match *obj {
            Object::Null => {}
            _ => panic!("expected null object but got {:?}", obj),
        }
    }

    fn test_error_object(obj: Rc<Object>, expected_error: RuntimeError) {
        match obj.as_ref() {
            Object::Error(error) => {
                if *error != expected_error {
                    panic!(
                        "expected error to be \"{:?}\" but got \"{:?}\"",
                        expected_error, error
                    )
                }
            }
            _ => panic!("expected error object but got {:?}", obj),
        }
    }
}
