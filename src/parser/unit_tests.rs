use super::api::{parse_to_ast, Rule, ScriptParser};
use super::ast::*;

use pest::consumes_to;
use pest::parses_to;

#[test]
fn test_integer_literal_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "42",
        rule: Rule::literal,
        tokens: [
            literal(0, 2, [
                integer_literal(0, 2)
            ])
        ]
    };
}

#[test]
fn test_float_literal_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "3.14",
        rule: Rule::literal,
        tokens: [
            literal(0, 4, [
                float_literal(0, 4)
            ])
        ]
    };
}

#[test]
fn test_string_literal_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "\"hi\"",
        rule: Rule::literal,
        tokens: [
            literal(0, 4, [
                string_literal(0, 4, [
                    string_inner(1, 3)
                ])
            ])
        ]
    };
}

#[test]
fn test_boolean_literal_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "true",
        rule: Rule::literal,
        tokens: [
            literal(0, 4, [
                boolean_literal(0, 4)
            ])
        ]
    };
}

#[test]
fn test_null_literal_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "null",
        rule: Rule::literal,
        tokens: [
            literal(0, 4, [
                null_literal(0, 4)
            ])
        ]
    };
}

#[test]
fn test_identifier_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "my_var2",
        rule: Rule::identifier,
        tokens: [
            identifier(0, 7)
        ]
    };
}

#[test]
fn test_keyword_is_not_an_identifier() {
    assert!(ScriptParser::parse_to_ast_from_str("return = 1;").is_err());
}

#[test]
fn test_simple_assignment_ast() {
    let program = parse_to_ast("y = 40 + 2;").unwrap();
    assert_eq!(program.body.len(), 1);
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::AssignmentExpression { target, value },
        } => {
            assert_eq!(target, "y");
            match value.as_ref() {
                ExpressionType::BinaryExpression { operator, .. } => {
                    assert_eq!(*operator, BinaryOperator::Add);
                }
                other => panic!("expected binary expression, got {:?}", other),
            }
        }
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_assignment_is_right_associative() {
    let program = parse_to_ast("a = b = 1;").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::AssignmentExpression { target, value },
        } => {
            assert_eq!(target, "a");
            assert!(matches!(
                value.as_ref(),
                ExpressionType::AssignmentExpression { .. }
            ));
        }
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_equality_is_not_parsed_as_assignment() {
    let program = parse_to_ast("x == 1;").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::BinaryExpression { operator, .. },
        } => {
            assert_eq!(*operator, BinaryOperator::Equals);
        }
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let program = parse_to_ast("x = 1 + 2 * 3;").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::AssignmentExpression { value, .. },
        } => match value.as_ref() {
            ExpressionType::BinaryExpression {
                operator: BinaryOperator::Add,
                right,
                ..
            } => {
                assert!(matches!(
                    right.as_ref(),
                    ExpressionType::BinaryExpression {
                        operator: BinaryOperator::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("expected addition at the top, got {:?}", other),
        },
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_function_declaration_ast() {
    let program = parse_to_ast("fn add(a, b) { return a + b; }").unwrap();
    match &program.body[0] {
        StatementType::FunctionDeclaration(function) => {
            assert_eq!(function.name, "add");
            assert_eq!(function.params, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(function.body.len(), 1);
            assert!(matches!(
                function.body[0],
                StatementType::ReturnStatement { argument: Some(_) }
            ));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_function_declaration_without_params() {
    let program = parse_to_ast("fn f() { }").unwrap();
    match &program.body[0] {
        StatementType::FunctionDeclaration(function) => {
            assert_eq!(function.name, "f");
            assert!(function.params.is_empty());
            assert!(function.body.is_empty());
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_return_with_expression() {
    let program = parse_to_ast("fn f() { return a + 1; }").unwrap();
    match &program.body[0] {
        StatementType::FunctionDeclaration(function) => {
            assert!(matches!(
                function.body[0],
                StatementType::ReturnStatement { argument: Some(_) }
            ));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_bare_return() {
    let program = parse_to_ast("fn f() { return; }").unwrap();
    match &program.body[0] {
        StatementType::FunctionDeclaration(function) => {
            assert!(matches!(
                function.body[0],
                StatementType::ReturnStatement { argument: None }
            ));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_return_keyword_requires_a_boundary() {
    // An identifier that merely starts with "return" is an assignment,
    // not a return statement.
    let program = parse_to_ast("fn f() { returned = 1; }").unwrap();
    match &program.body[0] {
        StatementType::FunctionDeclaration(function) => {
            assert!(matches!(
                function.body[0],
                StatementType::ExpressionStatement {
                    expression: ExpressionType::AssignmentExpression { .. }
                }
            ));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_call_with_assignment_argument() {
    let program = parse_to_ast("f(x = 1);").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::CallExpression { callee, arguments },
        } => {
            assert_eq!(callee, "f");
            assert_eq!(arguments.len(), 1);
            assert!(matches!(
                arguments[0],
                ExpressionType::AssignmentExpression { .. }
            ));
        }
        other => panic!("expected call statement, got {:?}", other),
    }
}

#[test]
fn test_if_else_chain_ast() {
    let program = parse_to_ast("if x > 0 { y = 1; } else if x < 0 { y = 2; } else { y = 3; }")
        .unwrap();
    match &program.body[0] {
        StatementType::IfStatement { alternate, .. } => {
            let alternate = alternate.as_ref().expect("else branch");
            assert_eq!(alternate.len(), 1);
            assert!(matches!(alternate[0], StatementType::IfStatement { .. }));
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_list_expression_ast() {
    let program = parse_to_ast("a = [1, 2.0, \"three\", []];").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::AssignmentExpression { value, .. },
        } => match value.as_ref() {
            ExpressionType::ListExpression { elements } => {
                assert_eq!(elements.len(), 4);
                assert!(matches!(
                    elements[3],
                    ExpressionType::ListExpression { ref elements } if elements.is_empty()
                ));
            }
            other => panic!("expected list expression, got {:?}", other),
        },
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_string_escapes() {
    let program = parse_to_ast("s = \"a\\nb\\\"c\";").unwrap();
    match &program.body[0] {
        StatementType::ExpressionStatement {
            expression: ExpressionType::AssignmentExpression { value, .. },
        } => {
            assert_eq!(
                value.as_ref(),
                &ExpressionType::Literal(LiteralType::StringLiteral("a\nb\"c".to_string()))
            );
        }
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_comments_are_ignored() {
    let program = parse_to_ast("# leading comment\nx = 1; # trailing\n").unwrap();
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_missing_semicolon_is_a_parse_error() {
    assert!(parse_to_ast("x = 1").is_err());
}

#[test]
fn test_unbalanced_brace_is_a_parse_error() {
    assert!(parse_to_ast("fn f() { x = 1;").is_err());
}
