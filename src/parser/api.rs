use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use super::ast::*;

#[derive(Parser)]
#[grammar = "parser/script_grammar.pest"] // relative to src
pub struct ScriptParser;

impl ScriptParser {
    /// Parse script source into a [`Program`].
    pub fn parse_to_ast_from_str(script: &str) -> Result<Program, Error<Rule>> {
        parse_to_ast(script)
    }
}

pub fn parse_to_pairs(script: &str) -> Result<Pairs<Rule>, Error<Rule>> {
    ScriptParser::parse(Rule::script, script)
}

pub fn parse_to_ast(script: &str) -> Result<Program, Error<Rule>> {
    let pairs = ScriptParser::parse(Rule::script, script)?;
    build_ast_from_statement_pairs(pairs)
}

fn get_unexpected_error(code: u32, pair: &Pair<Rule>) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: format!("Unexpected rule {:?} (#{})", pair.as_rule(), code),
        },
        pair.as_span(),
    )
}

fn get_custom_error(message: String, pair: &Pair<Rule>) -> Error<Rule> {
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

fn build_ast_from_statement_pairs(pairs: Pairs<Rule>) -> Result<Program, Error<Rule>> {
    let mut body = vec![];
    for pair in pairs {
        match pair.as_rule() {
            Rule::statement => body.push(build_ast_from_statement(pair)?),
            Rule::EOI => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(1, &pair)),
        }
    }
    Ok(Program { body })
}

fn build_ast_from_statement(pair: Pair<Rule>) -> Result<StatementType, Error<Rule>> {
    let inner_pair = pair.into_inner().next().unwrap();
    Ok(match inner_pair.as_rule() {
        Rule::function_declaration => {
            StatementType::FunctionDeclaration(build_ast_from_function_declaration(inner_pair)?)
        }
        Rule::return_statement => {
            // The first inner pair is the return_kw token.
            let argument = match inner_pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::expression)
            {
                Some(p) => Some(build_ast_from_expression(p)?),
                None => None,
            };
            StatementType::ReturnStatement { argument }
        }
        Rule::if_statement => build_ast_from_if_statement(inner_pair)?,
        Rule::while_statement => {
            let mut inner = inner_pair.into_inner();
            let test = build_ast_from_expression(inner.next().unwrap())?;
            let body = build_ast_from_block(inner.next().unwrap())?;
            StatementType::WhileStatement { test, body }
        }
        Rule::expression_statement => StatementType::ExpressionStatement {
            expression: build_ast_from_expression(inner_pair.into_inner().next().unwrap())?,
        },
        _ => return Err(get_unexpected_error(2, &inner_pair)),
    })
}

fn build_ast_from_function_declaration(pair: Pair<Rule>) -> Result<FunctionData, Error<Rule>> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let mut params = vec![];
    let mut body = vec![];
    for p in inner {
        match p.as_rule() {
            Rule::parameter_list => {
                for ident in p.into_inner() {
                    params.push(ident.as_str().to_string());
                }
            }
            Rule::block => body = build_ast_from_block(p)?,
            _ => return Err(get_unexpected_error(3, &p)),
        }
    }
    Ok(FunctionData { name, params, body })
}

fn build_ast_from_block(pair: Pair<Rule>) -> Result<Vec<StatementType>, Error<Rule>> {
    let mut statements = vec![];
    for p in pair.into_inner() {
        statements.push(build_ast_from_statement(p)?);
    }
    Ok(statements)
}

fn build_ast_from_if_statement(pair: Pair<Rule>) -> Result<StatementType, Error<Rule>> {
    let mut inner = pair.into_inner();
    let test = build_ast_from_expression(inner.next().unwrap())?;
    let consequent = build_ast_from_block(inner.next().unwrap())?;
    let alternate = match inner.next() {
        Some(else_pair) => {
            let else_inner = else_pair.into_inner().next().unwrap();
            Some(match else_inner.as_rule() {
                Rule::if_statement => vec![build_ast_from_if_statement(else_inner)?],
                Rule::block => build_ast_from_block(else_inner)?,
                _ => return Err(get_unexpected_error(4, &else_inner)),
            })
        }
        None => None,
    };
    Ok(StatementType::IfStatement {
        test,
        consequent,
        alternate,
    })
}

fn build_ast_from_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let inner_pair = pair.into_inner().next().unwrap();
    match inner_pair.as_rule() {
        Rule::assignment_expression => {
            let mut inner = inner_pair.into_inner();
            let target = inner.next().unwrap().as_str().to_string();
            let value = build_ast_from_expression(inner.next().unwrap())?;
            Ok(ExpressionType::AssignmentExpression {
                target,
                value: Box::new(value),
            })
        }
        Rule::comparison_expression => build_ast_from_binary_chain(inner_pair),
        _ => Err(get_unexpected_error(5, &inner_pair)),
    }
}

/// Left-fold a `operand (operator operand)*` chain into nested binary
/// expressions. Used for the comparison, additive and multiplicative
/// levels, which share the same pair shape.
fn build_ast_from_binary_chain(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let mut inner = pair.into_inner();
    let mut left = build_ast_from_operand(inner.next().unwrap())?;
    while let Some(op_pair) = inner.next() {
        let operator = build_binary_operator(&op_pair)?;
        let right = build_ast_from_operand(inner.next().unwrap())?;
        left = ExpressionType::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn build_ast_from_operand(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    match pair.as_rule() {
        Rule::additive_expression | Rule::multiplicative_expression => {
            build_ast_from_binary_chain(pair)
        }
        Rule::unary_expression => build_ast_from_unary_expression(pair),
        _ => Err(get_unexpected_error(6, &pair)),
    }
}

fn build_binary_operator(pair: &Pair<Rule>) -> Result<BinaryOperator, Error<Rule>> {
    Ok(match pair.as_str() {
        "+" => BinaryOperator::Add,
        "-" => BinaryOperator::Subtract,
        "*" => BinaryOperator::Multiply,
        "/" => BinaryOperator::Divide,
        "%" => BinaryOperator::Modulo,
        "==" => BinaryOperator::Equals,
        "!=" => BinaryOperator::NotEquals,
        "<" => BinaryOperator::LessThan,
        "<=" => BinaryOperator::LessThanOrEqual,
        ">" => BinaryOperator::GreaterThan,
        ">=" => BinaryOperator::GreaterThanOrEqual,
        _ => return Err(get_unexpected_error(7, pair)),
    })
}

fn build_ast_from_unary_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let mut inner = pair.into_inner();
    let first = inner.next().unwrap();
    match first.as_rule() {
        Rule::unary_operator => {
            let operator = match first.as_str() {
                "-" => UnaryOperator::Minus,
                "!" => UnaryOperator::LogicalNot,
                _ => return Err(get_unexpected_error(8, &first)),
            };
            let argument = build_ast_from_unary_expression(inner.next().unwrap())?;
            Ok(ExpressionType::UnaryExpression {
                operator,
                argument: Box::new(argument),
            })
        }
        Rule::primary_expression => build_ast_from_primary_expression(first),
        _ => Err(get_unexpected_error(9, &first)),
    }
}

fn build_ast_from_primary_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let inner_pair = pair.into_inner().next().unwrap();
    match inner_pair.as_rule() {
        Rule::literal => build_ast_from_literal(inner_pair),
        Rule::list_expression => {
            let elements = match inner_pair.into_inner().next() {
                Some(args) => build_ast_from_argument_list(args)?,
                None => vec![],
            };
            Ok(ExpressionType::ListExpression { elements })
        }
        Rule::call_expression => {
            let mut inner = inner_pair.into_inner();
            let callee = inner.next().unwrap().as_str().to_string();
            let arguments = match inner.next() {
                Some(args) => build_ast_from_argument_list(args)?,
                None => vec![],
            };
            Ok(ExpressionType::CallExpression { callee, arguments })
        }
        Rule::identifier => Ok(ExpressionType::Identifier {
            name: inner_pair.as_str().to_string(),
        }),
        Rule::expression => build_ast_from_expression(inner_pair),
        _ => Err(get_unexpected_error(10, &inner_pair)),
    }
}

fn build_ast_from_argument_list(pair: Pair<Rule>) -> Result<Vec<ExpressionType>, Error<Rule>> {
    let mut arguments = vec![];
    for p in pair.into_inner() {
        arguments.push(build_ast_from_expression(p)?);
    }
    Ok(arguments)
}

fn build_ast_from_literal(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let inner_pair = pair.into_inner().next().unwrap();
    let literal = match inner_pair.as_rule() {
        Rule::float_literal => match inner_pair.as_str().parse::<f64>() {
            Ok(f) => LiteralType::FloatLiteral(f),
            Err(e) => return Err(get_custom_error(format!("Bad float literal: {}", e), &inner_pair)),
        },
        Rule::integer_literal => match inner_pair.as_str().parse::<i64>() {
            Ok(i) => LiteralType::IntegerLiteral(i),
            Err(e) => {
                return Err(get_custom_error(
                    format!("Bad integer literal: {}", e),
                    &inner_pair,
                ))
            }
        },
        Rule::string_literal => {
            let raw = inner_pair.into_inner().next().unwrap();
            LiteralType::StringLiteral(unescape_string(raw.as_str()))
        }
        Rule::boolean_literal => LiteralType::BooleanLiteral(inner_pair.as_str() == "true"),
        Rule::null_literal => LiteralType::NullLiteral,
        _ => return Err(get_unexpected_error(11, &inner_pair)),
    };
    Ok(ExpressionType::Literal(literal))
}

fn unescape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}
