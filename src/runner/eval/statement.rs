//! Statement execution.

use std::rc::Rc;

use crate::parser::ast::StatementType;
use crate::runner::ds::env::EvalContext;
use crate::runner::ds::value::Value;

use super::expression::evaluate_expression;
use super::types::{Completion, EvalResult};

/// Execute a statement and return its completion.
pub fn execute_statement(stmt: &StatementType, ctx: &mut EvalContext) -> EvalResult {
    match stmt {
        StatementType::ExpressionStatement { expression } => {
            let value = evaluate_expression(expression, ctx)?;
            Ok(Completion::normal_with_value(value))
        }

        StatementType::FunctionDeclaration(function) => {
            // A declaration binds a function value under its name in the
            // current scope; at top level that is the global namespace.
            ctx.set_binding(&function.name, Value::Function(Rc::new(function.clone())));
            Ok(Completion::normal())
        }

        StatementType::ReturnStatement { argument } => {
            let value = match argument {
                Some(expression) => evaluate_expression(expression, ctx)?,
                None => Value::Null,
            };
            Ok(Completion::return_value(value))
        }

        StatementType::IfStatement {
            test,
            consequent,
            alternate,
        } => {
            let condition = evaluate_expression(test, ctx)?;
            if condition.is_truthy() {
                execute_statements(consequent, ctx)
            } else if let Some(alternate) = alternate {
                execute_statements(alternate, ctx)
            } else {
                Ok(Completion::normal())
            }
        }

        StatementType::WhileStatement { test, body } => {
            loop {
                let condition = evaluate_expression(test, ctx)?;
                if !condition.is_truthy() {
                    break;
                }
                let completion = execute_statements(body, ctx)?;
                if completion.is_abrupt() {
                    return Ok(completion);
                }
            }
            Ok(Completion::normal())
        }
    }
}

/// Execute a statement list in source order, stopping at the first
/// abrupt completion.
pub fn execute_statements(statements: &[StatementType], ctx: &mut EvalContext) -> EvalResult {
    let mut completion = Completion::normal();
    for stmt in statements {
        completion = execute_statement(stmt, ctx)?;
        if completion.is_abrupt() {
            return Ok(completion);
        }
    }
    Ok(completion)
}
