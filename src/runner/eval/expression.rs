//! Expression evaluation.
//!
//! Handles every expression type defined in the AST. Name resolution
//! falls back from the current call's locals to the globals; call sites
//! additionally fall back to the native builtin registry, so builtins are
//! resolved lazily by name and never enter the namespace.

use std::collections::HashMap;

use crate::parser::ast::{BinaryOperator, ExpressionType, LiteralType, UnaryOperator};
use crate::runner::ds::env::EvalContext;
use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::value::Value;
use crate::runner::std_lib::lookup_builtin;

use super::statement::execute_statements;
use super::types::{CompletionType, ValueResult};

/// Active function calls allowed at once. Unbounded recursion in the
/// executed program must surface as a fault, not abort the host.
const MAX_CALL_DEPTH: usize = 64;

/// Evaluate an expression and return its value.
pub fn evaluate_expression(expr: &ExpressionType, ctx: &mut EvalContext) -> ValueResult {
    match expr {
        ExpressionType::Literal(lit) => Ok(evaluate_literal(lit)),

        ExpressionType::Identifier { name } => match ctx.get_binding(name) {
            Some(value) => Ok(value),
            None => Err(RuntimeError::NameError(format!(
                "name '{}' is not defined",
                name
            ))),
        },

        ExpressionType::ListExpression { elements } => {
            let mut items = Vec::with_capacity(elements.len());
            for e in elements {
                items.push(evaluate_expression(e, ctx)?);
            }
            Ok(Value::new_list(items))
        }

        ExpressionType::UnaryExpression { operator, argument } => {
            let value = evaluate_expression(argument, ctx)?;
            evaluate_unary(*operator, &value)
        }

        ExpressionType::BinaryExpression {
            operator,
            left,
            right,
        } => {
            let lhs = evaluate_expression(left, ctx)?;
            let rhs = evaluate_expression(right, ctx)?;
            evaluate_binary(*operator, &lhs, &rhs)
        }

        ExpressionType::AssignmentExpression { target, value } => {
            let rhs = evaluate_expression(value, ctx)?;
            ctx.set_binding(target, rhs.clone());
            Ok(rhs)
        }

        ExpressionType::CallExpression { callee, arguments } => {
            evaluate_call(callee, arguments, ctx)
        }
    }
}

fn evaluate_literal(lit: &LiteralType) -> Value {
    match lit {
        LiteralType::NullLiteral => Value::Null,
        LiteralType::BooleanLiteral(b) => Value::Bool(*b),
        LiteralType::IntegerLiteral(i) => Value::Int(*i),
        LiteralType::FloatLiteral(f) => Value::Float(*f),
        LiteralType::StringLiteral(s) => Value::Str(s.clone()),
    }
}

fn evaluate_unary(operator: UnaryOperator, value: &Value) -> ValueResult {
    match operator {
        UnaryOperator::Minus => match value {
            Value::Int(i) => Ok(Value::Int(i.wrapping_neg())),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(RuntimeError::TypeError(format!(
                "cannot negate {}",
                other.type_name()
            ))),
        },
        UnaryOperator::LogicalNot => Ok(Value::Bool(!value.is_truthy())),
    }
}

fn evaluate_binary(operator: BinaryOperator, lhs: &Value, rhs: &Value) -> ValueResult {
    match operator {
        BinaryOperator::Add => evaluate_add(lhs, rhs),
        BinaryOperator::Subtract => {
            numeric_op(lhs, rhs, "-", |a, b| a.wrapping_sub(b), |a, b| a - b)
        }
        BinaryOperator::Multiply => {
            numeric_op(lhs, rhs, "*", |a, b| a.wrapping_mul(b), |a, b| a * b)
        }
        BinaryOperator::Divide => evaluate_divide(lhs, rhs),
        BinaryOperator::Modulo => evaluate_modulo(lhs, rhs),
        BinaryOperator::Equals => Ok(Value::Bool(lhs == rhs)),
        BinaryOperator::NotEquals => Ok(Value::Bool(lhs != rhs)),
        BinaryOperator::LessThan => compare_op(lhs, rhs, "<", |o| o == std::cmp::Ordering::Less),
        BinaryOperator::LessThanOrEqual => {
            compare_op(lhs, rhs, "<=", |o| o != std::cmp::Ordering::Greater)
        }
        BinaryOperator::GreaterThan => {
            compare_op(lhs, rhs, ">", |o| o == std::cmp::Ordering::Greater)
        }
        BinaryOperator::GreaterThanOrEqual => {
            compare_op(lhs, rhs, ">=", |o| o != std::cmp::Ordering::Less)
        }
    }
}

fn evaluate_add(lhs: &Value, rhs: &Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
        _ => numeric_op(lhs, rhs, "+", |a, b| a.wrapping_add(b), |a, b| a + b),
    }
}

fn evaluate_divide(lhs: &Value, rhs: &Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(_), Value::Int(0)) => {
            Err(RuntimeError::DivisionError("division by zero".to_string()))
        }
        _ => numeric_op(lhs, rhs, "/", |a, b| a.wrapping_div(b), |a, b| a / b),
    }
}

fn evaluate_modulo(lhs: &Value, rhs: &Value) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(_), Value::Int(0)) => {
            Err(RuntimeError::DivisionError("modulo by zero".to_string()))
        }
        _ => numeric_op(lhs, rhs, "%", |a, b| a.wrapping_rem(b), |a, b| a % b),
    }
}

/// Apply a numeric operator with int/float promotion.
fn numeric_op(
    lhs: &Value,
    rhs: &Value,
    symbol: &str,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> ValueResult {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
        _ => Err(RuntimeError::TypeError(format!(
            "unsupported operand types for {}: {} and {}",
            symbol,
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn compare_op(
    lhs: &Value,
    rhs: &Value,
    symbol: &str,
    accept: fn(std::cmp::Ordering) -> bool,
) -> ValueResult {
    let ordering = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    };
    match ordering {
        Some(o) => Ok(Value::Bool(accept(o))),
        None => Err(RuntimeError::TypeError(format!(
            "cannot compare {} and {} with {}",
            lhs.type_name(),
            rhs.type_name(),
            symbol
        ))),
    }
}

/// Evaluate a call: a script function bound in the environment wins,
/// otherwise the callee name falls through to the builtin registry.
fn evaluate_call(
    callee: &str,
    arguments: &[ExpressionType],
    ctx: &mut EvalContext,
) -> ValueResult {
    // Arguments are evaluated in source order before resolving the
    // callee, so assignment side effects in the argument list always
    // land, even for a builtin call.
    let mut args = Vec::with_capacity(arguments.len());
    for a in arguments {
        args.push(evaluate_expression(a, ctx)?);
    }

    match ctx.get_binding(callee) {
        Some(Value::Function(function)) => {
            if args.len() != function.params.len() {
                return Err(RuntimeError::ArityError(format!(
                    "{}() takes {} argument(s), got {}",
                    function.name,
                    function.params.len(),
                    args.len()
                )));
            }
            if ctx.call_depth() >= MAX_CALL_DEPTH {
                return Err(RuntimeError::RecursionError(format!(
                    "call depth limit ({}) exceeded calling {}()",
                    MAX_CALL_DEPTH, callee
                )));
            }

            let mut scope = HashMap::new();
            for (param, arg) in function.params.iter().zip(args) {
                scope.insert(param.clone(), arg);
            }
            ctx.push_scope(scope);
            let result = execute_statements(&function.body, ctx);
            ctx.pop_scope();

            let completion = result?;
            match completion.completion_type {
                CompletionType::Return => Ok(completion.get_value()),
                CompletionType::Normal => Ok(Value::Null),
            }
        }
        Some(other) => Err(RuntimeError::TypeError(format!(
            "'{}' is not callable (found {})",
            callee,
            other.type_name()
        ))),
        None => match lookup_builtin(callee) {
            Some(native) => native(args),
            None => Err(RuntimeError::NameError(format!(
                "name '{}' is not defined",
                callee
            ))),
        },
    }
}
