//! Native builtin functions.
//!
//! Builtins are resolved lazily: a call falls through to this registry
//! only when the callee name is bound neither locally nor globally. They
//! are never inserted into the namespace, so they can never be captured
//! into an artifact or shadow inherited state.

use std::collections::HashMap;

use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::value::Value;

/// Function signature for native builtins.
pub type NativeFn = fn(args: Vec<Value>) -> Result<Value, RuntimeError>;

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, NativeFn> = {
        let mut m: HashMap<&'static str, NativeFn> = HashMap::new();
        m.insert("print", builtin_print as NativeFn);
        m.insert("len", builtin_len as NativeFn);
        m.insert("push", builtin_push as NativeFn);
        m.insert("pop", builtin_pop as NativeFn);
        m.insert("str", builtin_str as NativeFn);
        m.insert("abs", builtin_abs as NativeFn);
        m
    };
}

/// Look up a native builtin by name.
pub fn lookup_builtin(name: &str) -> Option<NativeFn> {
    BUILTINS.get(name).copied()
}

fn expect_args(name: &str, args: &[Value], count: usize) -> Result<(), RuntimeError> {
    if args.len() != count {
        return Err(RuntimeError::ArityError(format!(
            "{}() takes {} argument(s), got {}",
            name,
            count,
            args.len()
        )));
    }
    Ok(())
}

fn builtin_print(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Null)
}

fn builtin_len(args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_args("len", &args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::List(l) => Ok(Value::Int(l.borrow().len() as i64)),
        other => Err(RuntimeError::TypeError(format!(
            "len() expects a string or list, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_push(args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_args("push", &args, 2)?;
    match &args[0] {
        Value::List(l) => {
            l.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(RuntimeError::TypeError(format!(
            "push() expects a list, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_pop(args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_args("pop", &args, 1)?;
    match &args[0] {
        Value::List(l) => match l.borrow_mut().pop() {
            Some(v) => Ok(v),
            None => Err(RuntimeError::TypeError("pop() from empty list".to_string())),
        },
        other => Err(RuntimeError::TypeError(format!(
            "pop() expects a list, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_str(args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_args("str", &args, 1)?;
    Ok(Value::Str(args[0].to_string()))
}

fn builtin_abs(args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_args("abs", &args, 1)?;
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(i.wrapping_abs())),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(RuntimeError::TypeError(format!(
            "abs() expects a number, got {}",
            other.type_name()
        ))),
    }
}
