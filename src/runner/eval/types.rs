//! Core types for the evaluation engine.

use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::value::Value;

/// Completion record type.
/// Represents how a statement finished executing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionType {
    /// Normal completion - execution continues.
    Normal,
    /// Return completion - unwinds to the nearest function call.
    Return,
}

/// Completion record. Every statement evaluation returns one.
pub struct Completion {
    pub completion_type: CompletionType,
    pub value: Option<Value>,
}

impl Completion {
    /// Create a normal completion with no value.
    pub fn normal() -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: None,
        }
    }

    /// Create a normal completion with a value.
    pub fn normal_with_value(value: Value) -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: Some(value),
        }
    }

    /// Create a return completion.
    pub fn return_value(value: Value) -> Self {
        Completion {
            completion_type: CompletionType::Return,
            value: Some(value),
        }
    }

    pub fn is_abrupt(&self) -> bool {
        self.completion_type != CompletionType::Normal
    }

    /// Get the value, or null if none.
    pub fn get_value(&self) -> Value {
        self.value.clone().unwrap_or(Value::Null)
    }
}

/// Result type for statement execution.
pub type EvalResult = Result<Completion, RuntimeError>;

/// Result type for value-returning operations.
pub type ValueResult = Result<Value, RuntimeError>;
