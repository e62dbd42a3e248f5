use std::fmt;
use std::fmt::{Display, Formatter};

/// A runtime fault raised by the executed program. Carried out of the
/// executor unchanged; the pipeline wraps it into an ExecutionError with
/// the fault's kind tag and message.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    NameError(String),
    TypeError(String),
    DivisionError(String),
    ArityError(String),
    RecursionError(String),
}

impl RuntimeError {
    /// Stable tag identifying the fault class.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::NameError(_) => "NameError",
            RuntimeError::TypeError(_) => "TypeError",
            RuntimeError::DivisionError(_) => "DivisionError",
            RuntimeError::ArityError(_) => "ArityError",
            RuntimeError::RecursionError(_) => "RecursionError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RuntimeError::NameError(m)
            | RuntimeError::TypeError(m)
            | RuntimeError::DivisionError(m)
            | RuntimeError::ArityError(m)
            | RuntimeError::RecursionError(m) => m,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for RuntimeError {}
