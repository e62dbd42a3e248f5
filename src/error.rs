//! Top-level error taxonomy.
//!
//! Every failure surfaces to the caller as one of these kinds, ordered by
//! pipeline stage: UsageError (before any state is touched), ParseError,
//! DeserializationError, ExecutionError, SerializationError. Nothing is
//! retried and no partially-written artifact is ever left in a loadable
//! state.

use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::runner::ds::error::RuntimeError;

#[derive(Debug)]
pub enum EngineError {
    /// Bad CLI input: non-existent source file, wrong extension, missing
    /// output base.
    Usage(String),
    /// Source text is not a syntactically valid program.
    Parse(String),
    /// A prior artifact is missing, corrupt or codec-incompatible. Names
    /// the offending path; a single bad artifact aborts the whole load.
    Deserialization { path: PathBuf, message: String },
    /// The program faulted at run time. Carries the fault's kind tag.
    Execution { kind: &'static str, message: String },
    /// A produced value could not be encoded or written.
    Serialization(String),
}

impl EngineError {
    pub fn deserialization(path: &Path, message: impl Into<String>) -> Self {
        EngineError::Deserialization {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        EngineError::Serialization(message.into())
    }
}

impl From<RuntimeError> for EngineError {
    fn from(fault: RuntimeError) -> Self {
        EngineError::Execution {
            kind: fault.kind(),
            message: fault.message().to_string(),
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Usage(m) => write!(f, "UsageError: {}", m),
            EngineError::Parse(m) => write!(f, "ParseError: {}", m),
            EngineError::Deserialization { path, message } => {
                write!(f, "DeserializationError: {}: {}", path.display(), message)
            }
            EngineError::Execution { kind, message } => {
                write!(f, "ExecutionError: {}: {}", kind, message)
            }
            EngineError::Serialization(m) => write!(f, "SerializationError: {}", m),
        }
    }
}

impl std::error::Error for EngineError {}
