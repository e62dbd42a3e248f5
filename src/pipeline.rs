//! The checkpoint pipeline.
//!
//! Sequences the four stages strictly: parse, classify, load prior
//! state, execute, capture. Each stage's input is the previous stage's
//! completed output, so nothing runs concurrently; a failure at any
//! stage aborts the run and nothing is written after a fault.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::EngineError;
use crate::parser::static_semantics::classify_program;
use crate::parser::ScriptParser;
use crate::runner::api::run_program;
use crate::state::{capture, loader};

/// Where captured state goes.
pub enum CaptureMode {
    /// One artifact named `<output_base>.chk` holding the whole
    /// cumulative global state.
    Combined { output_base: String },
    /// One artifact per pure classified name (`var_<n>.chk`,
    /// `func_<n>.chk`).
    PerName,
}

/// One unit of work: source text, prior artifacts, capture mode.
pub struct RunRequest {
    pub source: String,
    pub state_files: Vec<PathBuf>,
    pub mode: CaptureMode,
}

pub struct RunSummary {
    /// Artifacts written, in write order.
    pub artifacts: Vec<PathBuf>,
    /// Bindings captured across those artifacts.
    pub captured: usize,
}

/// Execute one request end to end.
pub fn run(request: &RunRequest) -> Result<RunSummary, EngineError> {
    let program = ScriptParser::parse_to_ast_from_str(&request.source)
        .map_err(|e| EngineError::Parse(e.to_string()))?;

    let classification = classify_program(&program);
    debug!("classified {} capture candidate(s)", classification.len());

    let seed = loader::load_state_files(&request.state_files)?;

    // The executed namespace starts as a shallow clone: it shares list
    // and function objects with the seed, which is what lets capture
    // preserve aliasing between inherited and freshly-assigned names.
    let mut namespace = seed.clone();
    run_program(&program, &mut namespace)?;

    match &request.mode {
        CaptureMode::Combined { output_base } => {
            let output = capture::capture_combined(&classification, &seed, &namespace);
            let captured = output.len();
            let path = capture::write_combined(output_base, &output)?;
            Ok(RunSummary {
                artifacts: vec![path],
                captured,
            })
        }
        CaptureMode::PerName => {
            let artifacts = capture::write_per_name(&classification, &namespace, Path::new("."))?;
            let captured = artifacts.len();
            Ok(RunSummary { artifacts, captured })
        }
    }
}
