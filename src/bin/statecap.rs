//! CLI wrapper for the statecap checkpoint engine.
//!
//! Usage:
//!   statecap -i node1.sc -o node1_state
//!   statecap -i node2.sc -o node2_state --state-files node1_state.chk
//!   statecap -i node3.sc --per-name --state-files node2_state.chk

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use statecap::error::EngineError;
use statecap::pipeline::{self, CaptureMode, RunRequest, RunSummary};

/// Expected extension of input scripts.
const SOURCE_EXT: &str = "sc";

#[derive(Parser)]
#[command(name = "statecap", version, about = "Run a script against inherited checkpoint state and capture its global state")]
struct Args {
    /// Input file to be parsed and evaluated
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Output artifact base name (combined mode)
    #[arg(short = 'o', long = "output", value_name = "BASE")]
    output: Option<String>,

    /// Prior state artifacts to deserialize, in order
    #[arg(long = "state-files", value_name = "FILE", num_args = 0..)]
    state_files: Vec<PathBuf>,

    /// Write one artifact per captured name instead of one combined artifact
    #[arg(long = "per-name")]
    per_name: bool,

    /// Increase stderr log verbosity (-v, -vv, ...)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose as usize)
        .init()
        .ok();

    match run(args) {
        Ok(summary) => {
            info!(
                "captured {} binding(s) into {} artifact(s)",
                summary.captured,
                summary.artifacts.len()
            );
        }
        Err(err @ EngineError::Usage(_)) => {
            eprintln!("{}", err);
            process::exit(2);
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<RunSummary, EngineError> {
    if !args.input.is_file() {
        return Err(EngineError::Usage(format!(
            "the file {} does not exist",
            args.input.display()
        )));
    }
    if args.input.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXT) {
        return Err(EngineError::Usage(format!(
            "input file should be a .{} script",
            SOURCE_EXT
        )));
    }

    let mode = if args.per_name {
        CaptureMode::PerName
    } else {
        match &args.output {
            Some(output_base) => CaptureMode::Combined {
                output_base: output_base.clone(),
            },
            None => {
                return Err(EngineError::Usage(
                    "output base name (-o) is required in combined mode".to_string(),
                ))
            }
        }
    };

    let source = fs::read_to_string(&args.input)
        .map_err(|e| EngineError::Usage(format!("cannot read {}: {}", args.input.display(), e)))?;

    pipeline::run(&RunRequest {
        source,
        state_files: args.state_files,
        mode,
    })
}
