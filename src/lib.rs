//! # statecap - State-Capture and Checkpoint Engine
//!
//! Runs a unit of script source inside a namespace pre-populated from
//! previously captured checkpoints, statically determines which top-level
//! names make up that unit's exported global state, and persists the
//! resulting namespace to a binary artifact that can seed the next unit
//! in a chain.
//!
//! ## Quick Start
//!
//! ### Parsing a script
//!
//! ```
//! use statecap::parser::ScriptParser;
//!
//! let code = "x = 5 + 3;";
//! let program = ScriptParser::parse_to_ast_from_str(code).unwrap();
//! println!("Parsed {} statements", program.body.len());
//! ```
//!
//! ### Running a script against a namespace
//!
//! ```
//! use statecap::parser::ScriptParser;
//! use statecap::runner::api::run_program;
//! use statecap::runner::ds::env::Namespace;
//!
//! let program = ScriptParser::parse_to_ast_from_str("y = 40 + 2;").unwrap();
//! let mut ns = Namespace::new();
//! run_program(&program, &mut ns).unwrap();
//! let y = ns.get("y").unwrap();
//! println!("y = {:?}", y);
//! ```
//!
//! ### Capturing a checkpoint
//!
//! ```no_run
//! use statecap::pipeline::{self, CaptureMode, RunRequest};
//!
//! let request = RunRequest {
//!     source: "a = []; b = a;".to_string(),
//!     state_files: vec![],
//!     mode: CaptureMode::Combined { output_base: "node1_state".into() },
//! };
//! pipeline::run(&request).unwrap();
//! ```
//!
//! ## Architecture
//!
//! Four components, each depending only on the one below it:
//!
//! 1. `parser::static_semantics` - the global scope resolver. Walks the
//!    AST with a context stack and classifies every name that is a
//!    candidate for capture.
//! 2. `state::loader` - decodes prior checkpoint artifacts, in order,
//!    into one seed namespace (later artifacts win name collisions).
//! 3. `runner` - a synchronous tree-walking interpreter that executes
//!    the program with the seed namespace as its mutable global
//!    environment.
//! 4. `state::capture` - merges the mutated namespace with inherited
//!    state, guided by the classification, and encodes the result with an
//!    identity-preserving object-graph codec.
//!
//! Two names bound to the same underlying list before a capture are bound
//! to the same underlying list after the artifact is reloaded: the codec
//! keys object identity on `Rc` pointers and emits back-references, never
//! independent copies.

#[macro_use]
extern crate lazy_static;

pub mod error;
pub mod parser;
pub mod pipeline;
pub mod runner;
pub mod state;
