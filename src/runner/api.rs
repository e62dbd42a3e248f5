//! Executor entry point.

use log::debug;

use crate::parser::ast::Program;
use crate::runner::ds::env::{EvalContext, Namespace};
use crate::runner::ds::error::RuntimeError;
use crate::runner::eval::statement::execute_statements;

/// Run a program's statements in source order with `namespace` as the
/// mutable top-level environment. Inherited names are visible as
/// already-bound globals; new top-level definitions land in the same
/// namespace object. A top-level `return` ends the run early: the
/// statements after it do not execute and the run still succeeds. On a
/// fault the partial mutations are left in place but the caller must
/// treat the run as failed and must not serialize the namespace.
pub fn run_program(program: &Program, namespace: &mut Namespace) -> Result<(), RuntimeError> {
    debug!(
        "executing {} statement(s) against {} inherited binding(s)",
        program.body.len(),
        namespace.len()
    );
    let mut ctx = EvalContext::new(namespace);
    execute_statements(&program.body, &mut ctx)?;
    Ok(())
}
