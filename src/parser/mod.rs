mod api;
pub mod ast;
pub mod static_semantics;
#[cfg(test)]
mod unit_tests;

pub use api::{parse_to_ast, parse_to_pairs, Rule, ScriptParser};
