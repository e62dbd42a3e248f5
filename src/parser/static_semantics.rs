//! Static global-scope resolution.
//!
//! Walks a parsed [`Program`] with a stack of scope frames and classifies
//! every name that is a candidate for state capture. Classification is
//! name-based and static: a classified name may never actually be defined
//! at run time, and a name both defined at top level and shadowed inside a
//! function body is still capturable.
//!
//! Scoping rule: call-argument frames are transparent for capture while
//! function-body frames block it. A top-level assignment inside a call's
//! argument list (`f(x = 1);`) takes effect on the global namespace at run
//! time, so `x` classifies as a global; an assignment inside a function
//! body stays local and does not.

use std::collections::BTreeMap;

use crate::parser::ast::{ExpressionType, Program, StatementType};

/// How a classified name qualifies for capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingKind {
    /// A top-level variable. `pure` is true when every top-level
    /// assignment to it has a side-effect-free right-hand side, which
    /// makes it eligible for per-name capture.
    GlobalVariable { pure: bool },
    /// A top-level function declaration.
    GlobalFunction,
}

/// The resolver's output: name to binding-kind map.
#[derive(Debug, Default)]
pub struct Classification {
    entries: BTreeMap<String, BindingKind>,
}

impl Classification {
    pub fn kind_of(&self, name: &str) -> Option<BindingKind> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BindingKind)> {
        self.entries.iter()
    }

    fn record_function(&mut self, name: &str) {
        self.entries
            .insert(name.to_string(), BindingKind::GlobalFunction);
    }

    /// Record a name that is merely referenced, not assigned. Referenced
    /// names are capture candidates (their values may arrive from a prior
    /// checkpoint), but a reference never changes an existing entry.
    fn record_reference(&mut self, name: &str) {
        self.entries
            .entry(name.to_string())
            .or_insert(BindingKind::GlobalVariable { pure: false });
    }

    /// Record an assigned variable. A GlobalFunction entry is never
    /// downgraded. Purity is sticky-false across repeated assignments.
    fn record_variable(&mut self, name: &str, pure: bool) {
        match self.entries.get_mut(name) {
            Some(BindingKind::GlobalFunction) => {}
            Some(BindingKind::GlobalVariable { pure: existing }) => {
                *existing = *existing && pure;
            }
            None => {
                self.entries
                    .insert(name.to_string(), BindingKind::GlobalVariable { pure });
            }
        }
    }
}

/// One frame of the resolver's context stack.
#[derive(Debug, PartialEq)]
enum ScopeFrame {
    Global,
    FunctionBody,
    CallArgument,
}

/// The global scope resolver. Created per invocation; the context stack
/// is discarded once classification completes.
pub struct GlobalScopeResolver {
    context: Vec<ScopeFrame>,
    classification: Classification,
}

impl GlobalScopeResolver {
    pub fn new() -> Self {
        GlobalScopeResolver {
            context: vec![ScopeFrame::Global],
            classification: Classification::default(),
        }
    }

    /// Classify every capture candidate in `program`. Sibling visitation
    /// order does not affect membership of the result, only purity flags,
    /// which fold over top-level assignments in source order.
    pub fn resolve(mut self, program: &Program) -> Classification {
        for statement in &program.body {
            self.visit_statement(statement);
        }
        self.classification
    }

    fn visit_statement(&mut self, statement: &StatementType) {
        match statement {
            StatementType::ExpressionStatement { expression } => {
                self.visit_expression(expression);
            }
            StatementType::FunctionDeclaration(function) => {
                if *self.context.last().unwrap() == ScopeFrame::Global {
                    self.classification.record_function(&function.name);
                }
                self.context.push(ScopeFrame::FunctionBody);
                for s in &function.body {
                    self.visit_statement(s);
                }
                self.context.pop();
            }
            StatementType::ReturnStatement { argument } => {
                if let Some(argument) = argument {
                    self.visit_expression(argument);
                }
            }
            StatementType::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expression(test);
                for s in consequent {
                    self.visit_statement(s);
                }
                if let Some(alternate) = alternate {
                    for s in alternate {
                        self.visit_statement(s);
                    }
                }
            }
            StatementType::WhileStatement { test, body } => {
                self.visit_expression(test);
                for s in body {
                    self.visit_statement(s);
                }
            }
        }
    }

    fn visit_expression(&mut self, expression: &ExpressionType) {
        match expression {
            ExpressionType::Literal(_) => {}
            ExpressionType::Identifier { name } => {
                if self.in_global_capture_context() {
                    self.classification.record_reference(name);
                }
            }
            ExpressionType::ListExpression { elements } => {
                for e in elements {
                    self.visit_expression(e);
                }
            }
            ExpressionType::UnaryExpression { argument, .. } => {
                self.visit_expression(argument);
            }
            ExpressionType::BinaryExpression { left, right, .. } => {
                self.visit_expression(left);
                self.visit_expression(right);
            }
            ExpressionType::AssignmentExpression { target, value } => {
                if self.in_global_capture_context() {
                    let pure = self.is_pure_expression(value);
                    self.classification.record_variable(target, pure);
                }
                self.visit_expression(value);
            }
            ExpressionType::CallExpression { callee, arguments } => {
                if self.in_global_capture_context() {
                    self.classification.record_reference(callee);
                }
                self.context.push(ScopeFrame::CallArgument);
                for a in arguments {
                    self.visit_expression(a);
                }
                self.context.pop();
            }
        }
    }

    /// True when no function-body frame encloses the current position.
    fn in_global_capture_context(&self) -> bool {
        self.context
            .iter()
            .all(|frame| *frame != ScopeFrame::FunctionBody)
    }

    /// A pure expression is determinable without externally observable
    /// side effects: literals, list literals of pure elements, operators
    /// over pure operands, references to names already known pure, and
    /// assignments whose value is pure. Calls never are.
    fn is_pure_expression(&self, expression: &ExpressionType) -> bool {
        match expression {
            ExpressionType::Literal(_) => true,
            ExpressionType::Identifier { name } => matches!(
                self.classification.kind_of(name),
                Some(BindingKind::GlobalVariable { pure: true }) | Some(BindingKind::GlobalFunction)
            ),
            ExpressionType::ListExpression { elements } => {
                elements.iter().all(|e| self.is_pure_expression(e))
            }
            ExpressionType::UnaryExpression { argument, .. } => self.is_pure_expression(argument),
            ExpressionType::BinaryExpression { left, right, .. } => {
                self.is_pure_expression(left) && self.is_pure_expression(right)
            }
            ExpressionType::AssignmentExpression { value, .. } => self.is_pure_expression(value),
            ExpressionType::CallExpression { .. } => false,
        }
    }
}

impl Default for GlobalScopeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper: classify a whole program in one call.
pub fn classify_program(program: &Program) -> Classification {
    GlobalScopeResolver::new().resolve(program)
}
