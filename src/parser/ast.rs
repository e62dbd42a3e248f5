//! AST node types for the script language.
//!
//! Every node derives serde traits because function bodies travel inside
//! checkpoint artifacts: a captured function is persisted as its name,
//! parameter list and body statements.

use serde::{Deserialize, Serialize};

/// A parsed program. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<StatementType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementType {
    ExpressionStatement {
        expression: ExpressionType,
    },
    FunctionDeclaration(FunctionData),
    ReturnStatement {
        argument: Option<ExpressionType>,
    },
    IfStatement {
        test: ExpressionType,
        consequent: Vec<StatementType>,
        alternate: Option<Vec<StatementType>>,
    },
    WhileStatement {
        test: ExpressionType,
        body: Vec<StatementType>,
    },
}

/// A function declaration. The body is kept verbatim so the value can be
/// re-serialized into an artifact and called by a later unit in the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionData {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<StatementType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionType {
    Literal(LiteralType),
    Identifier {
        name: String,
    },
    ListExpression {
        elements: Vec<ExpressionType>,
    },
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<ExpressionType>,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    AssignmentExpression {
        target: String,
        value: Box<ExpressionType>,
    },
    CallExpression {
        callee: String,
        arguments: Vec<ExpressionType>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralType {
    NullLiteral,
    BooleanLiteral(bool),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Minus,
    LogicalNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}
