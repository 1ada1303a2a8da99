//! Operator vocabulary for operator nodes.
//!
//! Each operator carries a human-facing display name (palette label) and the
//! Erlang symbol it emits. The symbol is spliced verbatim between (binary)
//! or before (unary) the operand expressions, so word operators like `rem`
//! and `band` read naturally in the generated source.

use serde::{Deserialize, Serialize};

/// Binary operators, in catalogue registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Integer division, `div` in Erlang.
    DivideRounded,
    Remainder,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    And,
    Or,
    Xor,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

impl BinaryOp {
    /// All binary operators, in catalogue registration order.
    pub const ALL: [BinaryOp; 18] = [
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::DivideRounded,
        BinaryOp::Remainder,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::Greater,
        BinaryOp::GreaterEqual,
        BinaryOp::Less,
        BinaryOp::LessEqual,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
        BinaryOp::BitwiseAnd,
        BinaryOp::BitwiseOr,
        BinaryOp::BitwiseXor,
    ];

    /// Palette display name.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Subtract => "Subtract",
            BinaryOp::Multiply => "Multiply",
            BinaryOp::Divide => "Divide",
            BinaryOp::DivideRounded => "Divide (Rounded)",
            BinaryOp::Remainder => "Remainder",
            BinaryOp::Equal => "Equal",
            BinaryOp::NotEqual => "Not Equal",
            BinaryOp::Greater => "Greater",
            BinaryOp::GreaterEqual => "Greater or Equal",
            BinaryOp::Less => "Less",
            BinaryOp::LessEqual => "Less or Equal",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
            BinaryOp::Xor => "XOr",
            BinaryOp::BitwiseAnd => "Bitwise And",
            BinaryOp::BitwiseOr => "Bitwise Or",
            BinaryOp::BitwiseXor => "Bitwise XOr",
        }
    }

    /// Erlang operator symbol, emitted between the operand expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::DivideRounded => "div",
            BinaryOp::Remainder => "rem",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "/=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "=<",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::BitwiseAnd => "band",
            BinaryOp::BitwiseOr => "bor",
            BinaryOp::BitwiseXor => "bxor",
        }
    }
}

/// Unary operators, in catalogue registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    BitwiseNot,
}

impl UnaryOp {
    /// All unary operators, in catalogue registration order.
    pub const ALL: [UnaryOp; 2] = [UnaryOp::Not, UnaryOp::BitwiseNot];

    /// Palette display name.
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Not => "Not",
            UnaryOp::BitwiseNot => "Bitwise Not",
        }
    }

    /// Erlang operator symbol, emitted before the operand expression.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::BitwiseNot => "bnot",
        }
    }
}
