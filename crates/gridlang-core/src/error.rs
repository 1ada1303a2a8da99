//! Core error types for gridlang-core.
//!
//! Uses `thiserror` for structured, matchable error variants. These cover
//! recoverable structural failures only; compile-time graph problems are
//! reported as diagnostics by the codegen crate, and argument-slot index or
//! registration misuse is a panic (a core bug, not a user-graph problem).

use thiserror::Error;

use crate::id::{FunctionId, NodeId};
use crate::pos::GridPos;

/// Core errors produced by the gridlang-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Attempting to place or move a node onto a cell another node occupies.
    #[error("grid cell {position} is already occupied")]
    CellOccupied { position: GridPos },

    /// A node ID was not found on the function's grid.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A function name was not found in the module.
    #[error("function not found: '{name}'")]
    FunctionNotFound { name: String },

    /// A function ID was not found in the module.
    #[error("function not found: FunctionId({id})", id = id.0)]
    FunctionIdNotFound { id: FunctionId },

    /// Renaming a function to a name another function already holds.
    #[error("duplicate function name: '{name}'")]
    DuplicateFunctionName { name: String },
}
