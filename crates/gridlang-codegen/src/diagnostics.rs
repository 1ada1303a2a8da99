//! Compile-time problem records.
//!
//! A [`Diagnostic`] is non-fatal: emission collects them and keeps going,
//! so one compile surfaces every independent problem in the graph. The
//! record carries IDs, not references -- the node that caused a problem may
//! well be deleted between compile and display, and a consumer resolving
//! the IDs simply skips diagnostics whose node no longer exists.

use std::fmt;

use gridlang_core::{FunctionId, NodeId};
use serde::{Deserialize, Serialize};

/// A non-fatal compile-time problem tied to the originating node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The function whose grid holds the offending node.
    pub function: FunctionId,
    /// The offending node. May be stale by the time it is displayed.
    pub node: NodeId,
    /// Human-readable description of the problem.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic for a node.
    pub fn new(function: FunctionId, node: NodeId, message: impl Into<String>) -> Self {
        Diagnostic {
            function,
            node,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} in function {}: {}",
            self.node, self.function, self.message
        )
    }
}
