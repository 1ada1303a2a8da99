//! The emission engine: walks a module's graphs and produces Erlang source.
//!
//! Emission never aborts on a bad subtree. Every node reports success as a
//! boolean while appending zero or more diagnostics, and callers keep
//! assembling text either way -- partial text for a failed subtree is fine,
//! the authoritative signal is the flag. A per-branch identity path guards
//! against cycles, so the walk terminates on any graph, including malformed
//! ones.
//!
//! # Generated shape
//!
//! A function becomes one clause per root node, ordered by grid position
//! (x ascending, y breaking ties). Every clause but the last is terminated
//! with `;`, the last with `.`:
//!
//! ```text
//! add(X, Y) ->
//!     (X + Y).
//! ```

use gridlang_core::node::{
    NodeKind, BINARY_LHS_SLOT, BINARY_RHS_SLOT, ROOT_FIRST_PATTERN_SLOT, ROOT_GUARD_SLOT,
    ROOT_RETURN_SLOT, UNARY_INPUT_SLOT,
};
use gridlang_core::ops::{BinaryOp, UnaryOp};
use gridlang_core::{Function, FunctionId, Module, NodeId};
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// Result of emitting a module: the generated source, whether every clause
/// emitted cleanly, and every problem found along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitOutput {
    /// Generated Erlang source. Present (possibly partial) even on failure.
    pub source: String,
    /// `true` only if every function's every clause emitted without problems.
    pub success: bool,
    /// All problems found, across all functions.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles every function in the module, concatenating their output in
/// module order with a blank line between functions.
pub fn emit_module(module: &Module) -> EmitOutput {
    let mut diagnostics = Vec::new();
    let mut success = true;
    let mut parts: Vec<String> = Vec::new();

    for function in module.functions() {
        let mut text = String::new();
        if !emit_function(module, function, &mut text, &mut diagnostics) {
            success = false;
        }
        if !text.is_empty() {
            parts.push(text);
        }
    }

    EmitOutput {
        source: parts.join("\n"),
        success,
        diagnostics,
    }
}

/// Compiles one function: one clause per root node, ordered left to right
/// on the grid. Returns `true` only if every clause emitted cleanly; a
/// function without root nodes contributes nothing and succeeds.
pub fn emit_function(
    module: &Module,
    function: &Function,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let mut roots = function.root_nodes();
    roots.sort_by_key(|&id| function.position_of(id).unwrap_or_default());

    let mut pass = true;

    for (i, &root) in roots.iter().enumerate() {
        if !emit_node(module, function, root, output, diagnostics, &[]) {
            pass = false;
        }

        // Every clause but the last ends with a semicolon; the last one
        // closes the definition with a full stop.
        output.push_str(if i + 1 < roots.len() { ";" } else { "." });
        output.push('\n');
    }

    pass
}

/// Emits the expression rooted at one node.
///
/// This wrapper owns the cycle guard: if the node already appears on the
/// identity path it reports a cycle and stops, otherwise it extends its own
/// copy of the path (fan-out to a shared producer is legal, so each branch
/// gets an independent copy) and dispatches on the variant.
fn emit_node(
    module: &Module,
    function: &Function,
    id: NodeId,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
    path: &[NodeId],
) -> bool {
    if path.contains(&id) {
        diagnostics.push(Diagnostic::new(
            function.id(),
            id,
            "Cyclic graph detected.",
        ));
        return false;
    }

    let mut path = path.to_vec();
    path.push(id);

    let node = match function.node(id) {
        Some(node) => node,
        None => return false,
    };

    match node.kind() {
        NodeKind::Root => emit_root(module, function, id, output, diagnostics, &path),
        NodeKind::Integer(value) => {
            output.push_str(&value.to_string());
            true
        }
        NodeKind::Boolean(value) => {
            output.push_str(if *value { "true" } else { "false" });
            true
        }
        NodeKind::Variable(name) => emit_variable(function, id, name, output, diagnostics),
        NodeKind::Binary(op) => emit_binary(module, function, id, *op, output, diagnostics, &path),
        NodeKind::Unary(op) => emit_unary(module, function, id, *op, output, diagnostics, &path),
        NodeKind::Call { target, .. } => {
            emit_call(module, function, id, *target, output, diagnostics, &path)
        }
    }
}

/// One clause: `name(Patterns) [when Guard ]->\n\tReturnExpression`.
///
/// A missing pattern fails the clause but the remaining patterns are still
/// attempted, so one compile surfaces every hole at once. The guard is
/// optional; the return expression is not.
fn emit_root(
    module: &Module,
    function: &Function,
    id: NodeId,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
    path: &[NodeId],
) -> bool {
    let mut pass = true;

    output.push_str(function.name());
    output.push('(');

    for i in 0..function.arity() {
        if i > 0 {
            output.push_str(", ");
        }
        match function.connector(id, ROOT_FIRST_PATTERN_SLOT + i) {
            Some(pattern) => {
                if !emit_node(module, function, pattern, output, diagnostics, path) {
                    pass = false;
                }
            }
            None => {
                diagnostics.push(Diagnostic::new(
                    function.id(),
                    id,
                    format!("Missing pattern for argument {}.", i + 1),
                ));
                pass = false;
            }
        }
    }

    output.push_str(") ");

    if let Some(guard) = function.connector(id, ROOT_GUARD_SLOT) {
        output.push_str("when ");
        if !emit_node(module, function, guard, output, diagnostics, path) {
            pass = false;
        }
        output.push(' ');
    }

    output.push_str("->\n\t");

    match function.connector(id, ROOT_RETURN_SLOT) {
        Some(value) => {
            if !emit_node(module, function, value, output, diagnostics, path) {
                pass = false;
            }
        }
        None => {
            diagnostics.push(Diagnostic::new(
                function.id(),
                id,
                "Missing return expression.",
            ));
            pass = false;
        }
    }

    pass
}

/// `(Lhs <symbol> Rhs)`. Both operands are always attempted so one compile
/// reports both holes of a doubly-disconnected operator.
fn emit_binary(
    module: &Module,
    function: &Function,
    id: NodeId,
    op: BinaryOp,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
    path: &[NodeId],
) -> bool {
    let mut lhs_ok = false;
    let mut rhs_ok = false;

    output.push('(');

    match function.connector(id, BINARY_LHS_SLOT) {
        Some(lhs) => lhs_ok = emit_node(module, function, lhs, output, diagnostics, path),
        None => diagnostics.push(Diagnostic::new(
            function.id(),
            id,
            "Missing LHS expression.",
        )),
    }

    output.push(' ');
    output.push_str(op.symbol());
    output.push(' ');

    match function.connector(id, BINARY_RHS_SLOT) {
        Some(rhs) => rhs_ok = emit_node(module, function, rhs, output, diagnostics, path),
        None => diagnostics.push(Diagnostic::new(
            function.id(),
            id,
            "Missing RHS expression.",
        )),
    }

    output.push(')');

    lhs_ok && rhs_ok
}

/// `(<symbol> Input)`.
fn emit_unary(
    module: &Module,
    function: &Function,
    id: NodeId,
    op: UnaryOp,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
    path: &[NodeId],
) -> bool {
    let mut input_ok = false;

    output.push('(');
    output.push_str(op.symbol());
    output.push(' ');

    match function.connector(id, UNARY_INPUT_SLOT) {
        Some(input) => input_ok = emit_node(module, function, input, output, diagnostics, path),
        None => diagnostics.push(Diagnostic::new(
            function.id(),
            id,
            "Missing Input expression.",
        )),
    }

    output.push(')');

    input_ok
}

/// A variable reference. Erlang binding variables begin with an uppercase
/// letter; anything else is diagnosed, though the name is still emitted as
/// partial text.
fn emit_variable(
    function: &Function,
    id: NodeId,
    name: &str,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    output.push_str(name);

    let valid = name
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false);
    if !valid {
        diagnostics.push(Diagnostic::new(
            function.id(),
            id,
            "Variable name must begin with an uppercase letter.",
        ));
    }

    valid
}

/// `target(Args)`. An expired target fails outright with no partial text;
/// with a live target, each missing argument is its own diagnostic and the
/// remaining arguments are still attempted.
fn emit_call(
    module: &Module,
    function: &Function,
    id: NodeId,
    target: FunctionId,
    output: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
    path: &[NodeId],
) -> bool {
    let target_fn = match module.by_id(target) {
        Some(target_fn) => target_fn,
        None => {
            diagnostics.push(Diagnostic::new(
                function.id(),
                id,
                "Referenced function was deleted.",
            ));
            return false;
        }
    };

    let mut pass = true;

    output.push_str(target_fn.name());
    output.push('(');

    let argc = function.node(id).map(|n| n.num_arguments()).unwrap_or(0);
    for i in 0..argc {
        if i > 0 {
            output.push_str(", ");
        }
        match function.connector(id, i) {
            Some(arg) => {
                if !emit_node(module, function, arg, output, diagnostics, path) {
                    pass = false;
                }
            }
            None => {
                diagnostics.push(Diagnostic::new(
                    function.id(),
                    id,
                    format!("Required argument {} missing.", i + 1),
                ));
                pass = false;
            }
        }
    }

    output.push(')');

    pass
}
