//! The node model: a closed set of variants plus named argument slots.
//!
//! Every node is a [`Node`]: a [`NodeKind`] variant paired with an ordered
//! list of argument slots. Slots carry a name and a pattern flag; the wiring
//! itself (which node feeds which slot) lives as edges in the owning
//! function's graph, so cloning a `Node` copies its slot layout but never
//! its connections.
//!
//! Slot lists are only rebuilt by lifecycle handling inside this crate:
//! placement and arity changes reshape root nodes, module changes reshape
//! call nodes. External code reads slots, it never edits them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::id::FunctionId;
use crate::ops::{BinaryOp, UnaryOp};

/// Slot index of a root node's return expression.
pub const ROOT_RETURN_SLOT: usize = 0;
/// Slot index of a root node's optional guard expression.
pub const ROOT_GUARD_SLOT: usize = 1;
/// Slot index of a root node's first argument pattern; pattern `i` lives at
/// `ROOT_FIRST_PATTERN_SLOT + i`.
pub const ROOT_FIRST_PATTERN_SLOT: usize = 2;

/// Slot indices of a binary operator's operands.
pub const BINARY_LHS_SLOT: usize = 0;
pub const BINARY_RHS_SLOT: usize = 1;
/// Slot index of a unary operator's operand.
pub const UNARY_INPUT_SLOT: usize = 0;

/// One named argument slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSlot {
    /// The argument's name, unique within the node.
    pub name: String,
    /// Whether the connected expression must be matchable at compile time
    /// (it may contain unbound variables to be bound by matching).
    pub is_pattern: bool,
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// One function clause header: argument patterns, optional guard,
    /// return expression.
    Root,
    /// Constant integer term.
    Integer(i64),
    /// Constant boolean term.
    Boolean(bool),
    /// A named binding variable. Erlang requires the name to begin with an
    /// uppercase letter; emission diagnoses violations.
    Variable(String),
    /// Binary operator application.
    Binary(BinaryOp),
    /// Unary operator application.
    Unary(UnaryOp),
    /// A call to another function in the module. `name` is the last-seen
    /// target name, refreshed whenever the module changes; `target` is the
    /// authoritative identity.
    Call { target: FunctionId, name: String },
}

/// A unit of computation or data placed on a function's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) slots: SmallVec<[ArgSlot; 4]>,
}

impl Node {
    // -----------------------------------------------------------------------
    // Constructors, one per variant
    // -----------------------------------------------------------------------

    /// Creates a root node. `ReturnValue` and `Guard` are registered here;
    /// the per-argument pattern slots appear when the node is placed in a
    /// function (they depend on its arity).
    pub fn root() -> Self {
        let mut node = Node {
            kind: NodeKind::Root,
            slots: SmallVec::new(),
        };
        node.register_argument("ReturnValue", false);
        node.register_argument("Guard", false);
        node
    }

    /// Creates an integer term node.
    pub fn integer(value: i64) -> Self {
        Node {
            kind: NodeKind::Integer(value),
            slots: SmallVec::new(),
        }
    }

    /// Creates a boolean term node.
    pub fn boolean(value: bool) -> Self {
        Node {
            kind: NodeKind::Boolean(value),
            slots: SmallVec::new(),
        }
    }

    /// Creates a variable node.
    pub fn variable(name: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Variable(name.into()),
            slots: SmallVec::new(),
        }
    }

    /// Creates a binary operator node with `LeftHandSide` and
    /// `RightHandSide` slots.
    pub fn binary(op: BinaryOp) -> Self {
        let mut node = Node {
            kind: NodeKind::Binary(op),
            slots: SmallVec::new(),
        };
        node.register_argument("LeftHandSide", false);
        node.register_argument("RightHandSide", false);
        node
    }

    /// Creates a unary operator node with an `Input` slot.
    pub fn unary(op: UnaryOp) -> Self {
        let mut node = Node {
            kind: NodeKind::Unary(op),
            slots: SmallVec::new(),
        };
        node.register_argument("Input", false);
        node
    }

    /// Creates a call node targeting another function, with one
    /// `Arg1..ArgN` slot per target argument.
    pub fn call(target: FunctionId, name: impl Into<String>, arity: usize) -> Self {
        let mut node = Node {
            kind: NodeKind::Call {
                target,
                name: name.into(),
            },
            slots: SmallVec::new(),
        };
        node.rebuild_call_slots(arity);
        node
    }

    // -----------------------------------------------------------------------
    // Identity & presentation
    // -----------------------------------------------------------------------

    /// Returns the node's variant.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns `true` for root nodes.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    /// Returns `true` for call nodes.
    pub fn is_call(&self) -> bool {
        matches!(self.kind, NodeKind::Call { .. })
    }

    /// Human-facing node label.
    pub fn display_name(&self) -> String {
        match &self.kind {
            NodeKind::Root => "Root".to_string(),
            NodeKind::Integer(value) => format!("Integer ({})", value),
            NodeKind::Boolean(value) => format!("Boolean ({})", value),
            NodeKind::Variable(name) => format!("Variable ({})", name),
            NodeKind::Binary(op) => op.name().to_string(),
            NodeKind::Unary(op) => op.name().to_string(),
            NodeKind::Call { name, .. } => name.clone(),
        }
    }

    /// Palette category. An empty category hides the node from listings.
    pub fn category(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root
            | NodeKind::Integer(_)
            | NodeKind::Boolean(_)
            | NodeKind::Variable(_) => "Basic",
            NodeKind::Binary(_) | NodeKind::Unary(_) => "Operators",
            NodeKind::Call { .. } => "Your Program",
        }
    }

    // -----------------------------------------------------------------------
    // Argument slots
    // -----------------------------------------------------------------------

    /// Returns the number of argument slots.
    pub fn num_arguments(&self) -> usize {
        self.slots.len()
    }

    /// Returns the name of slot `index`. Panics if out of range.
    pub fn argument_name(&self, index: usize) -> &str {
        &self.slots[index].name
    }

    /// Returns whether slot `index` is a pattern slot. Panics if out of range.
    pub fn argument_is_pattern(&self, index: usize) -> bool {
        self.slots[index].is_pattern
    }

    /// Finds a slot by name.
    pub fn argument_index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }

    /// Returns the slot list.
    pub fn arguments(&self) -> &[ArgSlot] {
        &self.slots
    }

    /// Appends one slot. Duplicate names are a core bug, not a user error.
    pub(crate) fn register_argument(&mut self, name: impl Into<String>, is_pattern: bool) {
        let name = name.into();
        assert!(
            self.argument_index_of(&name).is_none(),
            "duplicate argument name registered: '{}'",
            name
        );
        self.slots.push(ArgSlot { name, is_pattern });
    }

    /// Rebuilds a root node's slots for the owning function's arity:
    /// `ReturnValue`, `Guard`, then one `ArgPatternN` pattern slot per
    /// function argument. The owning function preserves connector edges
    /// whose slot index is still in range.
    pub(crate) fn rebuild_root_slots(&mut self, arity: usize) {
        debug_assert!(self.is_root());
        self.slots.clear();
        self.register_argument("ReturnValue", false);
        self.register_argument("Guard", false);
        for i in 0..arity {
            self.register_argument(format!("ArgPattern{}", i), true);
        }
    }

    /// Rebuilds a call node's slots as `Arg1..ArgN` for the target's arity.
    /// The owning function drops all of this node's connector edges when the
    /// count changes; no positional remap is attempted, unlike roots.
    pub(crate) fn rebuild_call_slots(&mut self, arity: usize) {
        debug_assert!(self.is_call());
        self.slots.clear();
        for i in 0..arity {
            self.register_argument(format!("Arg{}", i + 1), false);
        }
    }

    // -----------------------------------------------------------------------
    // Value editing (UI-driven)
    // -----------------------------------------------------------------------

    /// Updates an integer term's value. No-op for other variants.
    pub fn set_integer_value(&mut self, value: i64) {
        if let NodeKind::Integer(current) = &mut self.kind {
            *current = value;
        }
    }

    /// Updates a boolean term's value. No-op for other variants.
    pub fn set_boolean_value(&mut self, value: bool) {
        if let NodeKind::Boolean(current) = &mut self.kind {
            *current = value;
        }
    }

    /// Updates a variable's name. No-op for other variants.
    pub fn set_variable_name(&mut self, name: impl Into<String>) {
        if let NodeKind::Variable(current) = &mut self.kind {
            *current = name.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_starts_with_return_and_guard() {
        let root = Node::root();
        assert_eq!(root.num_arguments(), 2);
        assert_eq!(root.argument_name(ROOT_RETURN_SLOT), "ReturnValue");
        assert_eq!(root.argument_name(ROOT_GUARD_SLOT), "Guard");
        assert!(!root.argument_is_pattern(ROOT_RETURN_SLOT));
    }

    #[test]
    fn root_slots_follow_arity() {
        let mut root = Node::root();
        root.rebuild_root_slots(3);
        assert_eq!(root.num_arguments(), 5);
        assert_eq!(root.argument_name(ROOT_FIRST_PATTERN_SLOT), "ArgPattern0");
        assert_eq!(root.argument_name(ROOT_FIRST_PATTERN_SLOT + 2), "ArgPattern2");
        assert!(root.argument_is_pattern(ROOT_FIRST_PATTERN_SLOT + 2));

        root.rebuild_root_slots(1);
        assert_eq!(root.num_arguments(), 3);
        assert_eq!(root.argument_index_of("ArgPattern1"), None);
    }

    #[test]
    fn call_slots_are_one_based() {
        let node = Node::call(FunctionId(4), "frobnicate", 3);
        assert_eq!(node.num_arguments(), 3);
        assert_eq!(node.argument_name(0), "Arg1");
        assert_eq!(node.argument_name(2), "Arg3");
        assert_eq!(node.display_name(), "frobnicate");
        assert_eq!(node.category(), "Your Program");
    }

    #[test]
    fn binary_has_two_slots() {
        let node = Node::binary(BinaryOp::Add);
        assert_eq!(node.num_arguments(), 2);
        assert_eq!(node.argument_index_of("RightHandSide"), Some(BINARY_RHS_SLOT));
        assert_eq!(node.display_name(), "Add");
        assert_eq!(node.category(), "Operators");
    }

    #[test]
    fn display_names_embed_values() {
        assert_eq!(Node::integer(42).display_name(), "Integer (42)");
        assert_eq!(Node::boolean(false).display_name(), "Boolean (false)");
        assert_eq!(Node::variable("X").display_name(), "Variable (X)");
    }

    #[test]
    fn value_editing() {
        let mut node = Node::integer(0);
        node.set_integer_value(-7);
        assert_eq!(node.kind(), &NodeKind::Integer(-7));

        let mut var = Node::variable("i");
        var.set_variable_name("Count");
        assert_eq!(var.display_name(), "Variable (Count)");

        // Editing the wrong variant is a no-op.
        node.set_variable_name("X");
        assert_eq!(node.kind(), &NodeKind::Integer(-7));
    }

    #[test]
    #[should_panic(expected = "duplicate argument name")]
    fn duplicate_argument_name_panics() {
        let mut node = Node::binary(BinaryOp::Add);
        node.register_argument("LeftHandSide", false);
    }

    #[test]
    fn serde_roundtrip() {
        let node = Node::call(FunctionId(2), "helper", 2);
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
