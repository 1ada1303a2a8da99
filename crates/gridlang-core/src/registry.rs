//! The node catalogue: built-in prototypes plus synthesized call nodes.
//!
//! Built-ins get sequential non-negative [`CatalogId`]s from one explicit
//! registration table built at startup -- no static-initialization side
//! effects, no registration order hazards. Call nodes ("call this other
//! function") are synthesized on demand, one per module function, addressed
//! by negative IDs derived from the function's list position; nothing about
//! them is cached, so the view stays correct as functions are added,
//! removed and reordered.

use indexmap::IndexMap;

use crate::id::CatalogId;
use crate::module::Module;
use crate::node::Node;
use crate::ops::{BinaryOp, UnaryOp};

/// Catalogue ID of the root node prototype. Reserved as the first entry so
/// every node a file could mention has a well-known ID.
pub const ROOT_CATALOG_ID: CatalogId = CatalogId(0);

/// The process-wide catalogue of node prototypes.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    prototypes: Vec<Node>,
}

impl NodeRegistry {
    /// Builds the fixed prototype table: root, terms, variable, then the
    /// operator battery, all in stable registration order.
    pub fn new() -> Self {
        let mut prototypes = vec![
            Node::root(),
            Node::integer(0),
            Node::boolean(false),
            Node::variable("i"),
        ];
        for op in BinaryOp::ALL {
            prototypes.push(Node::binary(op));
        }
        for op in UnaryOp::ALL {
            prototypes.push(Node::unary(op));
        }

        NodeRegistry { prototypes }
    }

    /// Number of built-in prototypes.
    pub fn builtin_count(&self) -> usize {
        self.prototypes.len()
    }

    /// Iterates the built-in prototypes with their IDs.
    pub fn builtins(&self) -> impl Iterator<Item = (CatalogId, &Node)> + '_ {
        self.prototypes
            .iter()
            .enumerate()
            .map(|(index, node)| (CatalogId(index as i32), node))
    }

    /// The negative catalogue ID addressing the call node for the function
    /// at `position` in the module's function list.
    pub fn user_call_id(position: usize) -> CatalogId {
        CatalogId(-(position as i32) - 1)
    }

    /// Creates a fresh node for a catalogue ID.
    ///
    /// Non-negative IDs clone the matching built-in prototype; negative IDs
    /// synthesize a call node for the module function at position
    /// `-id - 1`, with one argument slot per target argument. Returns
    /// `None` for IDs that address nothing.
    pub fn create(&self, id: CatalogId, module: &Module) -> Option<Node> {
        if id.0 >= 0 {
            return self.prototypes.get(id.0 as usize).cloned();
        }

        let position = (-id.0 - 1) as usize;
        let function = module.functions().get(position)?;
        Some(Node::call(function.id(), function.name(), function.arity()))
    }

    /// Every creatable node: built-ins first, then one call node per
    /// current module function.
    pub fn all(&self, module: &Module) -> Vec<(CatalogId, Node)> {
        let mut out: Vec<(CatalogId, Node)> = self
            .builtins()
            .map(|(id, node)| (id, node.clone()))
            .collect();

        for (position, function) in module.functions().iter().enumerate() {
            out.push((
                Self::user_call_id(position),
                Node::call(function.id(), function.name(), function.arity()),
            ));
        }

        out
    }

    /// Groups [`all`](Self::all) by category for a palette, preserving
    /// first-seen category order and omitting nodes with an empty category.
    pub fn categorized(&self, module: &Module) -> IndexMap<String, Vec<(CatalogId, Node)>> {
        let mut out: IndexMap<String, Vec<(CatalogId, Node)>> = IndexMap::new();

        for (id, node) in self.all(module) {
            let category = node.category();
            if category.is_empty() {
                continue;
            }
            out.entry(category.to_string()).or_default().push((id, node));
        }

        out
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn root_is_id_zero() {
        let registry = NodeRegistry::new();
        let module = Module::new("scratch");
        let node = registry.create(ROOT_CATALOG_ID, &module).unwrap();
        assert!(node.is_root());
    }

    #[test]
    fn builtin_table_is_stable() {
        let registry = NodeRegistry::new();
        // root + integer + boolean + variable + 18 binary + 2 unary
        assert_eq!(registry.builtin_count(), 24);

        let names: Vec<String> = registry
            .builtins()
            .take(5)
            .map(|(_, node)| node.display_name())
            .collect();
        assert_eq!(
            names,
            vec!["Root", "Integer (0)", "Boolean (false)", "Variable (i)", "Add"]
        );
    }

    #[test]
    fn unknown_ids_create_nothing() {
        let registry = NodeRegistry::new();
        let module = Module::new("scratch");
        assert!(registry.create(CatalogId(999), &module).is_none());
        assert!(registry.create(CatalogId(-1), &module).is_none());
    }

    #[test]
    fn negative_ids_synthesize_call_nodes() {
        let registry = NodeRegistry::new();
        let mut module = Module::new("scratch");
        let first = module.get_or_create("first", 2);
        module.get_or_create("second", 0);

        let node = registry.create(CatalogId(-1), &module).unwrap();
        assert_eq!(node.display_name(), "first");
        assert_eq!(node.num_arguments(), 2);
        match node.kind() {
            NodeKind::Call { target, .. } => assert_eq!(*target, first),
            other => panic!("expected a call node, got {:?}", other),
        }

        let node = registry.create(CatalogId(-2), &module).unwrap();
        assert_eq!(node.display_name(), "second");
        assert_eq!(node.num_arguments(), 0);
    }

    #[test]
    fn user_call_id_is_the_inverse_mapping() {
        assert_eq!(NodeRegistry::user_call_id(0), CatalogId(-1));
        assert_eq!(NodeRegistry::user_call_id(4), CatalogId(-5));
    }

    #[test]
    fn call_ids_track_list_positions_after_removal() {
        let registry = NodeRegistry::new();
        let mut module = Module::new("scratch");
        module.get_or_create("a", 0);
        module.get_or_create("b", 1);
        module.remove("a").unwrap();

        // Nothing is cached: -1 now addresses what moved into position 0.
        let node = registry.create(CatalogId(-1), &module).unwrap();
        assert_eq!(node.display_name(), "b");
        assert!(registry.create(CatalogId(-2), &module).is_none());
    }

    #[test]
    fn all_appends_one_call_node_per_function() {
        let registry = NodeRegistry::new();
        let mut module = Module::new("scratch");
        module.get_or_create("f", 0);
        module.get_or_create("g", 3);

        let all = registry.all(&module);
        assert_eq!(all.len(), registry.builtin_count() + 2);
        assert_eq!(all[all.len() - 1].0, CatalogId(-2));
        assert_eq!(all[all.len() - 1].1.display_name(), "g");
    }

    #[test]
    fn categorized_preserves_first_seen_order() {
        let registry = NodeRegistry::new();
        let mut module = Module::new("scratch");
        module.get_or_create("f", 0);

        let grouped = registry.categorized(&module);
        let categories: Vec<&String> = grouped.keys().collect();
        assert_eq!(categories, vec!["Basic", "Operators", "Your Program"]);
        assert_eq!(grouped["Basic"].len(), 4);
        assert_eq!(grouped["Operators"].len(), 20);
        assert_eq!(grouped["Your Program"].len(), 1);
    }
}
