//! The module: a registry of uniquely-named functions.
//!
//! All cross-function mutations (create, remove, rename, arity change) go
//! through `Module` methods so the name lookup stays consistent and call
//! nodes everywhere get re-synced. The broadcast works against a snapshot
//! of the module's shape taken up front, so functions can be mutated one by
//! one without aliasing the module mid-walk.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::function::Function;
use crate::id::FunctionId;

/// Shape of one function, as seen by the module-changed broadcast.
#[derive(Debug, Clone)]
pub(crate) struct FunctionInfo {
    pub name: String,
    pub arity: usize,
}

/// A module: an ordered collection of functions with unique names.
///
/// The list order is meaningful -- it is the "function list position" that
/// negative catalogue IDs address, and the order in which generated code is
/// concatenated.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    functions: Vec<Function>,
    lookup: HashMap<String, usize>,
    next_function_id: u32,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            functions: Vec::new(),
            lookup: HashMap::new(),
            next_function_id: 0,
        }
    }

    /// The module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -----------------------------------------------------------------------
    // Function registry
    // -----------------------------------------------------------------------

    /// Returns the existing function with this name, or creates, stores and
    /// indexes a new one. Creation notifies every function's nodes that the
    /// module changed.
    pub fn get_or_create(&mut self, name: &str, arity: usize) -> FunctionId {
        if let Some(&index) = self.lookup.get(name) {
            return self.functions[index].id();
        }

        let id = FunctionId(self.next_function_id);
        self.next_function_id += 1;

        self.functions.push(Function::new(id, name, arity));
        self.lookup.insert(name.to_string(), self.functions.len() - 1);
        self.broadcast_module_changed();

        id
    }

    /// Creates a zero-arity function under a fresh name: `function1`,
    /// `function2`, ... -- the first not already taken.
    pub fn create_unique(&mut self) -> FunctionId {
        let mut n = 1usize;
        loop {
            let candidate = format!("function{}", n);
            if !self.lookup.contains_key(&candidate) {
                return self.get_or_create(&candidate, 0);
            }
            n += 1;
        }
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.lookup.get(name).map(|&index| &self.functions[index])
    }

    /// Looks up a function by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Function> {
        let index = *self.lookup.get(name)?;
        Some(&mut self.functions[index])
    }

    /// Looks up a function by its stable ID. `None` means the function was
    /// removed -- the "expired weak reference" signal call nodes rely on.
    pub fn by_id(&self, id: FunctionId) -> Option<&Function> {
        self.functions.iter().find(|f| f.id() == id)
    }

    /// Looks up a function by its stable ID, mutably.
    pub fn by_id_mut(&mut self, id: FunctionId) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.id() == id)
    }

    /// The full function list, in creation order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Number of functions in the module.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Returns a function's position in the list, the basis for its
    /// negative catalogue ID.
    pub fn position_of_function(&self, id: FunctionId) -> Option<usize> {
        self.functions.iter().position(|f| f.id() == id)
    }

    // -----------------------------------------------------------------------
    // Structural mutation
    // -----------------------------------------------------------------------

    /// Removes a function. Every remaining function's call nodes re-sync;
    /// ones that targeted the removed function remove themselves.
    pub fn remove(&mut self, name: &str) -> Result<(), CoreError> {
        let index = *self
            .lookup
            .get(name)
            .ok_or_else(|| CoreError::FunctionNotFound {
                name: name.to_string(),
            })?;

        self.functions.remove(index);
        self.rebuild_lookup();
        self.broadcast_module_changed();

        Ok(())
    }

    /// Renames a function. Rejected if another function already holds the
    /// new name; renaming to the current name is a no-op success. Call
    /// nodes targeting the function refresh their displayed name.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), CoreError> {
        if old == new {
            return Ok(());
        }
        if self.lookup.contains_key(new) {
            return Err(CoreError::DuplicateFunctionName {
                name: new.to_string(),
            });
        }
        let index = *self
            .lookup
            .get(old)
            .ok_or_else(|| CoreError::FunctionNotFound {
                name: old.to_string(),
            })?;

        self.functions[index].set_name(new.to_string());
        self.rebuild_lookup();
        self.broadcast_module_changed();

        Ok(())
    }

    /// Changes a function's arity. The function's own nodes replay the
    /// function-changed lifecycle (roots reshape their pattern slots), then
    /// the whole module is notified so call nodes everywhere re-sync their
    /// slot counts.
    pub fn set_arity(&mut self, name: &str, arity: usize) -> Result<(), CoreError> {
        let index = *self
            .lookup
            .get(name)
            .ok_or_else(|| CoreError::FunctionNotFound {
                name: name.to_string(),
            })?;

        self.functions[index].set_arity_internal(arity);
        self.broadcast_module_changed();

        Ok(())
    }

    /// Recomputes the name lookup from the function list.
    fn rebuild_lookup(&mut self) {
        self.lookup = self
            .functions
            .iter()
            .enumerate()
            .map(|(index, f)| (f.name().to_string(), index))
            .collect();
    }

    fn broadcast_module_changed(&mut self) {
        let snapshot: HashMap<FunctionId, FunctionInfo> = self
            .functions
            .iter()
            .map(|f| {
                (
                    f.id(),
                    FunctionInfo {
                        name: f.name().to_string(),
                        arity: f.arity(),
                    },
                )
            })
            .collect();

        for function in &mut self.functions {
            function.sync_module(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind};
    use crate::pos::GridPos;

    #[test]
    fn get_or_create_is_idempotent() {
        let mut module = Module::new("scratch");
        let first = module.get_or_create("add", 2);
        let second = module.get_or_create("add", 2);
        assert_eq!(first, second);
        assert_eq!(module.function_count(), 1);
        assert_eq!(module.get("add").unwrap().arity(), 2);
    }

    #[test]
    fn create_unique_walks_the_name_series() {
        let mut module = Module::new("scratch");
        let a = module.create_unique();
        module.get_or_create("function2", 1);
        let b = module.create_unique();

        assert_eq!(module.by_id(a).unwrap().name(), "function1");
        // function2 was taken, so the next free suffix is used.
        assert_eq!(module.by_id(b).unwrap().name(), "function3");
        assert_eq!(module.by_id(b).unwrap().arity(), 0);
    }

    #[test]
    fn rename_rejects_taken_names() {
        let mut module = Module::new("scratch");
        module.get_or_create("add", 2);
        module.get_or_create("sub", 2);

        let err = module.rename("add", "sub").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateFunctionName { .. }));
        assert!(module.get("add").is_some());

        module.rename("add", "add").unwrap();
        module.rename("add", "plus").unwrap();
        assert!(module.get("add").is_none());
        assert_eq!(module.get("plus").unwrap().arity(), 2);
    }

    #[test]
    fn rename_refreshes_call_node_names() {
        let mut module = Module::new("scratch");
        let helper = module.get_or_create("helper", 1);
        module.get_or_create("main", 0);

        let call = Node::call(helper, "helper", 1);
        let call_id = module
            .get_mut("main")
            .unwrap()
            .place(call, GridPos::new(0, 0))
            .unwrap();

        module.rename("helper", "assist").unwrap();
        let node = module.get("main").unwrap().node(call_id).unwrap();
        assert_eq!(node.display_name(), "assist");
    }

    #[test]
    fn remove_triggers_call_node_self_destruct() {
        let mut module = Module::new("scratch");
        let helper = module.get_or_create("helper", 1);
        module.get_or_create("main", 0);

        let call = Node::call(helper, "helper", 1);
        let call_id = module
            .get_mut("main")
            .unwrap()
            .place(call, GridPos::new(3, 3))
            .unwrap();

        module.remove("helper").unwrap();

        let main = module.get("main").unwrap();
        assert!(main.node(call_id).is_none());
        assert_eq!(main.node_at(GridPos::new(3, 3)), None);
        assert_eq!(main.nodes_on_grid().count(), 0);
    }

    #[test]
    fn set_arity_resyncs_call_nodes_and_discards_their_wiring() {
        let mut module = Module::new("scratch");
        let helper = module.get_or_create("helper", 1);
        module.get_or_create("main", 0);

        let main = module.get_mut("main").unwrap();
        let call_id = main
            .place(Node::call(helper, "helper", 1), GridPos::new(0, 0))
            .unwrap();
        let arg = main.place(Node::integer(9), GridPos::new(1, 0)).unwrap();
        main.connect(arg, call_id, 0).unwrap();

        module.set_arity("helper", 3).unwrap();

        let main = module.get("main").unwrap();
        let node = main.node(call_id).unwrap();
        assert_eq!(node.num_arguments(), 3);
        assert_eq!(node.argument_name(2), "Arg3");
        // Wiring is deliberately discarded on call-node reshape.
        assert_eq!(main.connector(call_id, 0), None);
    }

    #[test]
    fn set_arity_with_unchanged_slot_count_keeps_wiring() {
        let mut module = Module::new("scratch");
        let helper = module.get_or_create("helper", 2);
        module.get_or_create("main", 0);

        let main = module.get_mut("main").unwrap();
        let call_id = main
            .place(Node::call(helper, "helper", 2), GridPos::new(0, 0))
            .unwrap();
        let arg = main.place(Node::integer(9), GridPos::new(1, 0)).unwrap();
        main.connect(arg, call_id, 1).unwrap();

        // Arity "changes" to the value it already has: no reshape, no loss.
        module.set_arity("helper", 2).unwrap();
        assert_eq!(module.get("main").unwrap().connector(call_id, 1), Some(arg));
    }

    #[test]
    fn lookup_survives_removal_of_earlier_function() {
        let mut module = Module::new("scratch");
        module.get_or_create("a", 0);
        module.get_or_create("b", 0);
        module.get_or_create("c", 0);

        module.remove("a").unwrap();
        assert!(module.get("b").is_some());
        assert!(module.get("c").is_some());
        assert_eq!(module.position_of_function(module.get("c").unwrap().id()), Some(1));
    }

    #[test]
    fn by_id_expires_after_removal() {
        let mut module = Module::new("scratch");
        let id = module.get_or_create("gone", 0);
        module.remove("gone").unwrap();
        assert!(module.by_id(id).is_none());

        // IDs are never reused, so a stale handle stays expired.
        let other = module.get_or_create("new", 0);
        assert_ne!(id, other);
    }

    #[test]
    fn call_node_kind_tracks_target_id() {
        let mut module = Module::new("scratch");
        let helper = module.get_or_create("helper", 0);
        let node = Node::call(helper, "helper", 0);
        match node.kind() {
            NodeKind::Call { target, .. } => assert_eq!(*target, helper),
            other => panic!("expected a call node, got {:?}", other),
        }
    }
}
