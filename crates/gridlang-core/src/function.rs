//! A function: nodes placed on an integer grid, wired by connector edges.
//!
//! Nodes live in a `StableGraph` arena, so a [`NodeId`] stays valid until
//! that node is removed regardless of what happens to its neighbours (the
//! stable-handle alternative to renumbering dense indices). Connectors are
//! directed edges producer -> consumer weighted with the consumer's slot
//! index; removing a node removes its edges with it, which is how a
//! consumer observes "my input disappeared" without weak references.
//!
//! Two lookup maps index the grid: position -> node and node -> position.
//! They are exact inverses of each other after every mutation, and at most
//! one node occupies a cell at any time.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{FunctionId, NodeId};
use crate::module::FunctionInfo;
use crate::node::{Node, NodeKind};
use crate::pos::GridPos;

/// Connector edge weight: which argument slot of the consumer this edge
/// feeds. At most one edge exists per (consumer, slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub slot: u16,
}

/// A function within the user's program.
#[derive(Debug, Clone)]
pub struct Function {
    id: FunctionId,
    name: String,
    arity: usize,
    graph: StableGraph<Node, Connector, Directed, u32>,
    position_to_node: HashMap<GridPos, NodeId>,
    node_to_position: HashMap<NodeId, GridPos>,
}

impl Function {
    pub(crate) fn new(id: FunctionId, name: impl Into<String>, arity: usize) -> Self {
        Function {
            id,
            name: name.into(),
            arity,
            graph: StableGraph::new(),
            position_to_node: HashMap::new(),
            node_to_position: HashMap::new(),
        }
    }

    /// Stable identity of this function within its module.
    pub fn id(&self) -> FunctionId {
        self.id
    }

    /// The function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The function's arity (argument count).
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    // -----------------------------------------------------------------------
    // Placement & lookup
    // -----------------------------------------------------------------------

    /// Places a new node at a grid position and returns its handle.
    ///
    /// Fails with [`CoreError::CellOccupied`] and no side effects if the
    /// cell already holds a node. Placement fires the function-changed
    /// lifecycle, which gives root nodes their per-argument pattern slots.
    pub fn place(&mut self, node: Node, position: GridPos) -> Result<NodeId, CoreError> {
        if self.position_to_node.contains_key(&position) {
            return Err(CoreError::CellOccupied { position });
        }

        let id = NodeId::from(self.graph.add_node(node));
        self.position_to_node.insert(position, id);
        self.node_to_position.insert(id, position);

        self.apply_function_changed(id);

        Ok(id)
    }

    /// Moves an already-placed node to another cell.
    ///
    /// Moving onto its own current cell is a no-op success. Moving onto a
    /// cell held by a different node fails without side effects. Wiring is
    /// untouched either way.
    pub fn move_node(&mut self, id: NodeId, position: GridPos) -> Result<(), CoreError> {
        let current = self
            .node_to_position
            .get(&id)
            .copied()
            .ok_or(CoreError::NodeNotFound { id })?;

        if current == position {
            return Ok(());
        }
        if self.position_to_node.contains_key(&position) {
            return Err(CoreError::CellOccupied { position });
        }

        self.position_to_node.remove(&current);
        self.position_to_node.insert(position, id);
        self.node_to_position.insert(id, position);

        Ok(())
    }

    /// Returns the node occupying a cell, if any.
    pub fn node_at(&self, position: GridPos) -> Option<NodeId> {
        self.position_to_node.get(&position).copied()
    }

    /// Looks up a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node_weight(id.into())
    }

    /// Looks up a node by handle, mutably (e.g. to edit a term's value).
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.graph.node_weight_mut(id.into())
    }

    /// Returns a node's grid position.
    pub fn position_of(&self, id: NodeId) -> Option<GridPos> {
        self.node_to_position.get(&id).copied()
    }

    /// Removes a node from the grid, along with all its connector edges.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, CoreError> {
        let idx: NodeIndex<u32> = id.into();
        let node = self
            .graph
            .remove_node(idx)
            .ok_or(CoreError::NodeNotFound { id })?;

        if let Some(position) = self.node_to_position.remove(&id) {
            self.position_to_node.remove(&position);
        }

        Ok(node)
    }

    /// Iterates every placed node with its position, for drawing.
    pub fn nodes_on_grid(&self) -> impl Iterator<Item = (NodeId, GridPos, &Node)> + '_ {
        self.graph.node_indices().filter_map(move |idx| {
            let id = NodeId::from(idx);
            let position = *self.node_to_position.get(&id)?;
            Some((id, position, &self.graph[idx]))
        })
    }

    /// Returns the handles of all root nodes, in arbitrary order.
    pub fn root_nodes(&self) -> Vec<NodeId> {
        self.nodes_of_kind(Node::is_root)
    }

    /// Returns the handles of nodes matching a predicate.
    pub fn nodes_of_kind(&self, predicate: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&idx| predicate(&self.graph[idx]))
            .map(NodeId::from)
            .collect()
    }

    /// Number of nodes on the grid.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    // -----------------------------------------------------------------------
    // Wiring
    // -----------------------------------------------------------------------

    /// Wires `producer`'s value into `consumer`'s argument slot, replacing
    /// whatever was previously connected there.
    ///
    /// Panics if `slot` is out of range for the consumer -- that is a core
    /// bug, not a user-graph problem.
    pub fn connect(
        &mut self,
        producer: NodeId,
        consumer: NodeId,
        slot: usize,
    ) -> Result<(), CoreError> {
        let producer_idx: NodeIndex<u32> = producer.into();
        let consumer_idx: NodeIndex<u32> = consumer.into();

        if !self.graph.contains_node(producer_idx) {
            return Err(CoreError::NodeNotFound { id: producer });
        }
        let num_args = self
            .graph
            .node_weight(consumer_idx)
            .ok_or(CoreError::NodeNotFound { id: consumer })?
            .num_arguments();
        assert!(
            slot < num_args,
            "argument slot {} out of range for node with {} slots",
            slot,
            num_args
        );

        self.remove_slot_edge(consumer_idx, slot);
        self.graph
            .add_edge(producer_idx, consumer_idx, Connector { slot: slot as u16 });

        Ok(())
    }

    /// Clears `consumer`'s argument slot, if anything is connected.
    pub fn disconnect(&mut self, consumer: NodeId, slot: usize) {
        let idx: NodeIndex<u32> = consumer.into();
        if self.graph.contains_node(idx) {
            self.remove_slot_edge(idx, slot);
        }
    }

    /// Resolves the producer connected to `consumer`'s argument slot.
    /// Returns `None` when nothing is connected (including after the
    /// producer was removed from the grid).
    pub fn connector(&self, consumer: NodeId, slot: usize) -> Option<NodeId> {
        let idx: NodeIndex<u32> = consumer.into();
        if !self.graph.contains_node(idx) {
            return None;
        }
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .find(|edge| edge.weight().slot as usize == slot)
            .map(|edge| NodeId::from(edge.source()))
    }

    fn remove_slot_edge(&mut self, consumer: NodeIndex<u32>, slot: usize) {
        let existing: Option<EdgeIndex<u32>> = self
            .graph
            .edges_directed(consumer, Direction::Incoming)
            .find(|edge| edge.weight().slot as usize == slot)
            .map(|edge| edge.id());
        if let Some(edge) = existing {
            self.graph.remove_edge(edge);
        }
    }

    fn disconnect_all_inputs(&mut self, consumer: NodeIndex<u32>) {
        let incoming: Vec<EdgeIndex<u32>> = self
            .graph
            .edges_directed(consumer, Direction::Incoming)
            .map(|edge| edge.id())
            .collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Updates the arity and replays the function-changed lifecycle on every
    /// owned node. Roots rebuild their slot lists, keeping connector edges
    /// whose slot index is still in range. The module-wide broadcast that
    /// lets call nodes in other functions react is driven by
    /// [`Module::set_arity`](crate::module::Module::set_arity).
    pub(crate) fn set_arity_internal(&mut self, new_arity: usize) {
        self.arity = new_arity;
        let ids: Vec<NodeId> = self.graph.node_indices().map(NodeId::from).collect();
        for id in ids {
            self.apply_function_changed(id);
        }
    }

    /// Re-syncs every call node against the current module shape.
    ///
    /// A call node whose target vanished removes itself from the grid. One
    /// whose target was renamed refreshes its cached display name. One
    /// whose slot count no longer matches the target's arity re-registers
    /// its slots as `Arg1..ArgN` and drops all of its input wiring.
    pub(crate) fn sync_module(&mut self, functions: &HashMap<FunctionId, FunctionInfo>) {
        let ids: Vec<NodeId> = self.graph.node_indices().map(NodeId::from).collect();
        for id in ids {
            let idx: NodeIndex<u32> = id.into();
            let target = match self.graph.node_weight(idx) {
                Some(node) => match node.kind() {
                    NodeKind::Call { target, .. } => *target,
                    _ => continue,
                },
                None => continue,
            };

            match functions.get(&target) {
                None => {
                    // Self-destruct: the target function was removed.
                    let _ = self.remove_node(id);
                }
                Some(info) => {
                    let rebuild = self
                        .graph
                        .node_weight(idx)
                        .map(|node| node.num_arguments() != info.arity)
                        .unwrap_or(false);

                    if let Some(node) = self.graph.node_weight_mut(idx) {
                        if let NodeKind::Call { name, .. } = &mut node.kind {
                            if *name != info.name {
                                *name = info.name.clone();
                            }
                        }
                        if rebuild {
                            node.rebuild_call_slots(info.arity);
                        }
                    }
                    if rebuild {
                        self.disconnect_all_inputs(idx);
                    }
                }
            }
        }
    }

    fn apply_function_changed(&mut self, id: NodeId) {
        let idx: NodeIndex<u32> = id.into();
        let is_root = match self.graph.node_weight(idx) {
            Some(node) => node.is_root(),
            None => return,
        };
        if !is_root {
            return;
        }

        let arity = self.arity;
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.rebuild_root_slots(arity);
        }
        self.prune_out_of_range_connectors(idx);
    }

    fn prune_out_of_range_connectors(&mut self, consumer: NodeIndex<u32>) {
        let num_args = match self.graph.node_weight(consumer) {
            Some(node) => node.num_arguments(),
            None => return,
        };
        let stale: Vec<EdgeIndex<u32>> = self
            .graph
            .edges_directed(consumer, Direction::Incoming)
            .filter(|edge| edge.weight().slot as usize >= num_args)
            .map(|edge| edge.id())
            .collect();
        for edge in stale {
            self.graph.remove_edge(edge);
        }
    }
}
