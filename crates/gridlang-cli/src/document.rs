//! JSON graph documents: a declarative description of a module that the
//! CLI turns into a live core [`Module`].
//!
//! The document names nodes with string labels and wires them by label;
//! building resolves labels to grid handles. All functions are created
//! before any node is placed, so call nodes can target functions declared
//! later in the file.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use gridlang_core::{BinaryOp, CoreError, GridPos, Module, Node, NodeId, UnaryOp};

/// Top-level document: one module.
#[derive(Debug, Deserialize)]
pub struct ModuleDoc {
    #[serde(default = "default_module_name")]
    pub name: String,
    pub functions: Vec<FunctionDoc>,
}

fn default_module_name() -> String {
    "untitled".to_string()
}

/// One function: signature plus its grid contents.
#[derive(Debug, Deserialize)]
pub struct FunctionDoc {
    pub name: String,
    #[serde(default)]
    pub arity: usize,
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub connections: Vec<ConnectionDoc>,
}

/// One node: a document-local label, a grid cell, and its kind.
#[derive(Debug, Deserialize)]
pub struct NodeDoc {
    pub id: String,
    pub position: [i32; 2],
    #[serde(flatten)]
    pub kind: NodeKindDoc,
}

/// Node kind tags, mirroring the catalogue.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKindDoc {
    Root,
    Integer { value: i64 },
    Boolean { value: bool },
    Variable { name: String },
    Binary { op: String },
    Unary { op: String },
    Call { function: String },
}

/// One connector: producer label -> consumer label at an argument slot.
#[derive(Debug, Deserialize)]
pub struct ConnectionDoc {
    pub from: String,
    pub to: String,
    pub slot: usize,
}

/// Ways a well-formed JSON document can still fail to describe a module.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("duplicate node id '{id}' in function '{function}'")]
    DuplicateNodeId { function: String, id: String },

    #[error("unknown node id '{id}' in function '{function}'")]
    UnknownNodeId { function: String, id: String },

    #[error("unknown operator '{op}'")]
    UnknownOperator { op: String },

    #[error("unknown function '{name}' referenced by a call node")]
    UnknownFunction { name: String },

    #[error("connection into '{id}' slot {slot} is out of range ({slots} slots)")]
    SlotOutOfRange {
        id: String,
        slot: usize,
        slots: usize,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Builds a live module from a parsed document.
pub fn build_module(doc: &ModuleDoc) -> Result<Module, DocumentError> {
    let mut module = Module::new(doc.name.clone());

    // Pass 1: register every function so call targets resolve regardless
    // of declaration order.
    for function in &doc.functions {
        module.get_or_create(&function.name, function.arity);
    }

    // Pass 2: place nodes and wire connections.
    for function_doc in &doc.functions {
        let mut labels: HashMap<&str, NodeId> = HashMap::new();

        for node_doc in &function_doc.nodes {
            if labels.contains_key(node_doc.id.as_str()) {
                return Err(DocumentError::DuplicateNodeId {
                    function: function_doc.name.clone(),
                    id: node_doc.id.clone(),
                });
            }

            let node = build_node(&module, &node_doc.kind)?;
            let function = module
                .get_mut(&function_doc.name)
                .ok_or_else(|| DocumentError::UnknownFunction {
                    name: function_doc.name.clone(),
                })?;
            let position = GridPos::new(node_doc.position[0], node_doc.position[1]);
            let id = function.place(node, position)?;
            labels.insert(&node_doc.id, id);
        }

        let function = module
            .get_mut(&function_doc.name)
            .ok_or_else(|| DocumentError::UnknownFunction {
                name: function_doc.name.clone(),
            })?;

        for connection in &function_doc.connections {
            let from = resolve(&labels, &function_doc.name, &connection.from)?;
            let to = resolve(&labels, &function_doc.name, &connection.to)?;

            // `connect` treats an out-of-range slot as a core bug; a typo
            // in a document is a user error, so bound-check here.
            let slots = function.node(to).map(Node::num_arguments).unwrap_or(0);
            if connection.slot >= slots {
                return Err(DocumentError::SlotOutOfRange {
                    id: connection.to.clone(),
                    slot: connection.slot,
                    slots,
                });
            }

            function.connect(from, to, connection.slot)?;
        }
    }

    Ok(module)
}

fn resolve(
    labels: &HashMap<&str, NodeId>,
    function: &str,
    label: &str,
) -> Result<NodeId, DocumentError> {
    labels
        .get(label)
        .copied()
        .ok_or_else(|| DocumentError::UnknownNodeId {
            function: function.to_string(),
            id: label.to_string(),
        })
}

fn build_node(module: &Module, kind: &NodeKindDoc) -> Result<Node, DocumentError> {
    Ok(match kind {
        NodeKindDoc::Root => Node::root(),
        NodeKindDoc::Integer { value } => Node::integer(*value),
        NodeKindDoc::Boolean { value } => Node::boolean(*value),
        NodeKindDoc::Variable { name } => Node::variable(name.clone()),
        NodeKindDoc::Binary { op } => Node::binary(parse_binary_op(op)?),
        NodeKindDoc::Unary { op } => Node::unary(parse_unary_op(op)?),
        NodeKindDoc::Call { function } => {
            let target = module
                .get(function)
                .ok_or_else(|| DocumentError::UnknownFunction {
                    name: function.clone(),
                })?;
            Node::call(target.id(), target.name(), target.arity())
        }
    })
}

fn parse_binary_op(op: &str) -> Result<BinaryOp, DocumentError> {
    let parsed = match op {
        "add" => BinaryOp::Add,
        "subtract" => BinaryOp::Subtract,
        "multiply" => BinaryOp::Multiply,
        "divide" => BinaryOp::Divide,
        "divide_rounded" => BinaryOp::DivideRounded,
        "remainder" => BinaryOp::Remainder,
        "equal" => BinaryOp::Equal,
        "not_equal" => BinaryOp::NotEqual,
        "greater" => BinaryOp::Greater,
        "greater_equal" => BinaryOp::GreaterEqual,
        "less" => BinaryOp::Less,
        "less_equal" => BinaryOp::LessEqual,
        "and" => BinaryOp::And,
        "or" => BinaryOp::Or,
        "xor" => BinaryOp::Xor,
        "bitwise_and" => BinaryOp::BitwiseAnd,
        "bitwise_or" => BinaryOp::BitwiseOr,
        "bitwise_xor" => BinaryOp::BitwiseXor,
        _ => {
            return Err(DocumentError::UnknownOperator { op: op.to_string() });
        }
    };
    Ok(parsed)
}

fn parse_unary_op(op: &str) -> Result<UnaryOp, DocumentError> {
    let parsed = match op {
        "not" => UnaryOp::Not,
        "bitwise_not" => UnaryOp::BitwiseNot,
        _ => {
            return Err(DocumentError::UnknownOperator { op: op.to_string() });
        }
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlang_codegen::emit_module;

    const ADD_DOC: &str = r#"{
        "name": "example",
        "functions": [
            {
                "name": "add",
                "arity": 2,
                "nodes": [
                    { "id": "root", "kind": "root", "position": [0, 0] },
                    { "id": "plus", "kind": "binary", "op": "add", "position": [1, 0] },
                    { "id": "x", "kind": "variable", "name": "X", "position": [2, 0] },
                    { "id": "y", "kind": "variable", "name": "Y", "position": [3, 0] }
                ],
                "connections": [
                    { "from": "x", "to": "root", "slot": 2 },
                    { "from": "y", "to": "root", "slot": 3 },
                    { "from": "x", "to": "plus", "slot": 0 },
                    { "from": "y", "to": "plus", "slot": 1 },
                    { "from": "plus", "to": "root", "slot": 0 }
                ]
            }
        ]
    }"#;

    #[test]
    fn add_document_compiles() {
        let doc: ModuleDoc = serde_json::from_str(ADD_DOC).unwrap();
        let module = build_module(&doc).unwrap();

        let output = emit_module(&module);
        assert!(output.success);
        assert_eq!(output.source, "add(X, Y) ->\n\t(X + Y).\n");
    }

    #[test]
    fn call_targets_resolve_forward() {
        let text = r#"{
            "functions": [
                {
                    "name": "main",
                    "nodes": [
                        { "id": "root", "kind": "root", "position": [0, 0] },
                        { "id": "call", "kind": "call", "function": "late", "position": [1, 0] }
                    ],
                    "connections": [
                        { "from": "call", "to": "root", "slot": 0 }
                    ]
                },
                { "name": "late", "arity": 0 }
            ]
        }"#;
        let doc: ModuleDoc = serde_json::from_str(text).unwrap();
        let module = build_module(&doc).unwrap();

        let output = emit_module(&module);
        assert_eq!(output.source, "main() ->\n\tlate().\n");
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let text = r#"{
            "functions": [
                {
                    "name": "f",
                    "nodes": [
                        { "id": "op", "kind": "binary", "op": "frobnicate", "position": [0, 0] }
                    ]
                }
            ]
        }"#;
        let doc: ModuleDoc = serde_json::from_str(text).unwrap();
        let err = build_module(&doc).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownOperator { .. }));
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let text = r#"{
            "functions": [
                {
                    "name": "f",
                    "nodes": [
                        { "id": "a", "kind": "integer", "value": 1, "position": [0, 0] },
                        { "id": "b", "kind": "integer", "value": 2, "position": [1, 0] }
                    ],
                    "connections": [
                        { "from": "a", "to": "b", "slot": 0 }
                    ]
                }
            ]
        }"#;
        let doc: ModuleDoc = serde_json::from_str(text).unwrap();
        let err = build_module(&doc).unwrap_err();
        assert!(matches!(err, DocumentError::SlotOutOfRange { .. }));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let text = r#"{
            "functions": [
                {
                    "name": "f",
                    "nodes": [
                        { "id": "a", "kind": "integer", "value": 1, "position": [0, 0] },
                        { "id": "a", "kind": "integer", "value": 2, "position": [1, 0] }
                    ]
                }
            ]
        }"#;
        let doc: ModuleDoc = serde_json::from_str(text).unwrap();
        let err = build_module(&doc).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateNodeId { .. }));
    }

    #[test]
    fn occupied_cells_surface_the_core_error() {
        let text = r#"{
            "functions": [
                {
                    "name": "f",
                    "nodes": [
                        { "id": "a", "kind": "integer", "value": 1, "position": [0, 0] },
                        { "id": "b", "kind": "integer", "value": 2, "position": [0, 0] }
                    ]
                }
            ]
        }"#;
        let doc: ModuleDoc = serde_json::from_str(text).unwrap();
        let err = build_module(&doc).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Core(CoreError::CellOccupied { .. })
        ));
    }
}
