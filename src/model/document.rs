// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;

use super::edge::Edge;
use super::ids::{EdgeId, MapId, NodeId};
use super::node::Node;

/// The full node/edge graph representing one diagram.
///
/// A document is created either fresh (single root node, see [`MindMap::new`])
/// or hydrated from the persistence wire format (see [`MindMap::from_parts`]).
/// It is mutated exclusively through [`crate::ops::apply_ops`]; consumers only
/// ever observe a consistent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MindMap {
    map_id: MapId,
    name: String,
    description: Option<String>,
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    rev: u64,
}

impl MindMap {
    /// Creates a fresh document with its single root node at the origin.
    pub fn new(map_id: MapId, name: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::fresh(), Node::root("Central topic"));
        Self {
            map_id,
            name: name.into(),
            description: None,
            nodes,
            edges: BTreeMap::new(),
            rev: 0,
        }
    }

    /// Hydrates a document from already-decoded parts, validating the graph
    /// invariants: every edge endpoint must exist and a non-empty document
    /// must contain exactly one root node.
    pub fn from_parts(
        map_id: MapId,
        name: impl Into<String>,
        description: Option<String>,
        nodes: BTreeMap<NodeId, Node>,
        edges: BTreeMap<EdgeId, Edge>,
    ) -> Result<Self, IntegrityError> {
        for (edge_id, edge) in &edges {
            for node_id in [edge.source_id(), edge.target_id()] {
                if !nodes.contains_key(node_id) {
                    return Err(IntegrityError::DanglingEdge {
                        edge_id: edge_id.clone(),
                        node_id: node_id.clone(),
                    });
                }
            }
        }

        let roots = nodes
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(|(node_id, _)| node_id.clone())
            .collect::<Vec<_>>();
        if !nodes.is_empty() {
            match roots.as_slice() {
                [_] => {}
                [] => return Err(IntegrityError::MissingRoot),
                _ => return Err(IntegrityError::MultipleRoots { node_ids: roots }),
            }
        }

        Ok(Self {
            map_id,
            name: name.into(),
            description,
            nodes,
            edges,
            rev: 0,
        })
    }

    pub fn map_id(&self) -> &MapId {
        &self.map_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description<T: Into<String>>(&mut self, description: Option<T>) {
        self.description = description.map(Into::into);
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<EdgeId, Edge> {
        &self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    /// The root node id, if the document is non-empty.
    pub fn root_id(&self) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.is_root())
            .map(|(node_id, _)| node_id)
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    // Mutable access stays crate-private: ops and layout own the write paths.
    pub(crate) fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, Node> {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut BTreeMap<EdgeId, Edge> {
        &mut self.edges
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityError {
    DanglingEdge { edge_id: EdgeId, node_id: NodeId },
    MissingRoot,
    MultipleRoots { node_ids: Vec<NodeId> },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "edge {edge_id} references missing node {node_id}")
            }
            Self::MissingRoot => f.write_str("non-empty document has no root node"),
            Self::MultipleRoots { node_ids } => {
                write!(f, "document has {} root nodes", node_ids.len())
            }
        }
    }
}

impl std::error::Error for IntegrityError {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{IntegrityError, MindMap};
    use crate::model::{Edge, EdgeId, MapId, Node, NodeId, NodeKind};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn fresh_document_has_exactly_one_root() {
        let map = MindMap::new(MapId::new("m1").expect("map id"), "Plan");
        assert_eq!(map.nodes().len(), 1);
        assert_eq!(map.edges().len(), 0);
        assert_eq!(map.rev(), 0);

        let root_id = map.root_id().expect("root id").clone();
        assert!(map.node(&root_id).expect("root node").is_root());
    }

    #[test]
    fn from_parts_rejects_dangling_edges() {
        let mut nodes = BTreeMap::new();
        nodes.insert(nid("a"), Node::root("A"));
        let mut edges = BTreeMap::new();
        edges.insert(
            EdgeId::new("e1").expect("edge id"),
            Edge::new(nid("a"), nid("ghost")),
        );

        let result = MindMap::from_parts(
            MapId::new("m1").expect("map id"),
            "Broken",
            None,
            nodes,
            edges,
        );
        assert_eq!(
            result,
            Err(IntegrityError::DanglingEdge {
                edge_id: EdgeId::new("e1").expect("edge id"),
                node_id: nid("ghost"),
            })
        );
    }

    #[test]
    fn from_parts_rejects_rootless_and_multi_root_documents() {
        let mut nodes = BTreeMap::new();
        nodes.insert(nid("a"), Node::new("A", NodeKind::Text));
        let result = MindMap::from_parts(
            MapId::new("m1").expect("map id"),
            "No root",
            None,
            nodes,
            BTreeMap::new(),
        );
        assert_eq!(result, Err(IntegrityError::MissingRoot));

        let mut nodes = BTreeMap::new();
        nodes.insert(nid("a"), Node::root("A"));
        nodes.insert(nid("b"), Node::root("B"));
        let result = MindMap::from_parts(
            MapId::new("m2").expect("map id"),
            "Two roots",
            None,
            nodes,
            BTreeMap::new(),
        );
        assert!(matches!(result, Err(IntegrityError::MultipleRoots { .. })));
    }

    #[test]
    fn from_parts_accepts_empty_documents() {
        let result = MindMap::from_parts(
            MapId::new("m1").expect("map id"),
            "Empty",
            None,
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn from_parts_accepts_cycles() {
        let mut nodes = BTreeMap::new();
        nodes.insert(nid("a"), Node::root("A"));
        nodes.insert(nid("b"), Node::new("B", NodeKind::Text));
        let mut edges = BTreeMap::new();
        edges.insert(
            EdgeId::new("e1").expect("edge id"),
            Edge::new(nid("a"), nid("b")),
        );
        edges.insert(
            EdgeId::new("e2").expect("edge id"),
            Edge::new(nid("b"), nid("a")),
        );

        let map = MindMap::from_parts(
            MapId::new("m1").expect("map id"),
            "Cyclic",
            None,
            nodes,
            edges,
        )
        .expect("cycles are permitted");
        assert_eq!(map.edges().len(), 2);
    }
}
