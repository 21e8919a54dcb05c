// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Layout adapter.
//!
//! Translates the document into the graph representation an automatic layout
//! engine consumes (every node once with a stable size hint, every edge as a
//! source/target pair) and writes the returned coordinates back — positions
//! only, nothing else. Engines are a black box behind [`LayoutEngine`];
//! [`layered::LayeredEngine`] is the built-in default.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{EdgeId, MindMap, NodeId, NodeKind, Position};

pub mod layered;

pub use layered::LayeredEngine;

/// Default node height hint, canvas units.
pub const NODE_HEIGHT: f64 = 60.0;

/// Size hint for a node, stable per kind so repeated layouts of an unchanged
/// graph are reproducible.
pub fn size_hint(kind: NodeKind) -> (f64, f64) {
    let width = match kind {
        NodeKind::Text => 180.0,
        NodeKind::Image | NodeKind::Audio | NodeKind::Video => 220.0,
        NodeKind::Code => 260.0,
    };
    (width, NODE_HEIGHT)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// The engine-facing snapshot of a document's structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

/// Per-node coordinates returned by an engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutAssignment {
    positions: BTreeMap<NodeId, Position>,
}

impl LayoutAssignment {
    pub fn insert(&mut self, node_id: NodeId, position: Position) {
        self.positions.insert(node_id, position);
    }

    pub fn position(&self, node_id: &NodeId) -> Option<Position> {
        self.positions.get(node_id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An automatic layout engine. Given size hints and the edge list it returns
/// coordinates; its internal algorithm is opaque to the editor.
pub trait LayoutEngine: Send + Sync {
    fn layout(&self, graph: &LayoutGraph) -> Result<LayoutAssignment, LayoutError>;
}

/// Engine call failed. Non-fatal: positions simply remain unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutError {
    message: String,
}

impl LayoutError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout engine unavailable: {}", self.message)
    }
}

impl std::error::Error for LayoutError {}

/// Builds the engine input from the current document: each node exactly once
/// with its size hint, each edge as a source/target id pair.
pub fn snapshot_graph(map: &MindMap) -> LayoutGraph {
    let nodes = map
        .nodes()
        .iter()
        .map(|(node_id, node)| {
            let (width, height) = size_hint(node.kind());
            LayoutNode {
                id: node_id.clone(),
                width,
                height,
            }
        })
        .collect();

    let edges = map
        .edges()
        .iter()
        .map(|(edge_id, edge)| LayoutEdge {
            id: edge_id.clone(),
            source: edge.source_id().clone(),
            target: edge.target_id().clone(),
        })
        .collect();

    LayoutGraph { nodes, edges }
}

/// Writes an assignment back into the document.
///
/// Only `position` fields are touched. Nodes missing from the assignment
/// (partial engine failure) keep their previous position; assignment entries
/// for ids no longer in the document are ignored.
pub fn apply_assignment(map: &mut MindMap, assignment: &LayoutAssignment) {
    for (node_id, node) in map.nodes_mut().iter_mut() {
        if let Some(position) = assignment.position(node_id) {
            node.set_position(position);
        }
    }
}
