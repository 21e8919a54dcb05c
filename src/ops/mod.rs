// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Mutation operations for documents.
//!
//! Every mutation goes through [`apply_ops`], which applies a batch atomically:
//! the document is either fully updated (and its revision bumped) or left
//! untouched. The result carries a minimal delta the UI uses to refresh
//! derived state and to decide whether a re-layout is warranted.

use std::collections::HashSet;
use std::fmt;

use crate::model::{EdgeId, MindMap, NodeId, NodeKind, NodePayload};

/// Placeholder label used by quick-add (add first, rename later).
pub const PLACEHOLDER_LABEL: &str = "New node";

/// Horizontal offset of a new child from its parent, in canvas units.
pub const CHILD_X_OFFSET: f64 = 250.0;

/// Vertical jitter band applied to a new child to avoid sibling overlap.
/// Cosmetic only; layout replaces these positions anyway.
pub const CHILD_Y_JITTER: f64 = 50.0;

const NODE_COLORS: [&str; 7] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ec4899", "#8b5cf6", "#06b6d4", "#ef4444",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Creates a node near `parent_id` plus the `parent → child` edge.
    /// Fresh ids are supplied by the caller so the op stays replayable.
    AddChild {
        node_id: NodeId,
        edge_id: EdgeId,
        parent_id: NodeId,
        kind: NodeKind,
        label: Option<String>,
    },
    /// Replaces the label. An empty or whitespace-only label is a silent
    /// no-op: renaming must never leave a node unlabeled.
    RenameNode { node_id: NodeId, label: String },
    /// Replaces the kind-specific payload. The variant must match the
    /// node's kind.
    UpdatePayload { node_id: NodeId, payload: NodePayload },
    /// Appends a directed edge. Self-loops and parallel edges are permitted.
    Connect {
        edge_id: EdgeId,
        source_id: NodeId,
        target_id: NodeId,
    },
    /// Removes the node and everything transitively reachable from it via
    /// outgoing edges, plus every edge touching the removed set.
    DeleteSubtree { node_id: NodeId },
    /// Removes a single edge; nodes are untouched.
    RemoveEdge { edge_id: EdgeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which objects changed as the result of applying
/// ops. Intentionally coarse: sorted id lists per change class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added_nodes: Vec<NodeId>,
    pub updated_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub added_edges: Vec<EdgeId>,
    pub removed_edges: Vec<EdgeId>,
}

impl Delta {
    /// True when the graph structure changed (nodes/edges came or went),
    /// i.e. when a re-layout is warranted.
    pub fn is_structural(&self) -> bool {
        !(self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty())
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added_nodes: HashSet<NodeId>,
    updated_nodes: HashSet<NodeId>,
    removed_nodes: HashSet<NodeId>,
    added_edges: HashSet<EdgeId>,
    removed_edges: HashSet<EdgeId>,
}

impl DeltaBuilder {
    fn record_node_added(&mut self, node_id: NodeId) {
        self.removed_nodes.remove(&node_id);
        self.updated_nodes.remove(&node_id);
        self.added_nodes.insert(node_id);
    }

    fn record_node_updated(&mut self, node_id: NodeId) {
        if self.added_nodes.contains(&node_id) || self.removed_nodes.contains(&node_id) {
            return;
        }
        self.updated_nodes.insert(node_id);
    }

    fn record_node_removed(&mut self, node_id: NodeId) {
        self.added_nodes.remove(&node_id);
        self.updated_nodes.remove(&node_id);
        self.removed_nodes.insert(node_id);
    }

    fn record_edge_added(&mut self, edge_id: EdgeId) {
        self.removed_edges.remove(&edge_id);
        self.added_edges.insert(edge_id);
    }

    fn record_edge_removed(&mut self, edge_id: EdgeId) {
        self.added_edges.remove(&edge_id);
        self.removed_edges.insert(edge_id);
    }

    fn finish(self) -> Delta {
        fn sorted<T: Ord>(set: HashSet<T>) -> Vec<T> {
            let mut values = set.into_iter().collect::<Vec<_>>();
            values.sort();
            values
        }

        Delta {
            added_nodes: sorted(self.added_nodes),
            updated_nodes: sorted(self.updated_nodes),
            removed_nodes: sorted(self.removed_nodes),
            added_edges: sorted(self.added_edges),
            removed_edges: sorted(self.removed_edges),
        }
    }
}

/// Applies a batch of ops atomically.
///
/// Ops are applied to a working copy; only if every op succeeds is the copy
/// swapped in and the revision bumped. A failing op therefore leaves the
/// document byte-for-byte unchanged.
pub fn apply_ops(map: &mut MindMap, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: map.rev(),
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut scratch = map.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut scratch, op, &mut delta)?;
    }

    scratch.bump_rev();
    let new_rev = scratch.rev();
    *map = scratch;

    Ok(ApplyResult {
        new_rev,
        applied: ops.len(),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    NodeNotFound { node_id: NodeId },
    EdgeNotFound { edge_id: EdgeId },
    DuplicateNodeId { node_id: NodeId },
    DuplicateEdgeId { edge_id: EdgeId },
    RootDeletionForbidden { node_id: NodeId },
    PayloadKindMismatch {
        node_id: NodeId,
        node_kind: NodeKind,
        payload_kind: NodeKind,
    },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::EdgeNotFound { edge_id } => write!(f, "edge not found (id={edge_id})"),
            Self::DuplicateNodeId { node_id } => {
                write!(f, "node id already exists (id={node_id})")
            }
            Self::DuplicateEdgeId { edge_id } => {
                write!(f, "edge id already exists (id={edge_id})")
            }
            Self::RootDeletionForbidden { node_id } => {
                write!(f, "the root node cannot be deleted (id={node_id})")
            }
            Self::PayloadKindMismatch {
                node_id,
                node_kind,
                payload_kind,
            } => write!(
                f,
                "payload kind mismatch for node {node_id} (node={node_kind}, payload={payload_kind})"
            ),
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted op-application implementation.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
