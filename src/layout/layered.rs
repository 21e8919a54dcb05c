// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::{NodeId, Position};

use super::{LayoutAssignment, LayoutEngine, LayoutError, LayoutGraph};

/// Built-in deterministic layered layout, left to right.
///
/// Nodes are grouped into layers by breadth-first depth from the sources
/// (in-degree zero; falls back to input order inside strongly connected
/// graphs), columns are spaced by the widest node in the preceding layer,
/// siblings stack vertically around the horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredEngine {
    layer_gap: f64,
    sibling_gap: f64,
}

impl LayeredEngine {
    pub fn new(layer_gap: f64, sibling_gap: f64) -> Self {
        Self {
            layer_gap,
            sibling_gap,
        }
    }
}

impl Default for LayeredEngine {
    fn default() -> Self {
        // The spacing the original editor asked of its engine.
        Self::new(100.0, 80.0)
    }
}

impl LayoutEngine for LayeredEngine {
    fn layout(&self, graph: &LayoutGraph) -> Result<LayoutAssignment, LayoutError> {
        let mut assignment = LayoutAssignment::default();
        if graph.nodes.is_empty() {
            return Ok(assignment);
        }

        let known: BTreeSet<&NodeId> = graph.nodes.iter().map(|node| &node.id).collect();
        let mut outgoing: BTreeMap<&NodeId, Vec<&NodeId>> = BTreeMap::new();
        let mut in_degree: BTreeMap<&NodeId, usize> = graph.nodes.iter().map(|n| (&n.id, 0)).collect();
        for edge in &graph.edges {
            if !known.contains(&edge.source) || !known.contains(&edge.target) {
                return Err(LayoutError::new(format!(
                    "edge {} references a node missing from the input",
                    edge.id
                )));
            }
            // Self-loops carry no layering information.
            if edge.source == edge.target {
                continue;
            }
            outgoing.entry(&edge.source).or_default().push(&edge.target);
            *in_degree.entry(&edge.target).or_default() += 1;
        }

        // Multi-source BFS in input order; unreached nodes (cycles, islands)
        // are seeded as extra sources so every node lands in a layer.
        let mut layer_of: BTreeMap<&NodeId, usize> = BTreeMap::new();
        let mut queue = VecDeque::new();
        for node in &graph.nodes {
            if in_degree.get(&node.id).copied() == Some(0) {
                layer_of.insert(&node.id, 0);
                queue.push_back(&node.id);
            }
        }
        let mut cursor = graph.nodes.iter();
        loop {
            while let Some(current) = queue.pop_front() {
                let next_layer = layer_of[current] + 1;
                for target in outgoing.get(current).into_iter().flatten() {
                    if !layer_of.contains_key(*target) {
                        layer_of.insert(target, next_layer);
                        queue.push_back(target);
                    }
                }
            }
            match cursor.find(|node| !layer_of.contains_key(&node.id)) {
                Some(node) => {
                    layer_of.insert(&node.id, 0);
                    queue.push_back(&node.id);
                }
                None => break,
            }
        }

        let layer_count = layer_of.values().copied().max().unwrap_or(0) + 1;
        let mut layers: Vec<Vec<&NodeId>> = vec![Vec::new(); layer_count];
        for node in &graph.nodes {
            layers[layer_of[&node.id]].push(&node.id);
        }

        let widths: BTreeMap<&NodeId, f64> = graph.nodes.iter().map(|n| (&n.id, n.width)).collect();
        let heights: BTreeMap<&NodeId, f64> = graph.nodes.iter().map(|n| (&n.id, n.height)).collect();

        let mut x = 0.0;
        for layer in &layers {
            let column_height: f64 = layer
                .iter()
                .map(|node_id| heights[*node_id] + self.sibling_gap)
                .sum::<f64>()
                - self.sibling_gap;
            let mut y = -column_height / 2.0;
            let mut max_width = 0.0f64;
            for node_id in layer {
                assignment.insert((*node_id).clone(), Position::new(x, y));
                y += heights[*node_id] + self.sibling_gap;
                max_width = max_width.max(widths[*node_id]);
            }
            x += max_width + self.layer_gap;
        }

        Ok(assignment)
    }
}
