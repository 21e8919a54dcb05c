// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

/// Op-application helpers used by `apply_ops`. Keeps `ops::mod` focused on
/// the public op types and orchestration.
fn apply_op(map: &mut MindMap, op: &Op, delta: &mut DeltaBuilder) -> Result<(), ApplyError> {
    match op {
        Op::AddChild {
            node_id,
            edge_id,
            parent_id,
            kind,
            label,
        } => {
            let Some(parent) = map.node(parent_id) else {
                return Err(ApplyError::NodeNotFound {
                    node_id: parent_id.clone(),
                });
            };
            if map.nodes().contains_key(node_id) {
                return Err(ApplyError::DuplicateNodeId {
                    node_id: node_id.clone(),
                });
            }
            if map.edges().contains_key(edge_id) {
                return Err(ApplyError::DuplicateEdgeId {
                    edge_id: edge_id.clone(),
                });
            }

            let label = match label.as_deref().map(str::trim) {
                Some(trimmed) if !trimmed.is_empty() => trimmed.to_owned(),
                _ => PLACEHOLDER_LABEL.to_owned(),
            };
            let color = pick_color();

            let mut node = crate::model::Node::new(label, *kind);
            node.set_color(Some(color));
            node.set_position(child_position(parent.position()));
            map.nodes_mut().insert(node_id.clone(), node);

            let mut edge = crate::model::Edge::new(parent_id.clone(), node_id.clone());
            edge.style_mut().set_stroke(Some(color));
            edge.style_mut().set_stroke_width(Some(2.0));
            edge.style_mut().set_animated(true);
            map.edges_mut().insert(edge_id.clone(), edge);

            delta.record_node_added(node_id.clone());
            delta.record_edge_added(edge_id.clone());
            Ok(())
        }
        Op::RenameNode { node_id, label } => {
            let Some(node) = map.nodes_mut().get_mut(node_id) else {
                return Err(ApplyError::NodeNotFound {
                    node_id: node_id.clone(),
                });
            };

            // Blank renames keep the prior label and report no change.
            let trimmed = label.trim();
            if trimmed.is_empty() {
                return Ok(());
            }

            node.set_label(trimmed);
            delta.record_node_updated(node_id.clone());
            Ok(())
        }
        Op::UpdatePayload { node_id, payload } => {
            let Some(node) = map.nodes_mut().get_mut(node_id) else {
                return Err(ApplyError::NodeNotFound {
                    node_id: node_id.clone(),
                });
            };

            let node_kind = node.kind();
            let payload_kind = payload.kind();
            if node_kind != payload_kind {
                return Err(ApplyError::PayloadKindMismatch {
                    node_id: node_id.clone(),
                    node_kind,
                    payload_kind,
                });
            }

            node.set_payload(payload.clone());
            delta.record_node_updated(node_id.clone());
            Ok(())
        }
        Op::Connect {
            edge_id,
            source_id,
            target_id,
        } => {
            for node_id in [source_id, target_id] {
                if !map.nodes().contains_key(node_id) {
                    return Err(ApplyError::NodeNotFound {
                        node_id: node_id.clone(),
                    });
                }
            }
            if map.edges().contains_key(edge_id) {
                return Err(ApplyError::DuplicateEdgeId {
                    edge_id: edge_id.clone(),
                });
            }

            // Self-loops and parallel edges are deliberately permitted.
            let mut edge = crate::model::Edge::new(source_id.clone(), target_id.clone());
            edge.style_mut().set_stroke(Some("#94a3b8"));
            edge.style_mut().set_stroke_width(Some(2.0));
            edge.style_mut().set_animated(true);
            map.edges_mut().insert(edge_id.clone(), edge);

            delta.record_edge_added(edge_id.clone());
            Ok(())
        }
        Op::DeleteSubtree { node_id } => {
            if !map.nodes().contains_key(node_id) {
                return Err(ApplyError::NodeNotFound {
                    node_id: node_id.clone(),
                });
            }
            if map.root_id() == Some(node_id) {
                return Err(ApplyError::RootDeletionForbidden {
                    node_id: node_id.clone(),
                });
            }

            let doomed = reachable_from(map, node_id);
            for node_id in &doomed {
                map.nodes_mut().remove(node_id);
                delta.record_node_removed(node_id.clone());
            }

            let doomed_edges = map
                .edges()
                .iter()
                .filter(|(_, edge)| {
                    doomed.contains(edge.source_id()) || doomed.contains(edge.target_id())
                })
                .map(|(edge_id, _)| edge_id.clone())
                .collect::<Vec<_>>();
            for edge_id in doomed_edges {
                map.edges_mut().remove(&edge_id);
                delta.record_edge_removed(edge_id);
            }
            Ok(())
        }
        Op::RemoveEdge { edge_id } => {
            if map.edges_mut().remove(edge_id).is_none() {
                return Err(ApplyError::EdgeNotFound {
                    edge_id: edge_id.clone(),
                });
            }
            delta.record_edge_removed(edge_id.clone());
            Ok(())
        }
    }
}

/// The set reachable from `start` by following edges source → target.
///
/// Iterative worklist with a visited set: terminates on cycles and never
/// recurses, however deep the subtree.
fn reachable_from(map: &MindMap, start: &NodeId) -> std::collections::BTreeSet<NodeId> {
    let mut visited = std::collections::BTreeSet::new();
    let mut queue = std::collections::VecDeque::new();

    visited.insert(start.clone());
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        for edge in map.edges().values() {
            if edge.source_id() == &current && !visited.contains(edge.target_id()) {
                visited.insert(edge.target_id().clone());
                queue.push_back(edge.target_id().clone());
            }
        }
    }

    visited
}

fn child_position(parent: crate::model::Position) -> crate::model::Position {
    use rand::Rng as _;

    let jitter = rand::thread_rng().gen_range(-CHILD_Y_JITTER..=CHILD_Y_JITTER);
    crate::model::Position::new(parent.x + CHILD_X_OFFSET, parent.y + jitter)
}

fn pick_color() -> &'static str {
    use rand::Rng as _;

    NODE_COLORS[rand::thread_rng().gen_range(0..NODE_COLORS.len())]
}
