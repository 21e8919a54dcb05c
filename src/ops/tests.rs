// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use rstest::rstest;

use crate::model::fixtures::small_tree;
use crate::model::{EdgeId, MediaRef, NodeId, NodeKind, NodePayload};

use super::{apply_ops, ApplyError, Op, CHILD_X_OFFSET, CHILD_Y_JITTER, PLACEHOLDER_LABEL};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

#[test]
fn add_child_creates_node_and_edge_near_parent() {
    let mut map = small_tree();
    let parent = map.node(&nid("b")).expect("parent").clone();

    let result = apply_ops(
        &mut map,
        &[Op::AddChild {
            node_id: nid("new"),
            edge_id: eid("e-new"),
            parent_id: nid("b"),
            kind: NodeKind::Text,
            label: Some("Child of B".to_owned()),
        }],
    )
    .expect("apply");

    assert_eq!(result.new_rev, 1);
    assert_eq!(result.delta.added_nodes, vec![nid("new")]);
    assert_eq!(result.delta.added_edges, vec![eid("e-new")]);
    assert!(result.delta.is_structural());

    let node = map.node(&nid("new")).expect("new node");
    assert_eq!(node.label(), "Child of B");
    assert!(!node.is_root());
    assert_eq!(node.position().x, parent.position().x + CHILD_X_OFFSET);
    assert!((node.position().y - parent.position().y).abs() <= CHILD_Y_JITTER);

    let edge = map.edge(&eid("e-new")).expect("new edge");
    assert_eq!(edge.source_id(), &nid("b"));
    assert_eq!(edge.target_id(), &nid("new"));
}

#[test]
fn add_child_without_label_uses_placeholder() {
    let mut map = small_tree();

    apply_ops(
        &mut map,
        &[Op::AddChild {
            node_id: nid("quick"),
            edge_id: eid("e-quick"),
            parent_id: nid("r"),
            kind: NodeKind::Image,
            label: None,
        }],
    )
    .expect("apply");

    let node = map.node(&nid("quick")).expect("quick node");
    assert_eq!(node.label(), PLACEHOLDER_LABEL);
    assert_eq!(node.kind(), NodeKind::Image);
}

#[test]
fn add_child_to_missing_parent_fails_and_leaves_document_unchanged() {
    let mut map = small_tree();
    let before = map.clone();

    let result = apply_ops(
        &mut map,
        &[Op::AddChild {
            node_id: nid("new"),
            edge_id: eid("e-new"),
            parent_id: nid("ghost"),
            kind: NodeKind::Text,
            label: None,
        }],
    );

    assert_eq!(
        result,
        Err(ApplyError::NodeNotFound {
            node_id: nid("ghost")
        })
    );
    assert_eq!(map, before);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn blank_rename_is_a_noop(#[case] label: &str) {
    let mut map = small_tree();

    let result = apply_ops(
        &mut map,
        &[Op::RenameNode {
            node_id: nid("a"),
            label: label.to_owned(),
        }],
    )
    .expect("apply");

    assert_eq!(map.node(&nid("a")).expect("node").label(), "A");
    assert!(result.delta.updated_nodes.is_empty());
    assert!(!result.delta.is_structural());
}

#[test]
fn rename_replaces_label_and_trims() {
    let mut map = small_tree();

    let result = apply_ops(
        &mut map,
        &[Op::RenameNode {
            node_id: nid("a"),
            label: "  Renamed  ".to_owned(),
        }],
    )
    .expect("apply");

    assert_eq!(map.node(&nid("a")).expect("node").label(), "Renamed");
    assert_eq!(result.delta.updated_nodes, vec![nid("a")]);
}

#[test]
fn update_payload_rejects_kind_mismatch() {
    let mut map = small_tree();
    let before = map.clone();

    let result = apply_ops(
        &mut map,
        &[Op::UpdatePayload {
            node_id: nid("a"),
            payload: NodePayload::Code {
                source: "fn main() {}".to_owned(),
                language: "rust".to_owned(),
            },
        }],
    );

    assert_eq!(
        result,
        Err(ApplyError::PayloadKindMismatch {
            node_id: nid("a"),
            node_kind: NodeKind::Text,
            payload_kind: NodeKind::Code,
        })
    );
    assert_eq!(map, before);
}

#[test]
fn update_payload_replaces_media_reference() {
    let mut map = small_tree();
    apply_ops(
        &mut map,
        &[Op::AddChild {
            node_id: nid("img"),
            edge_id: eid("e-img"),
            parent_id: nid("r"),
            kind: NodeKind::Image,
            label: Some("Diagram".to_owned()),
        }],
    )
    .expect("add image node");

    apply_ops(
        &mut map,
        &[Op::UpdatePayload {
            node_id: nid("img"),
            payload: NodePayload::Image {
                media: Some(MediaRef::parse("https://example.test/diagram.png")),
            },
        }],
    )
    .expect("update payload");

    let node = map.node(&nid("img")).expect("image node");
    let NodePayload::Image { media: Some(media) } = node.payload() else {
        panic!("expected image payload with media");
    };
    assert_eq!(media.as_str(), "https://example.test/diagram.png");
    // Label untouched by payload updates.
    assert_eq!(node.label(), "Diagram");
}

#[test]
fn connect_allows_self_loops() {
    let mut map = small_tree();
    let edges_before = map.edges().len();

    let result = apply_ops(
        &mut map,
        &[Op::Connect {
            edge_id: eid("e-loop"),
            source_id: nid("b"),
            target_id: nid("b"),
        }],
    )
    .expect("apply");

    assert_eq!(map.edges().len(), edges_before + 1);
    assert_eq!(result.delta.added_edges, vec![eid("e-loop")]);
    let edge = map.edge(&eid("e-loop")).expect("loop edge");
    assert_eq!(edge.source_id(), edge.target_id());
}

#[test]
fn connect_allows_parallel_edges() {
    let mut map = small_tree();

    apply_ops(
        &mut map,
        &[Op::Connect {
            edge_id: eid("e-ra2"),
            source_id: nid("r"),
            target_id: nid("a"),
        }],
    )
    .expect("apply");

    let parallel = map
        .edges()
        .values()
        .filter(|edge| edge.source_id() == &nid("r") && edge.target_id() == &nid("a"))
        .count();
    assert_eq!(parallel, 2);
}

#[test]
fn connect_to_missing_endpoint_fails() {
    let mut map = small_tree();
    let before = map.clone();

    let result = apply_ops(
        &mut map,
        &[Op::Connect {
            edge_id: eid("e-bad"),
            source_id: nid("a"),
            target_id: nid("ghost"),
        }],
    );

    assert_eq!(
        result,
        Err(ApplyError::NodeNotFound {
            node_id: nid("ghost")
        })
    );
    assert_eq!(map, before);
}

#[test]
fn delete_subtree_removes_descendants_and_touching_edges() {
    // R -> A -> C, R -> B. Deleting A removes {A, C} and edges e-ra, e-ac.
    let mut map = small_tree();

    let result = apply_ops(&mut map, &[Op::DeleteSubtree { node_id: nid("a") }]).expect("apply");

    assert_eq!(result.delta.removed_nodes, vec![nid("a"), nid("c")]);
    assert_eq!(map.nodes().len(), 2);
    assert!(map.node(&nid("r")).is_some());
    assert!(map.node(&nid("b")).is_some());
    assert!(map.edge(&eid("e-rb")).is_some());

    // No edge in the result references a removed node.
    for edge in map.edges().values() {
        assert!(map.nodes().contains_key(edge.source_id()));
        assert!(map.nodes().contains_key(edge.target_id()));
    }
}

#[test]
fn delete_subtree_of_root_is_forbidden_and_leaves_document_unchanged() {
    let mut map = small_tree();
    let before = map.clone();

    let result = apply_ops(&mut map, &[Op::DeleteSubtree { node_id: nid("r") }]);

    assert_eq!(
        result,
        Err(ApplyError::RootDeletionForbidden { node_id: nid("r") })
    );
    assert_eq!(map, before);
    assert_eq!(map.rev(), before.rev());
}

#[test]
fn delete_subtree_terminates_on_cycles() {
    let mut map = small_tree();
    // Close a cycle C -> A, then delete A: both stay in the doomed set once.
    apply_ops(
        &mut map,
        &[Op::Connect {
            edge_id: eid("e-ca"),
            source_id: nid("c"),
            target_id: nid("a"),
        }],
    )
    .expect("connect");

    let result = apply_ops(&mut map, &[Op::DeleteSubtree { node_id: nid("a") }]).expect("apply");

    assert_eq!(result.delta.removed_nodes, vec![nid("a"), nid("c")]);
    assert!(map.node(&nid("r")).is_some());
    assert!(map.node(&nid("b")).is_some());
}

#[test]
fn delete_subtree_follows_outgoing_edges_only() {
    let mut map = small_tree();
    // B -> C: C is reachable from B, but B is not a descendant of A via
    // outgoing edges, so deleting A must keep B even though C goes away.
    apply_ops(
        &mut map,
        &[Op::Connect {
            edge_id: eid("e-bc"),
            source_id: nid("b"),
            target_id: nid("c"),
        }],
    )
    .expect("connect");

    apply_ops(&mut map, &[Op::DeleteSubtree { node_id: nid("a") }]).expect("apply");

    assert!(map.node(&nid("b")).is_some());
    assert!(map.node(&nid("c")).is_none());
    assert!(map.edge(&eid("e-bc")).is_none());
}

#[test]
fn remove_edge_removes_only_the_edge() {
    let mut map = small_tree();
    let nodes_before = map.nodes().len();

    let result = apply_ops(
        &mut map,
        &[Op::RemoveEdge {
            edge_id: eid("e-ac"),
        }],
    )
    .expect("apply");

    assert_eq!(map.nodes().len(), nodes_before);
    assert!(map.edge(&eid("e-ac")).is_none());
    assert_eq!(result.delta.removed_edges, vec![eid("e-ac")]);
}

#[test]
fn remove_missing_edge_fails() {
    let mut map = small_tree();
    let result = apply_ops(
        &mut map,
        &[Op::RemoveEdge {
            edge_id: eid("ghost"),
        }],
    );
    assert_eq!(
        result,
        Err(ApplyError::EdgeNotFound {
            edge_id: eid("ghost")
        })
    );
}

#[test]
fn failing_op_in_a_batch_rolls_back_the_whole_batch() {
    let mut map = small_tree();
    let before = map.clone();

    let result = apply_ops(
        &mut map,
        &[
            Op::RenameNode {
                node_id: nid("a"),
                label: "Renamed".to_owned(),
            },
            Op::DeleteSubtree { node_id: nid("r") },
        ],
    );

    assert!(result.is_err());
    assert_eq!(map, before);
    assert_eq!(map.node(&nid("a")).expect("node").label(), "A");
}

#[test]
fn empty_batch_does_not_bump_rev() {
    let mut map = small_tree();
    let result = apply_ops(&mut map, &[]).expect("apply");
    assert_eq!(result.applied, 0);
    assert_eq!(result.new_rev, 0);
    assert_eq!(map.rev(), 0);
}

#[test]
fn batch_applies_all_ops_under_one_rev_bump() {
    let mut map = small_tree();

    let result = apply_ops(
        &mut map,
        &[
            Op::AddChild {
                node_id: nid("x"),
                edge_id: eid("e-x"),
                parent_id: nid("b"),
                kind: NodeKind::Text,
                label: None,
            },
            Op::RenameNode {
                node_id: nid("x"),
                label: "Named later".to_owned(),
            },
        ],
    )
    .expect("apply");

    assert_eq!(result.applied, 2);
    assert_eq!(result.new_rev, 1);
    assert_eq!(map.node(&nid("x")).expect("node").label(), "Named later");
    // Added-then-updated collapses to added in the delta.
    assert_eq!(result.delta.added_nodes, vec![nid("x")]);
    assert!(result.delta.updated_nodes.is_empty());
}
