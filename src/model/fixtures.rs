// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use super::document::MindMap;
use super::edge::Edge;
use super::ids::{EdgeId, MapId, NodeId};
use super::node::{Node, NodeKind, Position};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

/// Root `R` with children `A`, `B`; `A` has child `C`.
///
/// The shape used throughout the ops tests: deleting `A` must remove `{A, C}`
/// and leave `R`, `B` and the `R→B` edge intact.
pub(crate) fn small_tree() -> MindMap {
    let mut map = MindMap::from_parts(
        MapId::new("fixture").expect("map id"),
        "Fixture",
        None,
        Default::default(),
        Default::default(),
    )
    .expect("empty parts");

    let mut root = Node::root("R");
    root.set_position(Position::new(0.0, 0.0));
    map.nodes_mut().insert(nid("r"), root);

    for (node_id, label, x, y) in [("a", "A", 250.0, -60.0), ("b", "B", 250.0, 60.0)] {
        let mut node = Node::new(label, NodeKind::Text);
        node.set_position(Position::new(x, y));
        map.nodes_mut().insert(nid(node_id), node);
    }
    let mut c = Node::new("C", NodeKind::Text);
    c.set_position(Position::new(500.0, -60.0));
    map.nodes_mut().insert(nid("c"), c);

    map.edges_mut().insert(eid("e-ra"), Edge::new(nid("r"), nid("a")));
    map.edges_mut().insert(eid("e-rb"), Edge::new(nid("r"), nid("b")));
    map.edges_mut().insert(eid("e-ac"), Edge::new(nid("a"), nid("c")));

    map
}

/// A small demo document for `--demo` mode and TUI tests.
pub(crate) fn demo_map() -> MindMap {
    let mut map = small_tree();
    map.set_name("Demo map");

    let mut code = Node::new("Snippet", NodeKind::Code);
    code.set_position(Position::new(500.0, 60.0));
    map.nodes_mut().insert(nid("d"), code);
    map.edges_mut().insert(eid("e-bd"), Edge::new(nid("b"), nid("d")));

    map
}
