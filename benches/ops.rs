// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use mindgrove::model::{EdgeId, MapId, MindMap, NodeId, NodeKind};
use mindgrove::ops::{apply_ops, ApplyResult, Op};

// Benchmark identity (keep stable):
// - Group name in this file: `ops.apply`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `add_child_single`, `cascade_200`).
fn checksum_apply_result(result: &ApplyResult) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(result.new_rev);
    acc = acc.wrapping_mul(131).wrapping_add(result.applied as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.added_nodes.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.updated_nodes.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.removed_nodes.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.added_edges.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.removed_edges.len() as u64);
    acc
}

fn nid(idx: usize) -> NodeId {
    NodeId::new(format!("bench_node_{idx:06}")).expect("node id")
}

fn eid(idx: usize) -> EdgeId {
    EdgeId::new(format!("bench_edge_{idx:06}")).expect("edge id")
}

/// Root with `children` direct text children.
fn star_map(children: usize) -> MindMap {
    let mut map = MindMap::new(MapId::new("bench").expect("map id"), "bench");
    let root = map.root_id().expect("root").clone();
    let ops = (0..children)
        .map(|idx| Op::AddChild {
            node_id: nid(idx),
            edge_id: eid(idx),
            parent_id: root.clone(),
            kind: NodeKind::Text,
            label: Some(format!("bench_node_{idx:06}")),
        })
        .collect::<Vec<_>>();
    apply_ops(&mut map, &ops).expect("seed star map");
    map
}

/// Root with a single chain of `depth` descendants hanging off it.
fn chain_map(depth: usize) -> MindMap {
    let mut map = MindMap::new(MapId::new("bench").expect("map id"), "bench");
    let root = map.root_id().expect("root").clone();
    let ops = (0..depth)
        .map(|idx| Op::AddChild {
            node_id: nid(idx),
            edge_id: eid(idx),
            parent_id: if idx == 0 { root.clone() } else { nid(idx - 1) },
            kind: NodeKind::Text,
            label: Some(format!("bench_node_{idx:06}")),
        })
        .collect::<Vec<_>>();
    apply_ops(&mut map, &ops).expect("seed chain map");
    map
}

fn add_child_ops(parents: usize, count: usize) -> Vec<Op> {
    (0..count)
        .map(|idx| Op::AddChild {
            node_id: NodeId::new(format!("bench_new_{idx:06}")).expect("node id"),
            edge_id: EdgeId::new(format!("bench_new_edge_{idx:06}")).expect("edge id"),
            parent_id: nid(idx.wrapping_mul(7) % parents),
            kind: NodeKind::Text,
            label: Some(format!("bench_new_{idx:06}")),
        })
        .collect()
}

fn connect_ops(nodes: usize, count: usize) -> Vec<Op> {
    (0..count)
        .map(|idx| {
            let from_index = idx.wrapping_mul(7) % nodes;
            let mut to_index = idx.wrapping_mul(7).wrapping_add(3) % nodes;
            if to_index == from_index {
                to_index = (to_index + 1) % nodes;
            }
            Op::Connect {
                edge_id: EdgeId::new(format!("bench_cross_{idx:06}")).expect("edge id"),
                source_id: nid(from_index),
                target_id: nid(to_index),
            }
        })
        .collect()
}

fn benches_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.apply");

    let star = star_map(200);

    for (case, count) in [("add_child_single", 1), ("add_child_batch_10", 10), ("add_child_batch_200", 200)] {
        let ops = add_child_ops(200, count);
        group.throughput(Throughput::Elements(ops.len() as u64));
        group.bench_function(case, {
            let template = star.clone();
            move |b| {
                b.iter_batched(
                    || template.clone(),
                    |mut map| {
                        let result = apply_ops(&mut map, black_box(&ops)).expect("apply_ops");
                        black_box(checksum_apply_result(&result))
                    },
                    BatchSize::SmallInput,
                )
            }
        });
    }

    let cross_ops = connect_ops(200, 200);
    group.throughput(Throughput::Elements(cross_ops.len() as u64));
    group.bench_function("connect_batch_200", {
        let template = star.clone();
        move |b| {
            b.iter_batched(
                || template.clone(),
                |mut map| {
                    let result = apply_ops(&mut map, black_box(&cross_ops)).expect("apply_ops");
                    black_box(checksum_apply_result(&result))
                },
                BatchSize::SmallInput,
            )
        }
    });

    let chain = chain_map(200);
    let cascade = vec![Op::DeleteSubtree { node_id: nid(0) }];
    group.throughput(Throughput::Elements(200));
    group.bench_function("cascade_200", move |b| {
        b.iter_batched(
            || chain.clone(),
            |mut map| {
                let result = apply_ops(&mut map, black_box(&cascade)).expect("apply_ops");
                black_box(checksum_apply_result(&result))
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, benches_ops);
criterion_main!(benches);
