//! Property tests for the relation engine.
//!
//! 1. **Shortest paths** have the true BFS length, start and end where asked
//!    and only step along real edges; disconnected pairs yield nothing.
//! 2. **Edge geometry** is deterministic and never emits non-finite numbers.
//! 3. **Zoom** keeps the scale inside its bounds for any input sequence.
//! 4. **Reset** lands exactly on the identity camera.
//! 5. **Tiering** gives each edge one tier consistent with the focus.

use std::collections::VecDeque;

use eframe::egui::{Pos2, pos2, vec2};
use proptest::prelude::*;
use relation_atlas::app::edges::{EdgeCurve, NodeBox};
use relation_atlas::app::graph::RelationIndex;
use relation_atlas::app::highlight::{
    EdgeTier, SpotlightState, build_focus_state, edge_tier, shortest_path,
};
use relation_atlas::app::viewport::{
    AnimationRequest, MAX_SCALE, MIN_SCALE, ViewportController, ViewportState,
};
use relation_atlas::content::{CanvasPos, NodeKind, NodeRecord, RelationGraph, Tone};

// ── Fixtures ─────────────────────────────────────────────────────────────

fn node(id: String, x: f32, y: f32) -> NodeRecord {
    NodeRecord {
        title: id.to_uppercase(),
        id,
        kind: NodeKind::Concept,
        tone: Tone::Calm,
        pos: CanvasPos::new(x, y),
        summary: String::new(),
        detail: String::new(),
        doc: None,
        event: None,
        keywords: Vec::new(),
    }
}

fn build_graph(node_count: usize, edges: &[(usize, usize)]) -> (RelationGraph, RelationIndex) {
    let nodes = (0..node_count)
        .map(|i| node(format!("n{i}"), (i * 7 % 100) as f32, (i * 13 % 100) as f32))
        .collect();
    let edges = edges
        .iter()
        .map(|(a, b)| (format!("n{a}"), format!("n{b}"), String::new()))
        .collect();
    let graph = RelationGraph::new("n0", nodes, edges);
    let index = RelationIndex::build(&graph);
    (graph, index)
}

/// Reference distances, computed independently of the engine's search.
fn bfs_distances(node_count: usize, edges: &[(usize, usize)], from: usize) -> Vec<Option<usize>> {
    let mut adjacency = vec![Vec::new(); node_count];
    for &(a, b) in edges {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let mut distance = vec![None; node_count];
    distance[from] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        let next = distance[current].map(|d| d + 1);
        for &neighbor in &adjacency[current] {
            if distance[neighbor].is_none() {
                distance[neighbor] = next;
                queue.push_back(neighbor);
            }
        }
    }
    distance
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..16).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..30)))
}

const SNAP: AnimationRequest = AnimationRequest {
    duration_secs: 0.48,
    reduced_motion: true,
};

const ANIMATED: AnimationRequest = AnimationRequest {
    duration_secs: 0.48,
    reduced_motion: false,
};

// ═════════════════════════════════════════════════════════════════════════
// 1. Shortest paths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn path_length_matches_bfs_distance(
        (node_count, edges) in graph_strategy(),
        a_seed in any::<usize>(),
        b_seed in any::<usize>(),
    ) {
        let (_graph, index) = build_graph(node_count, &edges);
        let a = a_seed % node_count;
        let b = b_seed % node_count;

        let path = shortest_path(&index, a, b);
        match bfs_distances(node_count, &edges, a)[b] {
            Some(distance) => {
                prop_assert_eq!(path.len(), distance + 1);
                prop_assert_eq!(path.first().copied(), Some(a));
                prop_assert_eq!(path.last().copied(), Some(b));
                for step in path.windows(2) {
                    prop_assert!(index.neighbors(step[0]).contains(&step[1]));
                }
            }
            None => prop_assert!(path.is_empty()),
        }
    }

    #[test]
    fn path_to_self_is_single_node((node_count, edges) in graph_strategy(), seed in any::<usize>()) {
        let (_graph, index) = build_graph(node_count, &edges);
        let a = seed % node_count;
        prop_assert_eq!(shortest_path(&index, a, a), vec![a]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Edge geometry
// ═════════════════════════════════════════════════════════════════════════

fn node_box_strategy() -> impl Strategy<Value = NodeBox> {
    (0f32..=100.0, 0f32..=100.0, 0f32..12.0, 0f32..6.0)
        .prop_map(|(x, y, hw, hh)| NodeBox::new(pos2(x, y), vec2(hw, hh)))
}

proptest! {
    #[test]
    fn geometry_is_deterministic(
        id in "[a-z]{1,8}->[a-z]{1,8}",
        from in node_box_strategy(),
        to in node_box_strategy(),
    ) {
        let first = EdgeCurve::build(&id, from, to).path_data();
        let second = EdgeCurve::build(&id, from, to).path_data();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn geometry_is_always_finite(
        id in ".{0,16}",
        from in node_box_strategy(),
        to in node_box_strategy(),
    ) {
        let curve = EdgeCurve::build(&id, from, to);
        prop_assert!(curve.is_finite());
        let data = curve.path_data();
        prop_assert!(!data.contains("NaN"));
        prop_assert!(!data.contains("inf"));
    }
}

#[test]
fn non_finite_boxes_fall_back_to_finite_geometry() {
    let broken = NodeBox::new(Pos2::new(f32::NAN, 10.0), vec2(f32::INFINITY, 2.0));
    let fine = NodeBox::new(pos2(40.0, 40.0), vec2(4.0, 2.0));
    for (from, to) in [(broken, fine), (fine, broken), (broken, broken)] {
        let data = EdgeCurve::build("a->b", from, to).path_data();
        assert!(!data.contains("NaN"), "{data}");
        assert!(!data.contains("inf"), "{data}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3 & 4. Viewport
// ═════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
enum CameraOp {
    Wheel(f32, f32, f32),
    Factor(f32),
    Pan(f32, f32),
}

fn camera_op() -> impl Strategy<Value = CameraOp> {
    prop_oneof![
        (-4000f32..4000.0, 0f32..800.0, 0f32..600.0).prop_map(|(d, x, y)| CameraOp::Wheel(d, x, y)),
        (0.01f32..20.0).prop_map(CameraOp::Factor),
        (-500f32..500.0, -500f32..500.0).prop_map(|(x, y)| CameraOp::Pan(x, y)),
    ]
}

fn apply(controller: &mut ViewportController, op: &CameraOp) {
    match *op {
        CameraOp::Wheel(delta, x, y) => controller.zoom_by_wheel(delta, vec2(x, y)),
        CameraOp::Factor(factor) => controller.zoom_by_factor(factor, vec2(400.0, 300.0)),
        CameraOp::Pan(x, y) => {
            controller.begin_pan(pos2(100.0, 100.0));
            controller.update_pan(pos2(100.0 + x, 100.0 + y));
            controller.end_pan();
        }
    }
}

proptest! {
    #[test]
    fn scale_stays_in_bounds(ops in prop::collection::vec(camera_op(), 1..40)) {
        let mut controller = ViewportController::default();
        for op in &ops {
            apply(&mut controller, op);
            let scale = controller.state().scale;
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&scale), "scale {scale}");
        }
    }

    #[test]
    fn reset_is_exact(ops in prop::collection::vec(camera_op(), 0..20), animated in any::<bool>()) {
        let mut controller = ViewportController::default();
        for op in &ops {
            apply(&mut controller, op);
        }

        if animated {
            controller.reset(5.0, ANIMATED);
            controller.tick(5.1);
            controller.tick(60.0);
        } else {
            controller.reset(5.0, SNAP);
        }
        prop_assert_eq!(controller.state(), ViewportState::IDENTITY);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Tier partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tiers_partition_edges(
        (node_count, edges) in graph_strategy(),
        selected in prop::option::of(any::<usize>()),
        hovered in prop::option::of(any::<usize>()),
    ) {
        let (_graph, index) = build_graph(node_count, &edges);
        let spotlight = SpotlightState {
            selected: selected.map(|s| s % node_count),
            hovered: hovered.map(|h| h % node_count),
        };
        let focus = build_focus_state(&index, spotlight);

        let mut counts = [0usize; 4];
        for edge in index.resolved_edges() {
            let tier = edge_tier(&focus, edge);
            let slot = match tier {
                EdgeTier::Primary => 0,
                EdgeTier::Path => 1,
                EdgeTier::Secondary => 2,
                EdgeTier::Background => 3,
            };
            counts[slot] += 1;

            let touches = focus.spotlight.is_some_and(|s| edge.touches(s));
            prop_assert_eq!(tier == EdgeTier::Primary, touches);
            if tier == EdgeTier::Path {
                prop_assert!(focus.on_root_path(edge.from) && focus.on_root_path(edge.to));
            }
        }
        prop_assert_eq!(counts.iter().sum::<usize>(), index.resolved_edges().len());
    }
}
