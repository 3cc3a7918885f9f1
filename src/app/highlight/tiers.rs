use crate::config::EngineConfig;

use super::super::graph::ResolvedEdge;
use super::FocusState;
use super::collect::ordered_pair;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeTier {
    Primary,
    Path,
    Secondary,
    Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Current,
    Spotlight,
    Root,
    Related,
    OnPath,
    Dimmed,
    Neutral,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DensityGuard {
    pub heavy: bool,
    pub crowded: bool,
}

impl DensityGuard {
    pub fn evaluate(
        visible_nodes: usize,
        visible_edges: usize,
        spotlight_edges: usize,
        config: &EngineConfig,
    ) -> Self {
        Self {
            heavy: visible_nodes > config.heavy_node_threshold
                || visible_edges > config.heavy_edge_threshold,
            crowded: spotlight_edges >= config.crowded_edge_threshold,
        }
    }

    pub fn labels_enabled(&self) -> bool {
        !self.heavy && !self.crowded
    }

    pub fn entrance_enabled(&self) -> bool {
        !self.heavy
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub opacity: f32,
    pub width: f32,
    /// `[dash, gap]` in screen pixels.
    pub dash: Option<[f32; 2]>,
    pub glow: bool,
    pub flow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub opacity: f32,
    pub border_width: f32,
    pub halo: bool,
}

pub fn edge_tier(focus: &FocusState, edge: &ResolvedEdge) -> EdgeTier {
    let Some(spotlight) = focus.spotlight else {
        return EdgeTier::Background;
    };

    if edge.touches(spotlight) {
        EdgeTier::Primary
    } else if focus.path_pairs.contains(&ordered_pair(edge.from, edge.to)) {
        EdgeTier::Path
    } else if focus.cluster.contains(&edge.from) && focus.cluster.contains(&edge.to) {
        EdgeTier::Secondary
    } else {
        EdgeTier::Background
    }
}

/// Edges touching the spotlight among `visible` (positions into `edges`).
pub fn visible_spotlight_edges(
    focus: &FocusState,
    edges: &[ResolvedEdge],
    visible: &[usize],
) -> usize {
    let Some(spotlight) = focus.spotlight else {
        return 0;
    };

    visible
        .iter()
        .filter_map(|&position| edges.get(position))
        .filter(|edge| edge.touches(spotlight))
        .count()
}

pub fn node_class(focus: &FocusState, node: usize) -> NodeClass {
    if focus.selected == Some(node) {
        return NodeClass::Current;
    }
    if focus.spotlight == Some(node) {
        return NodeClass::Spotlight;
    }
    if focus.anchor == Some(node) {
        return NodeClass::Root;
    }
    if focus.spotlight.is_none() {
        return NodeClass::Neutral;
    }

    if focus.related.contains(&node) {
        NodeClass::Related
    } else if focus.root_path.contains(&node) {
        NodeClass::OnPath
    } else {
        NodeClass::Dimmed
    }
}

pub fn edge_style(tier: EdgeTier, guard: DensityGuard, spotlight_active: bool) -> EdgeStyle {
    let heavy = guard.heavy;
    match tier {
        EdgeTier::Primary => EdgeStyle {
            opacity: 0.95,
            width: if heavy { 1.8 } else { 2.4 },
            dash: None,
            glow: !heavy,
            flow: false,
        },
        EdgeTier::Path => EdgeStyle {
            opacity: 0.92,
            width: if heavy { 1.9 } else { 2.8 },
            dash: None,
            glow: !heavy,
            flow: !heavy,
        },
        EdgeTier::Secondary => EdgeStyle {
            opacity: if heavy { 0.4 } else { 0.55 },
            width: if heavy { 1.0 } else { 1.3 },
            dash: Some([5.0, 4.0]),
            glow: false,
            flow: false,
        },
        EdgeTier::Background if spotlight_active => EdgeStyle {
            opacity: if heavy { 0.08 } else { 0.2 },
            width: if heavy { 0.7 } else { 0.9 },
            dash: None,
            glow: false,
            flow: false,
        },
        EdgeTier::Background => EdgeStyle {
            opacity: if heavy { 0.3 } else { 0.5 },
            width: if heavy { 0.8 } else { 1.1 },
            dash: None,
            glow: false,
            flow: false,
        },
    }
}

pub fn node_style(class: NodeClass, guard: DensityGuard) -> NodeStyle {
    let heavy = guard.heavy;
    match class {
        NodeClass::Current => NodeStyle {
            opacity: 1.0,
            border_width: 2.4,
            halo: !heavy,
        },
        NodeClass::Spotlight => NodeStyle {
            opacity: 1.0,
            border_width: 2.0,
            halo: !heavy,
        },
        NodeClass::Root => NodeStyle {
            opacity: 1.0,
            border_width: 1.8,
            halo: false,
        },
        NodeClass::Related | NodeClass::OnPath => NodeStyle {
            opacity: 0.95,
            border_width: 1.4,
            halo: false,
        },
        NodeClass::Neutral => NodeStyle {
            opacity: 0.9,
            border_width: 1.0,
            halo: false,
        },
        NodeClass::Dimmed => NodeStyle {
            opacity: if heavy { 0.28 } else { 0.4 },
            border_width: if heavy { 0.8 } else { 1.0 },
            halo: false,
        },
    }
}
