use std::collections::HashSet;

use super::graph::RelationIndex;

mod collect;
pub mod paths;
pub mod tiers;

use self::collect::{collect_cluster, collect_path_pairs};
use self::paths::shortest_path_to_anchor;

pub use self::paths::{shortest_path, shortest_path_ids};
pub use self::tiers::{
    DensityGuard, EdgeStyle, EdgeTier, NodeClass, NodeStyle, edge_tier, node_class,
    visible_spotlight_edges,
};

/// Durable selection plus transient hover; hover wins the spotlight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpotlightState {
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
}

impl SpotlightState {
    pub fn target(&self) -> Option<usize> {
        self.hovered.or(self.selected)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FocusState {
    pub selected: Option<usize>,
    pub spotlight: Option<usize>,
    pub anchor: Option<usize>,
    /// Spotlight first, anchor last. `[anchor]` when they coincide.
    pub root_path: Vec<usize>,
    pub related: HashSet<usize>,
    pub cluster: HashSet<usize>,
    /// Edges touching the spotlight across the whole graph, filters ignored.
    pub direct_edge_count: usize,
    path_pairs: HashSet<(usize, usize)>,
}

impl FocusState {
    pub fn on_root_path(&self, node: usize) -> bool {
        self.root_path.contains(&node)
    }
}

pub fn build_focus_state(index: &RelationIndex, spotlight: SpotlightState) -> FocusState {
    let anchor = index.anchor();
    let node_count = index.node_count();
    let valid = |node: Option<usize>| node.filter(|&node| node < node_count);
    let spotlight = SpotlightState {
        selected: valid(spotlight.selected),
        hovered: valid(spotlight.hovered),
    };
    let selected = spotlight.selected;
    let target = spotlight.target();

    let Some(target) = target else {
        return FocusState {
            selected,
            anchor,
            ..FocusState::default()
        };
    };

    let (related, cluster) = collect_cluster(index, target);
    let root_path = shortest_path_to_anchor(index, target);
    let path_pairs = collect_path_pairs(&root_path);

    FocusState {
        selected,
        spotlight: Some(target),
        anchor,
        root_path,
        related,
        cluster,
        direct_edge_count: index.edges_touching(target).len(),
        path_pairs,
    }
}
