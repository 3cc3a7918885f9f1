use std::collections::HashSet;
use std::sync::Arc;

use super::super::highlight::{FocusState, SpotlightState, build_focus_state};
use super::super::{FocusCache, FocusCacheKey, RenderGraph, ViewModel};

impl ViewModel {
    pub(in crate::app) fn selected_index(&self) -> Option<usize> {
        self.selected
            .as_deref()
            .and_then(|id| self.index.node_index(id))
    }

    pub(in crate::app) fn hovered_node_index(&self) -> Option<usize> {
        self.hover
            .current()
            .and_then(|id| self.index.node_index(id))
    }

    pub(in crate::app) fn is_visible(&self, node: usize) -> bool {
        self.graph_cache
            .as_ref()
            .and_then(|cache| cache.visible_mask.get(node).copied())
            .unwrap_or(false)
    }

    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        self.render_graph_revision = self.render_graph_revision.wrapping_add(1);

        let selected = self.selected_index();
        let anchor = self.index.anchor();
        let related_to_selected = if self.only_related {
            selected.map(|node| self.index.related(node).into_iter().collect::<HashSet<_>>())
        } else {
            None
        };

        let visible_mask = self
            .graph
            .nodes
            .iter()
            .enumerate()
            .map(|(node, record)| {
                let always_include = Some(node) == anchor || Some(node) == selected;
                let kind_matches = self.kind_filter.is_none_or(|kind| record.kind == kind);
                let related_matches = related_to_selected
                    .as_ref()
                    .is_none_or(|related| related.contains(&node));
                always_include || (kind_matches && related_matches)
            })
            .collect::<Vec<_>>();

        let visible_nodes = visible_mask
            .iter()
            .enumerate()
            .filter_map(|(node, visible)| visible.then_some(node))
            .collect::<Vec<_>>();

        let visible_edges = self
            .index
            .resolved_edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| visible_mask[edge.from] && visible_mask[edge.to])
            .map(|(position, _)| position)
            .collect::<Vec<_>>();

        self.visible_node_count = visible_nodes.len();
        self.visible_edge_count = visible_edges.len();
        tracing::debug!(
            revision = self.render_graph_revision,
            nodes = self.visible_node_count,
            edges = self.visible_edge_count,
            "rebuilt visible graph"
        );

        self.graph_cache = Some(RenderGraph {
            visible_nodes,
            visible_mask,
            visible_edges,
        });
        self.graph_dirty = false;
    }

    /// Focus for the current spotlight; recomputed only when it changes.
    pub(in crate::app) fn focus_state(&mut self) -> Arc<FocusState> {
        let key = FocusCacheKey {
            selected: self.selected_index(),
            hovered: self.hovered_node_index(),
        };

        if let Some(cached) = &self.focus_cache
            && cached.key == key
        {
            return Arc::clone(&cached.focus);
        }

        let focus = Arc::new(build_focus_state(
            &self.index,
            SpotlightState {
                selected: key.selected,
                hovered: key.hovered,
            },
        ));
        self.focus_cache = Some(FocusCache {
            key,
            focus: Arc::clone(&focus),
        });
        focus
    }
}
