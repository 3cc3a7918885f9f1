use std::collections::{HashMap, HashSet};

use crate::content::{EdgeRecord, RelationGraph};

/// An edge whose endpoints both resolved to nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEdge {
    pub edge: usize,
    pub from: usize,
    pub to: usize,
}

impl ResolvedEdge {
    pub fn touches(&self, node: usize) -> bool {
        self.from == node || self.to == node
    }

    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Index-based lookup tables over a [`RelationGraph`]. Node indices match
/// `graph.nodes`; edge indices match `graph.edges`.
#[derive(Clone, Debug)]
pub struct RelationIndex {
    index_by_id: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    touching: Vec<Vec<usize>>,
    edges: Vec<ResolvedEdge>,
    anchor: Option<usize>,
}

impl RelationIndex {
    pub fn build(graph: &RelationGraph) -> Self {
        let mut index_by_id = HashMap::with_capacity(graph.nodes.len());
        for (index, node) in graph.nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        let mut adjacency = vec![Vec::new(); graph.nodes.len()];
        let mut touching = vec![Vec::new(); graph.nodes.len()];
        let mut edges = Vec::with_capacity(graph.edges.len());
        let mut dangling = 0usize;

        for (edge_index, edge) in graph.edges.iter().enumerate() {
            let (Some(&from), Some(&to)) =
                (index_by_id.get(&edge.from), index_by_id.get(&edge.to))
            else {
                dangling += 1;
                tracing::debug!(edge = %edge.id, "skipping edge with dangling endpoint");
                continue;
            };

            adjacency[from].push(to);
            adjacency[to].push(from);
            touching[from].push(edge_index);
            if to != from {
                touching[to].push(edge_index);
            }
            edges.push(ResolvedEdge {
                edge: edge_index,
                from,
                to,
            });
        }

        if dangling > 0 {
            tracing::info!(dangling, "dropped edges that reference unknown nodes");
        }

        let anchor = index_by_id.get(&graph.anchor_id).copied();

        Self {
            index_by_id,
            adjacency,
            touching,
            edges,
            anchor,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edge indices (into `graph.edges`) where `node` is either endpoint.
    pub fn edges_touching(&self, node: usize) -> &[usize] {
        self.touching.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Deduplicated neighbors in first-discovery order.
    pub fn related(&self, node: usize) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.neighbors(node)
            .iter()
            .copied()
            .filter(|&next| next != node && seen.insert(next))
            .collect()
    }

    pub fn resolved_edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn edges_touching_id<'a>(&self, graph: &'a RelationGraph, id: &str) -> Vec<&'a EdgeRecord> {
        self.node_index(id)
            .map(|node| {
                self.edges_touching(node)
                    .iter()
                    .filter_map(|&edge| graph.edges.get(edge))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn related_ids<'a>(&self, graph: &'a RelationGraph, id: &str) -> Vec<&'a str> {
        self.node_index(id)
            .map(|node| {
                self.related(node)
                    .into_iter()
                    .filter_map(|next| graph.nodes.get(next).map(|n| n.id.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_node;

    fn graph() -> RelationGraph {
        RelationGraph::new(
            "a",
            vec![
                test_node("a", 10.0, 10.0),
                test_node("b", 20.0, 20.0),
                test_node("c", 30.0, 30.0),
            ],
            vec![
                ("a".into(), "b".into(), "ab".into()),
                ("b".into(), "a".into(), "ba".into()),
                ("b".into(), "c".into(), "bc".into()),
                ("c".into(), "missing".into(), "dangling".into()),
            ],
        )
    }

    #[test]
    fn adjacency_is_symmetric() {
        let index = RelationIndex::build(&graph());
        for node in 0..index.node_count() {
            for &next in index.neighbors(node) {
                assert!(index.neighbors(next).contains(&node));
            }
        }
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let graph = graph();
        let index = RelationIndex::build(&graph);
        assert_eq!(index.resolved_edges().len(), 3);
        let c_edges = index.edges_touching_id(&graph, "c");
        assert_eq!(c_edges.len(), 1);
        assert_eq!(c_edges[0].label, "bc");
    }

    #[test]
    fn related_ids_are_deduplicated() {
        let graph = graph();
        let index = RelationIndex::build(&graph);
        assert_eq!(index.related_ids(&graph, "b"), ["a", "c"]);
        assert_eq!(index.related_ids(&graph, "a"), ["b"]);
        assert!(index.related_ids(&graph, "nope").is_empty());
    }

    #[test]
    fn touching_edges_include_both_directions() {
        let graph = graph();
        let index = RelationIndex::build(&graph);
        let labels = index
            .edges_touching_id(&graph, "a")
            .iter()
            .map(|edge| edge.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["ab", "ba"]);
    }
}
