use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Person,
    Place,
    Faction,
    Artifact,
    Event,
    Concept,
    #[default]
    #[serde(other)]
    Other,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        Self::Person,
        Self::Place,
        Self::Faction,
        Self::Artifact,
        Self::Event,
        Self::Concept,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
            Self::Faction => "faction",
            Self::Artifact => "artifact",
            Self::Event => "event",
            Self::Concept => "concept",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Calm,
    Bright,
    Warn,
}

/// Position in percent of the canvas; both axes lie in `[0, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPos {
    pub x: f32,
    pub y: f32,
}

impl CanvasPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn clamped(self) -> Self {
        let clamp = |value: f32| {
            if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                50.0
            }
        };
        Self {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
    pub tone: Tone,
    pub pos: CanvasPos,
    pub summary: String,
    pub detail: String,
    pub doc: Option<String>,
    pub event: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
}

impl EdgeRecord {
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(self.to.as_str())
        } else if self.to == id {
            Some(self.from.as_str())
        } else {
            None
        }
    }
}

/// Immutable node and edge lists plus the anchor every root path leads to.
#[derive(Clone, Debug)]
pub struct RelationGraph {
    pub anchor_id: String,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    node_index: HashMap<String, usize>,
}

impl RelationGraph {
    /// Builds the graph and assigns stable edge ids. The first node with a
    /// given id wins; later duplicates are dropped.
    pub fn new(
        anchor_id: impl Into<String>,
        nodes: Vec<NodeRecord>,
        edges: Vec<(String, String, String)>,
    ) -> Self {
        let mut node_index = HashMap::with_capacity(nodes.len());
        let mut unique_nodes = Vec::with_capacity(nodes.len());
        for mut node in nodes {
            if node_index.contains_key(&node.id) {
                tracing::debug!(id = %node.id, "dropping duplicate node id");
                continue;
            }
            node.pos = node.pos.clamped();
            node_index.insert(node.id.clone(), unique_nodes.len());
            unique_nodes.push(node);
        }

        let mut pair_counts: HashMap<(String, String), usize> = HashMap::new();
        let edges = edges
            .into_iter()
            .map(|(from, to, label)| {
                let count = pair_counts.entry((from.clone(), to.clone())).or_insert(0);
                *count += 1;
                EdgeRecord {
                    id: edge_id(&from, &to, *count),
                    from,
                    to,
                    label,
                }
            })
            .collect();

        let mut anchor_id = anchor_id.into();
        if !node_index.contains_key(&anchor_id)
            && let Some(first) = unique_nodes.first()
        {
            tracing::warn!(
                requested = %anchor_id,
                fallback = %first.id,
                "anchor id not present in content, using first node"
            );
            anchor_id = first.id.clone();
        }

        Self {
            anchor_id,
            nodes: unique_nodes,
            edges,
            node_index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&NodeRecord> {
        self.node_index.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn kinds_present(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .filter(|kind| self.nodes.iter().any(|node| node.kind == *kind))
            .collect()
    }
}

pub fn edge_id(from: &str, to: &str, occurrence: usize) -> String {
    if occurrence <= 1 {
        format!("{from}->{to}")
    } else {
        format!("{from}->{to}#{occurrence}")
    }
}

#[cfg(test)]
pub(crate) fn test_node(id: &str, x: f32, y: f32) -> NodeRecord {
    NodeRecord {
        id: id.to_owned(),
        title: id.to_owned(),
        kind: NodeKind::Person,
        tone: Tone::Calm,
        pos: CanvasPos::new(x, y),
        summary: String::new(),
        detail: String::new(),
        doc: None,
        event: None,
        keywords: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str) -> (String, String, String) {
        (from.to_owned(), to.to_owned(), String::new())
    }

    #[test]
    fn repeated_pairs_get_distinct_stable_ids() {
        let graph = RelationGraph::new(
            "a",
            vec![test_node("a", 10.0, 10.0), test_node("b", 20.0, 20.0)],
            vec![edge("a", "b"), edge("b", "a"), edge("a", "b")],
        );

        let ids = graph.edges.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["a->b", "b->a", "a->b#2"]);
    }

    #[test]
    fn missing_anchor_falls_back_to_first_node() {
        let graph = RelationGraph::new("ghost", vec![test_node("a", 1.0, 1.0)], Vec::new());
        assert_eq!(graph.anchor_id, "a");
    }

    #[test]
    fn positions_are_clamped_into_canvas() {
        let graph = RelationGraph::new(
            "a",
            vec![test_node("a", -5.0, 140.0), test_node("b", f32::NAN, 3.0)],
            Vec::new(),
        );
        assert_eq!(graph.nodes[0].pos, CanvasPos::new(0.0, 100.0));
        assert_eq!(graph.nodes[1].pos, CanvasPos::new(50.0, 3.0));
    }

    #[test]
    fn duplicate_node_ids_keep_the_first() {
        let mut second = test_node("a", 90.0, 90.0);
        second.title = "second".to_owned();
        let graph = RelationGraph::new("a", vec![test_node("a", 1.0, 1.0), second], Vec::new());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node_by_id("a").map(|n| n.title.as_str()), Some("a"));
    }
}
