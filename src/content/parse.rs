use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::graph::{CanvasPos, NodeKind, NodeRecord, RelationGraph, Tone};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawDocument {
    #[serde(default)]
    pub(super) anchor: Option<String>,
    #[serde(default)]
    pub(super) nodes: Vec<RawNode>,
    #[serde(default)]
    pub(super) edges: Vec<RawEdge>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) id: String,
    #[serde(default)]
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) kind: NodeKind,
    #[serde(default)]
    pub(super) tone: Tone,
    #[serde(default)]
    pub(super) pos: CanvasPos,
    #[serde(default)]
    pub(super) summary: String,
    #[serde(default)]
    pub(super) detail: String,
    #[serde(default)]
    pub(super) doc: Option<String>,
    #[serde(default)]
    pub(super) event: Option<String>,
    #[serde(default)]
    pub(super) keywords: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawEdge {
    pub(super) from: String,
    pub(super) to: String,
    #[serde(default)]
    pub(super) label: String,
}

pub(super) fn parse_content_document(raw: &str, anchor_override: Option<&str>) -> Result<RelationGraph> {
    let document: RawDocument =
        serde_json::from_str(raw).context("invalid JSON in content document")?;

    if document.nodes.is_empty() {
        return Err(anyhow!("content document contains no nodes"));
    }

    let anchor = anchor_override
        .map(str::to_owned)
        .or(document.anchor)
        .or_else(|| document.nodes.first().map(|node| node.id.clone()))
        .unwrap_or_default();

    let nodes = document
        .nodes
        .into_iter()
        .filter(|node| !node.id.trim().is_empty())
        .map(|node| NodeRecord {
            title: node
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| node.id.clone()),
            id: node.id,
            kind: node.kind,
            tone: node.tone,
            pos: node.pos,
            summary: node.summary,
            detail: node.detail,
            doc: node.doc.filter(|value| !value.is_empty()),
            event: node.event.filter(|value| !value.is_empty()),
            keywords: node.keywords,
        })
        .collect::<Vec<_>>();

    let edges = document
        .edges
        .into_iter()
        .map(|edge| (edge.from, edge.to, edge.label))
        .collect::<Vec<_>>();

    Ok(RelationGraph::new(anchor, nodes, edges))
}
