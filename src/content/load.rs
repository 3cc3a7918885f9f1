use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::graph::RelationGraph;
use super::parse::parse_content_document;

const BUNDLED_CONTENT: &str = include_str!("../../assets/demo_graph.json");

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    Bundled,
    File(PathBuf),
}

impl ContentSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled demo".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn load_relation_graph(
    source: &ContentSource,
    anchor_override: Option<&str>,
) -> Result<RelationGraph> {
    let raw = match source {
        ContentSource::Bundled => BUNDLED_CONTENT.to_owned(),
        ContentSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read content from {}", path.display()))?,
    };

    let graph = parse_content_document(&raw, anchor_override)
        .with_context(|| format!("failed to parse content from {}", source.describe()))?;

    tracing::info!(
        source = %source.describe(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        anchor = %graph.anchor_id,
        "loaded relation graph"
    );

    Ok(graph)
}
