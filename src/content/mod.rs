mod graph;
mod load;
mod parse;
mod snapshot;

#[cfg(test)]
pub(crate) use graph::test_node;
pub use graph::{CanvasPos, EdgeRecord, NodeKind, NodeRecord, RelationGraph, Tone, edge_id};
pub use load::{ContentSource, load_relation_graph};
pub use snapshot::{JsonFileStore, SelectionSnapshot, SnapshotStore};
