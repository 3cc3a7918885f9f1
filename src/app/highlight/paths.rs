use std::collections::VecDeque;

use super::super::graph::RelationIndex;

/// Unweighted shortest path from `from` to `to`, both endpoints included.
///
/// Neighbors are expanded in edge order and a node keeps the predecessor
/// that discovered it first, so among equally short paths the one leaving
/// `from` through the earliest edge wins.
pub fn shortest_path(index: &RelationIndex, from: usize, to: usize) -> Vec<usize> {
    let node_count = index.node_count();
    if from >= node_count || to >= node_count {
        return Vec::new();
    }

    if from == to {
        return vec![from];
    }

    let mut queue = VecDeque::from([from]);
    let mut visited = vec![false; node_count];
    let mut parent = vec![usize::MAX; node_count];
    visited[from] = true;

    while let Some(node) = queue.pop_front() {
        if node == to {
            break;
        }

        for &next in index.neighbors(node) {
            if !visited[next] {
                visited[next] = true;
                parent[next] = node;
                queue.push_back(next);
            }
        }
    }

    if !visited[to] {
        return Vec::new();
    }

    let mut path = vec![to];
    let mut cursor = to;
    while cursor != from {
        let prev = parent[cursor];
        if prev == usize::MAX {
            return Vec::new();
        }
        path.push(prev);
        cursor = prev;
    }

    path.reverse();
    path
}

pub fn shortest_path_to_anchor(index: &RelationIndex, from: usize) -> Vec<usize> {
    match index.anchor() {
        Some(anchor) => shortest_path(index, from, anchor),
        None => Vec::new(),
    }
}

/// Id-level wrapper; an empty or unknown `from` yields an empty path.
pub fn shortest_path_ids(index: &RelationIndex, ids: &[&str], from: &str, to: &str) -> Vec<String> {
    if from.is_empty() {
        return Vec::new();
    }

    let (Some(from), Some(to)) = (index.node_index(from), index.node_index(to)) else {
        return Vec::new();
    };

    shortest_path(index, from, to)
        .into_iter()
        .filter_map(|node| ids.get(node).map(|id| (*id).to_owned()))
        .collect()
}
