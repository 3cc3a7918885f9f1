use std::collections::HashSet;

use super::super::graph::RelationIndex;

/// One-hop neighborhood of `spotlight`, and that neighborhood plus the
/// spotlight itself and the anchor.
pub(super) fn collect_cluster(
    index: &RelationIndex,
    spotlight: usize,
) -> (HashSet<usize>, HashSet<usize>) {
    let related = index
        .related(spotlight)
        .into_iter()
        .collect::<HashSet<_>>();

    let mut cluster = related.clone();
    cluster.insert(spotlight);
    if let Some(anchor) = index.anchor() {
        cluster.insert(anchor);
    }

    (related, cluster)
}

/// Unordered node pairs joined by consecutive root-path entries.
pub(super) fn collect_path_pairs(path: &[usize]) -> HashSet<(usize, usize)> {
    path.windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(ordered_pair(*a, *b)),
            _ => None,
        })
        .collect()
}

pub(super) fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
