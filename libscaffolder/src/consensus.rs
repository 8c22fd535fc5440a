//! Reduces a set of length-groups (each already carrying its own consensus) down to a
//! single consensus path per anchor pair.
use crate::group::PathGroup;
use crate::registry::{PathRef, PathRegistry};

/// Picks the final consensus path for one anchor pair from its groups.
///
/// Groups without a consensus (see [`PathGroup::compute_consensus`]) are ignored. With
/// zero surviving groups there is no consensus; with one, it wins outright; with two, the
/// longer consensus wins unconditionally; with three or more, longer bridges are
/// preferred unless a shorter one is overwhelmingly better supported (see module-level
/// walk below).
pub fn anchor_pair_consensus(groups: &[PathGroup], registry: &PathRegistry) -> Option<PathRef> {
    let mut with_consensus: Vec<&PathGroup> =
        groups.iter().filter(|g| g.consensus.is_some()).collect();

    match with_consensus.len() {
        0 => None,
        1 => with_consensus[0].consensus,
        2 => {
            with_consensus.sort_by_key(|g| {
                std::cmp::Reverse(registry.get(g.consensus.unwrap()).length())
            });
            with_consensus[0].consensus
        }
        _ => {
            with_consensus.sort_by_key(|g| {
                std::cmp::Reverse(registry.get(g.consensus.unwrap()).length())
            });
            // Walk from longest to shortest; a shorter bridge displaces the current
            // winner only when it has at least double the supporting path count.
            let mut longer = with_consensus[0];
            for shorter in &with_consensus[1..] {
                if 2 * longer.valid_path_count <= shorter.valid_path_count {
                    longer = shorter;
                }
            }
            longer.consensus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Graph, Node};
    use crate::path::Path;
    use std::collections::BTreeMap;

    fn path_of_length(length: i64) -> (Graph, Path) {
        let mut graph = Graph::default();
        graph.nodes.push(Node {
            id: 0,
            name: "A".into(),
            length: 0,
            is_anchor: true,
            adjacency: vec![],
        });
        graph.nodes.push(Node {
            id: 1,
            name: "B".into(),
            length,
            is_anchor: true,
            adjacency: vec![],
        });
        graph.edges.push(Edge {
            id: 0,
            t_id: 0,
            q_id: 1,
            t_start: 0,
            t_end: 0,
            q_start: 0,
            q_end: 0,
            relative_strand: false,
            overlap_score: 1.0,
            sequence_identity: 1.0,
            extension_score: 1.0,
        });
        graph.nodes[0].adjacency.push(0);
        let path = Path::new(&graph, vec![0, 1], vec![0]);
        (graph, path)
    }

    fn group_with_consensus(registry: &mut PathRegistry, length: i64, valid_path_count: usize) -> PathGroup {
        let (_graph, path) = path_of_length(length);
        let idx = registry.len();
        registry.extend([path]);
        PathGroup {
            paths: vec![idx],
            length_freq: BTreeMap::new(),
            consensus: Some(idx),
            valid_path_count,
        }
    }

    #[test]
    fn no_groups_with_consensus_yields_none() {
        let registry = PathRegistry::new();
        let groups: Vec<PathGroup> = vec![PathGroup::default()];
        assert_eq!(anchor_pair_consensus(&groups, &registry), None);
    }

    #[test]
    fn single_group_wins_outright() {
        let mut registry = PathRegistry::new();
        let g = group_with_consensus(&mut registry, 500, 1);
        let consensus_idx = g.consensus;
        let groups = vec![g];
        assert_eq!(anchor_pair_consensus(&groups, &registry), consensus_idx);
    }

    #[test]
    fn two_groups_longer_wins_regardless_of_support() {
        let mut registry = PathRegistry::new();
        let short = group_with_consensus(&mut registry, 500, 100);
        let long = group_with_consensus(&mut registry, 1500, 1);
        let expected = long.consensus;
        let groups = vec![short, long];
        assert_eq!(anchor_pair_consensus(&groups, &registry), expected);
    }

    #[test]
    fn three_or_more_groups_shorter_displaces_when_overwhelmingly_supported() {
        let mut registry = PathRegistry::new();
        let a = group_with_consensus(&mut registry, 3000, 1); // longest, weak support
        let b = group_with_consensus(&mut registry, 2000, 10); // 2*1 <= 10, displaces a
        let c = group_with_consensus(&mut registry, 1000, 5); // 2*10 > 5, does not displace b
        let expected = b.consensus;
        let groups = vec![a, b, c];
        assert_eq!(anchor_pair_consensus(&groups, &registry), expected);
    }

    #[test]
    fn three_or_more_groups_longest_wins_when_well_supported() {
        let mut registry = PathRegistry::new();
        let a = group_with_consensus(&mut registry, 3000, 50);
        let b = group_with_consensus(&mut registry, 2000, 10); // 2*50 > 10, no displacement
        let c = group_with_consensus(&mut registry, 1000, 1);
        let expected = a.consensus;
        let groups = vec![a, b, c];
        assert_eq!(anchor_pair_consensus(&groups, &registry), expected);
    }
}
