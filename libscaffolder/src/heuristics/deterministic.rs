//! Best-first path discovery with a single-step backtrack, run once per (anchor, first
//! edge) pair for breadth rather than Monte-Carlo's depth.
use log::debug;

use crate::graph::{EdgeId, Graph, NodeId};
use crate::metric::Metric;
use crate::path::Path;

/// Runs the deterministic heuristic once per (anchor, first outgoing edge) pair.
pub fn build_deterministic(graph: &Graph, metric: Metric) -> Vec<Path> {
    let mut paths = Vec::new();
    let mut attempts = 0usize;

    for start in graph.anchors().map(|n| n.id).collect::<Vec<NodeId>>() {
        for &first_edge in graph.node(start).adjacency() {
            if graph.edge(first_edge).q_id == start {
                continue;
            }
            attempts += 1;
            if let Some((nodes, edges)) = walk(graph, start, first_edge, metric) {
                paths.push(Path::new(graph, nodes, edges));
            }
        }
    }

    debug!(
        "deterministic: {} paths discovered from {attempts} (anchor, first edge) attempts",
        paths.len()
    );
    paths
}

fn walk(
    graph: &Graph,
    start: NodeId,
    first_edge: EdgeId,
    metric: Metric,
) -> Option<(Vec<NodeId>, Vec<EdgeId>)> {
    let first_target = graph.edge(first_edge).q_id;
    let mut nodes = vec![start, first_target];
    let mut edges = vec![first_edge];

    if graph.node(first_target).is_anchor {
        return Some((nodes, edges));
    }

    let mut skip_n_best = 0usize;
    let mut backtracked = false;
    let mut step_index = 0usize;

    loop {
        let current = *nodes.last().unwrap();
        let mut candidates: Vec<EdgeId> = graph.node(current).adjacency().to_vec();
        candidates.sort_by(|&a, &b| {
            metric
                .value(graph.edge(b))
                .partial_cmp(&metric.value(graph.edge(a)))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let unvisited: Vec<EdgeId> = candidates
            .into_iter()
            .filter(|&eid| !nodes.contains(&graph.edge(eid).q_id))
            .collect();

        if skip_n_best < unvisited.len() {
            let eid = unvisited[skip_n_best];
            let next = graph.edge(eid).q_id;
            nodes.push(next);
            edges.push(eid);

            if graph.node(next).is_anchor {
                return Some((nodes, edges));
            }
            skip_n_best = 0;
            step_index += 1;
        } else if step_index == 0 || backtracked {
            return None;
        } else {
            nodes.pop();
            edges.pop();
            skip_n_best += 1;
            backtracked = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn push_node(graph: &mut Graph, name: &str, is_anchor: bool) -> NodeId {
        let id = graph.nodes.len();
        graph.nodes.push(Node {
            id,
            name: name.into(),
            length: 1000,
            is_anchor,
            adjacency: vec![],
        });
        id
    }

    fn push_edge(graph: &mut Graph, t_id: NodeId, q_id: NodeId, score: f64) -> EdgeId {
        let id = graph.edges.len();
        graph.edges.push(Edge {
            id,
            t_id,
            q_id,
            t_start: 0,
            t_end: 100,
            q_start: 0,
            q_end: 100,
            relative_strand: false,
            overlap_score: score,
            sequence_identity: 1.0,
            extension_score: score,
        });
        graph.nodes[t_id].adjacency.push(id);
        id
    }

    #[test]
    fn line_graph_yields_one_path_per_anchor() {
        // A -> r1 -> B
        let mut graph = Graph::default();
        let a = push_node(&mut graph, "A", true);
        let r1 = push_node(&mut graph, "r1", false);
        let b = push_node(&mut graph, "B", true);
        push_edge(&mut graph, a, r1, 1.0);
        push_edge(&mut graph, r1, b, 1.0);

        let paths = build_deterministic(&graph, Metric::OverlapScore);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes(), &[a, r1, b]);
    }

    #[test]
    fn dead_end_with_no_alternative_is_dropped() {
        // A -> r1 -> (nothing)
        let mut graph = Graph::default();
        let a = push_node(&mut graph, "A", true);
        let r1 = push_node(&mut graph, "r1", false);
        push_edge(&mut graph, a, r1, 1.0);

        let paths = build_deterministic(&graph, Metric::OverlapScore);
        assert!(paths.is_empty());
    }

    #[test]
    fn single_backtrack_recovers_via_second_best_edge() {
        // A -> r1 -> r2 -> (dead end)
        //        \-> r3 -> B
        // Best edge from r1 leads to the dead-end r2; the single backtrack must recover
        // by trying r1's second-best edge into r3, which reaches anchor B.
        let mut graph = Graph::default();
        let a = push_node(&mut graph, "A", true);
        let r1 = push_node(&mut graph, "r1", false);
        let r2 = push_node(&mut graph, "r2", false);
        let r3 = push_node(&mut graph, "r3", false);
        let b = push_node(&mut graph, "B", true);

        push_edge(&mut graph, a, r1, 1.0);
        push_edge(&mut graph, r1, r2, 10.0); // best, but dead end
        push_edge(&mut graph, r1, r3, 5.0); // second best, reaches B
        push_edge(&mut graph, r3, b, 1.0);

        let paths = build_deterministic(&graph, Metric::OverlapScore);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes(), &[a, r1, r3, b]);
    }

    #[test]
    fn a_second_dead_end_after_the_single_backtrack_drops_the_path() {
        let mut graph = Graph::default();
        let a = push_node(&mut graph, "A", true);
        let r1 = push_node(&mut graph, "r1", false);
        let r2 = push_node(&mut graph, "r2", false);
        let r3 = push_node(&mut graph, "r3", false);

        push_edge(&mut graph, a, r1, 1.0);
        push_edge(&mut graph, r1, r2, 10.0); // dead end
        push_edge(&mut graph, r1, r3, 5.0); // also a dead end

        let paths = build_deterministic(&graph, Metric::OverlapScore);
        assert!(paths.is_empty());
    }
}
