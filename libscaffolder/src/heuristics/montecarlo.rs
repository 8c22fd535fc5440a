//! Randomized weighted-walk path discovery, with anchor short-circuiting and bounded
//! rebuild/backtrack budgets.
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::{EdgeId, Graph, NodeId};
use crate::metric::Metric;
use crate::path::Path;

/// Budgets governing a single Monte-Carlo invocation.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloParams {
    /// Outer retries per start anchor.
    pub rebuild_attempts: usize,
    /// Backtrack pops allowed per walk.
    pub backtrack_attempts: usize,
    /// Abort a walk once its node count reaches this.
    pub node_num_threshold: usize,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        MonteCarloParams {
            rebuild_attempts: 500,
            backtrack_attempts: 30,
            node_num_threshold: 50,
        }
    }
}

/// Runs the Monte-Carlo heuristic from every anchor in `graph`.
///
/// Deterministic given a fixed `seed`: two invocations with identical graph, `metric` and
/// `seed` produce identical path vectors in identical order, since all randomness funnels
/// through the single [`StdRng`] seeded here.
pub fn build_monte_carlo(
    graph: &Graph,
    metric: Metric,
    params: MonteCarloParams,
    seed: u64,
) -> Vec<Path> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut paths = Vec::new();

    let anchors: Vec<NodeId> = graph.anchors().map(|n| n.id).collect();
    debug!(
        "monte-carlo: {} anchors, {} rebuild attempts each, seed={seed}",
        anchors.len(),
        params.rebuild_attempts
    );
    for start in anchors {
        let mut accepted = 0usize;
        for _ in 0..params.rebuild_attempts {
            if let Some((nodes, edges)) = walk(graph, start, metric, &params, &mut rng) {
                accepted += 1;
                paths.push(Path::new(graph, nodes, edges));
            }
        }
        trace!("monte-carlo: anchor {start} accepted {accepted} walks");
    }

    debug!("monte-carlo: {} paths discovered", paths.len());
    paths
}

fn walk(
    graph: &Graph,
    start: NodeId,
    metric: Metric,
    params: &MonteCarloParams,
    rng: &mut StdRng,
) -> Option<(Vec<NodeId>, Vec<EdgeId>)> {
    let mut nodes = vec![start];
    let mut edges: Vec<EdgeId> = Vec::new();
    let mut tried: std::collections::HashSet<EdgeId> = std::collections::HashSet::new();
    let mut backtracks_left = params.backtrack_attempts;

    loop {
        let current = *nodes.last().unwrap();
        let adjacency = graph.node(current).adjacency();

        let anchor_short_circuit = adjacency.iter().copied().find(|&eid| {
            if tried.contains(&eid) {
                return false;
            }
            let e = graph.edge(eid);
            !nodes.contains(&e.q_id) && e.q_id != start && graph.node(e.q_id).is_anchor
        });

        let chosen = match anchor_short_circuit {
            Some(eid) => Some(eid),
            None => sample_edge(graph, adjacency, &nodes, &tried, metric, rng),
        };

        match chosen {
            Some(eid) => {
                let next = graph.edge(eid).q_id;
                nodes.push(next);
                edges.push(eid);

                if graph.node(next).is_anchor {
                    return Some((nodes, edges));
                }
                if nodes.len() >= params.node_num_threshold {
                    return None;
                }
            }
            None => {
                if !backtrack(graph, &mut nodes, &mut edges, &mut tried, &mut backtracks_left) {
                    return None;
                }
            }
        }
    }
}

/// Samples one edge from `adjacency` whose query side is not yet in `nodes` and has not
/// already been given up on, with probability proportional to `metric`. Returns `None`
/// when no such edge exists or the candidate weights sum to zero.
fn sample_edge(
    graph: &Graph,
    adjacency: &[EdgeId],
    nodes: &[NodeId],
    tried: &std::collections::HashSet<EdgeId>,
    metric: Metric,
    rng: &mut StdRng,
) -> Option<EdgeId> {
    let candidates: Vec<EdgeId> = adjacency
        .iter()
        .copied()
        .filter(|eid| !tried.contains(eid) && !nodes.contains(&graph.edge(*eid).q_id))
        .collect();

    let total: f64 = candidates.iter().map(|&eid| metric.value(graph.edge(eid))).sum();
    if candidates.is_empty() || total <= 0.0 {
        return None;
    }

    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for &eid in &candidates {
        cumulative += metric.value(graph.edge(eid));
        if draw < cumulative {
            return Some(eid);
        }
    }
    candidates.last().copied()
}

/// Pops node/edge pairs until the new tail has a viable unvisited, untried edge, or the
/// budget/path is exhausted. Returns `false` when the walk must be abandoned.
fn backtrack(
    graph: &Graph,
    nodes: &mut Vec<NodeId>,
    edges: &mut Vec<EdgeId>,
    tried: &mut std::collections::HashSet<EdgeId>,
    backtracks_left: &mut usize,
) -> bool {
    loop {
        if nodes.len() <= 1 || *backtracks_left == 0 {
            return false;
        }
        let popped = edges.pop().unwrap();
        nodes.pop();
        tried.insert(popped);
        *backtracks_left -= 1;

        let tail = *nodes.last().unwrap();
        let has_option = graph.node(tail).adjacency().iter().any(|eid| {
            !tried.contains(eid) && !nodes.contains(&graph.edge(*eid).q_id)
        });
        if has_option {
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    // A -> B (anchors), directly connected, plus many high-score edges A -> reads that
    // dead-end. The anchor short-circuit must win regardless of weight.
    fn graph_with_anchor_shortcut() -> Graph {
        let mut graph = Graph::default();
        graph.nodes.push(Node {
            id: 0,
            name: "A".into(),
            length: 1000,
            is_anchor: true,
            adjacency: vec![],
        });
        graph.nodes.push(Node {
            id: 1,
            name: "B".into(),
            length: 1000,
            is_anchor: true,
            adjacency: vec![],
        });
        for i in 0..3 {
            graph.nodes.push(Node {
                id: 2 + i,
                name: format!("read.{i}"),
                length: 1000,
                is_anchor: false,
                adjacency: vec![],
            });
        }

        let mut push_edge = |t_id: NodeId, q_id: NodeId, score: f64| {
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
        };

        push_edge(0, 1, 1.0); // A -> B direct, low score
        push_edge(0, 2, 1000.0); // A -> read.0, very high score, dead end
        push_edge(0, 3, 1000.0); // A -> read.1, very high score, dead end
        push_edge(0, 4, 1000.0); // A -> read.2, very high score, dead end

        graph
    }

    #[test]
    fn anchor_short_circuit_wins_over_higher_weighted_dead_ends() {
        let graph = graph_with_anchor_shortcut();
        let params = MonteCarloParams {
            rebuild_attempts: 10,
            backtrack_attempts: 5,
            node_num_threshold: 10,
        };
        let paths = build_monte_carlo(&graph, Metric::OverlapScore, params, 42);

        assert!(!paths.is_empty());
        for path in &paths {
            assert_eq!(path.nodes(), &[0, 1]);
        }
    }

    #[test]
    fn deterministic_given_fixed_seed() {
        let graph = graph_with_anchor_shortcut();
        let params = MonteCarloParams::default();
        let run1 = build_monte_carlo(&graph, Metric::OverlapScore, params, 42);
        let run2 = build_monte_carlo(&graph, Metric::OverlapScore, params, 42);
        assert_eq!(run1, run2);
    }

    #[test]
    fn dead_end_with_no_backtrack_budget_drops_the_walk() {
        let mut graph = Graph::default();
        graph.nodes.push(Node {
            id: 0,
            name: "A".into(),
            length: 1000,
            is_anchor: true,
            adjacency: vec![],
        });
        graph.nodes.push(Node {
            id: 1,
            name: "r1".into(),
            length: 1000,
            is_anchor: false,
            adjacency: vec![],
        });
        graph.edges.push(Edge {
            id: 0,
            t_id: 0,
            q_id: 1,
            t_start: 0,
            t_end: 100,
            q_start: 0,
            q_end: 100,
            relative_strand: false,
            overlap_score: 1.0,
            sequence_identity: 1.0,
            extension_score: 1.0,
        });
        graph.nodes[0].adjacency.push(0);

        let params = MonteCarloParams {
            rebuild_attempts: 5,
            backtrack_attempts: 0,
            node_num_threshold: 10,
        };
        let paths = build_monte_carlo(&graph, Metric::OverlapScore, params, 42);
        assert!(paths.is_empty());
    }
}
