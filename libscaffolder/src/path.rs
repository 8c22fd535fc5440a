//! A discovered anchor-to-anchor path through the overlap graph.
use crate::graph::{EdgeId, Graph, NodeId};

/// An alternating `n0, e0, n1, e1, ..., e_{k-1}, nk` walk where `n0` and `nk` are anchors
/// and every intermediate node is a read. Node and edge ids are stable indices into the
/// [`Graph`] the path was built from; the path itself borrows nothing and outlives it.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    length: i64,
}

impl Path {
    /// Builds a path from its node/edge index sequence, computing and caching its length.
    ///
    /// `nodes.len()` must equal `edges.len() + 1`; this is an invariant enforced by every
    /// producer of paths (the heuristics), not re-validated here.
    pub fn new(graph: &Graph, nodes: Vec<NodeId>, edges: Vec<EdgeId>) -> Self {
        let length = compute_length(graph, &nodes, &edges);
        Path {
            nodes,
            edges,
            length,
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Cached length in base pairs; equal to recomputing via [`Path::recompute_length`].
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeId {
        *self.nodes.last().expect("path has at least one node")
    }

    /// Recomputes the length from `graph`, for use in tests asserting the cache is correct.
    pub fn recompute_length(&self, graph: &Graph) -> i64 {
        compute_length(graph, &self.nodes, &self.edges)
    }

    /// Equality used by [`crate::registry::PathRegistry::dedupe`]: same node-id sequence,
    /// regardless of cached length (which is a pure function of it) or edges.
    pub fn same_nodes(&self, other: &Path) -> bool {
        self.nodes == other.nodes
    }
}

fn compute_length(graph: &Graph, nodes: &[NodeId], edges: &[EdgeId]) -> i64 {
    if edges.is_empty() {
        return 0;
    }

    let first = graph.edge(edges[0]);
    let mut length = first.t_end;
    for i in 1..edges.len() {
        let prev = graph.edge(edges[i - 1]);
        let cur = graph.edge(edges[i]);
        length += cur.t_end - prev.q_end;
    }
    let last = graph.edge(*edges.last().unwrap());
    length += graph.node(*nodes.last().unwrap()).length - last.q_end;
    length
}
