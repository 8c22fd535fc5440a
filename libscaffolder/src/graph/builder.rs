//! Construction of a [`Graph`] from filtered PAF overlap records.
use std::collections::HashMap;

use log::{debug, trace};

use crate::error::Result;
use crate::paf::PafRecord;

use super::{AggregationMode, Edge, FilterParams, Graph, Node, NodeId};

/// Incrementally builds a [`Graph`] from one or more streams of [`PafRecord`]s.
///
/// Call [`Builder::ingest`] once per input source (typically once for read-read overlaps
/// and once for contig-read overlaps), then [`Builder::build`] to obtain the finished
/// graph. Nodes are looked up by name in a hash map rather than the tail-first linear
/// scan of the source this was modelled on; the resulting graph is identical.
///
/// # Examples
///
/// ```no_run
/// use libscaffolder::graph::{Builder, FilterParams};
/// use libscaffolder::paf::PafReader;
///
/// let reads = PafReader::open("reads.paf")?;
/// let contigs = PafReader::open("contigs.paf")?;
///
/// let graph = Builder::new(FilterParams::default())
///     .ingest(reads, false)?
///     .ingest(contigs, true)?
///     .build();
/// # Ok::<(), libscaffolder::error::ScaffoldError>(())
/// ```
pub struct Builder {
    params: FilterParams,
    names: HashMap<String, NodeId>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Builder {
    pub fn new(params: FilterParams) -> Self {
        Builder {
            params,
            names: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Ingests every record from `records`, filtering and inserting nodes/edges as it goes.
    ///
    /// When `anchors` is true, a side becomes an anchor iff its sequence name begins
    /// (case-insensitively) with `"ctg"`; a node already marked anchor by an earlier
    /// record stays an anchor. Returns on the first I/O or parse error from `records`.
    pub fn ingest<I>(mut self, records: I, anchors: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Result<PafRecord>>,
    {
        let mut kept = 0usize;
        let mut rejected = 0usize;
        for record in records {
            let record = record?;
            if self.accepts(&record) {
                self.insert(&record, anchors);
                kept += 1;
            } else {
                trace!(
                    "rejected overlap {} vs {} by filter",
                    record.query_name, record.target_name
                );
                rejected += 1;
            }
        }
        debug!(
            "ingested {kept} overlaps ({rejected} rejected by filter), anchors={anchors}"
        );
        Ok(self)
    }

    pub fn build(self) -> Graph {
        debug!(
            "built graph: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    fn accepts(&self, r: &PafRecord) -> bool {
        if r.query_name == r.target_name {
            return false;
        }

        let query_overlap = (r.query_end - r.query_start) as f64;
        let target_overlap = (r.target_end - r.target_start) as f64;
        let query_overhang = (r.query_len - r.query_end) as f64;
        let target_overhang = r.target_start as f64;

        let mode = self.params.mode;
        let overlap_len = mode.combine(query_overlap, target_overlap);
        let overhang_len = mode.combine(query_overhang, target_overhang);
        let total_len = mode.combine(r.query_len as f64, r.target_len as f64);

        if overlap_len < self.params.min_overlap_len as f64 {
            return false;
        }
        if total_len > 0.0 && overlap_len / total_len < self.params.min_overlap_frac {
            return false;
        }
        if overhang_len > self.params.max_overhang_len as f64 {
            return false;
        }
        if overlap_len > 0.0 && overhang_len / overlap_len > self.params.max_overhang_frac {
            return false;
        }

        true
    }

    fn insert(&mut self, r: &PafRecord, anchors: bool) {
        let is_anchor_q = anchors && starts_with_ctg(&r.query_name);
        let is_anchor_t = anchors && starts_with_ctg(&r.target_name);

        let q_id = self.node_id(&r.query_name, r.query_len, is_anchor_q);
        let t_id = self.node_id(&r.target_name, r.target_len, is_anchor_t);

        let query_overlap = (r.query_end - r.query_start) as f64;
        let target_overlap = (r.target_end - r.target_start) as f64;
        let query_overhang = (r.query_len - r.query_end) as f64;
        let target_overhang = r.target_start as f64;
        let query_extension = r.query_start as f64;

        let sequence_identity =
            r.residue_matches as f64 / r.query_len.min(r.target_len) as f64;
        let overlap_score = (query_overlap + target_overlap) / 2.0 * sequence_identity;
        let extension_score = (overlap_score + query_extension / 2.0
            - (query_overhang + target_overhang) / 2.0)
            .abs();

        let id = self.edges.len();
        self.edges.push(Edge {
            id,
            q_id,
            t_id,
            q_start: r.query_start,
            q_end: r.query_end,
            t_start: r.target_start,
            t_end: r.target_end,
            relative_strand: r.strand == '-',
            overlap_score,
            sequence_identity,
            extension_score,
        });
        self.nodes[t_id].adjacency.push(id);
    }

    fn node_id(&mut self, name: &str, length: i64, is_anchor: bool) -> NodeId {
        if let Some(&id) = self.names.get(name) {
            self.nodes[id].is_anchor |= is_anchor;
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            name: name.to_string(),
            length,
            is_anchor,
            adjacency: Vec::new(),
        });
        self.names.insert(name.to_string(), id);
        id
    }
}

fn starts_with_ctg(name: &str) -> bool {
    name.len() >= 3 && name.as_bytes()[..3].eq_ignore_ascii_case(b"ctg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paf::PafRecord;

    fn rec(q: &str, t: &str, strand: char) -> PafRecord {
        PafRecord {
            query_name: q.to_string(),
            query_len: 1000,
            query_start: 100,
            query_end: 900,
            strand,
            target_name: t.to_string(),
            target_len: 1000,
            target_start: 50,
            target_end: 850,
            residue_matches: 750,
            alignment_block_len: 800,
            mapping_quality: 60,
        }
    }

    #[test]
    fn builds_nodes_and_edge_with_target_owned_adjacency() {
        let graph = Builder::new(FilterParams::default())
            .ingest(vec![Ok(rec("r1", "r2", '+'))], false)
            .unwrap()
            .build();

        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 1);

        let edge = &graph.edges()[0];
        let t_node = graph.node(edge.t_id);
        assert_eq!(t_node.adjacency(), &[0]);
        let q_node = graph.node(edge.q_id);
        assert!(q_node.adjacency().is_empty());
    }

    #[test]
    fn self_overlap_is_rejected() {
        let graph = Builder::new(FilterParams::default())
            .ingest(vec![Ok(rec("r1", "r1", '+'))], false)
            .unwrap()
            .build();
        assert!(graph.nodes().is_empty());
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn anchor_flag_set_from_ctg_prefix() {
        let graph = Builder::new(FilterParams::default())
            .ingest(vec![Ok(rec("read.1", "ctg1", '+'))], true)
            .unwrap()
            .build();

        let ctg = graph.nodes().iter().find(|n| n.name == "ctg1").unwrap();
        let read = graph.nodes().iter().find(|n| n.name == "read.1").unwrap();
        assert!(ctg.is_anchor);
        assert!(!read.is_anchor);
    }

    #[test]
    fn anchor_flag_is_case_insensitive_and_sticky() {
        let graph = Builder::new(FilterParams::default())
            .ingest(
                vec![Ok(rec("read.1", "CTG7", '+')), Ok(rec("CTG7", "read.2", '+'))],
                true,
            )
            .unwrap()
            .build();

        let ctg = graph.nodes().iter().find(|n| n.name == "CTG7").unwrap();
        assert!(ctg.is_anchor);
    }

    #[test]
    fn min_overlap_len_filter_rejects_short_overlaps() {
        let params = FilterParams {
            min_overlap_len: 10_000,
            ..FilterParams::default()
        };
        let graph = Builder::new(params)
            .ingest(vec![Ok(rec("r1", "r2", '+'))], false)
            .unwrap()
            .build();
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn extension_score_is_never_negative() {
        let graph = Builder::new(FilterParams::default())
            .ingest(vec![Ok(rec("r1", "r2", '-'))], false)
            .unwrap()
            .build();
        assert!(graph.edges()[0].extension_score >= 0.0);
    }
}
