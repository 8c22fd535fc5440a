//! Loads FASTA/FASTQ sequences and stitches a chosen consensus path into one assembled
//! record. Coordinate-driven concatenation only: no sequence-level alignment or polishing.
use std::collections::HashMap;
use std::path::Path as FsPath;

use needletail::parse_fastx_file;

use crate::error::{Result, ScaffoldError};
use crate::graph::Graph;
use crate::path::Path;

/// Sequences keyed by record name, as loaded from a FASTA/FASTQ file.
pub struct SequenceStore {
    sequences: HashMap<String, Vec<u8>>,
}

impl SequenceStore {
    /// Loads every record in `path`, keyed by the first whitespace-delimited token of its
    /// header line (the read/contig name, ignoring any trailing comment).
    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        let mut reader = parse_fastx_file(path.as_ref())
            .map_err(|e| ScaffoldError::SeqParseError(e.to_string()))?;

        let mut sequences = HashMap::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| ScaffoldError::SeqParseError(e.to_string()))?;
            let name = record
                .id()
                .split(|&b| b.is_ascii_whitespace())
                .next()
                .unwrap_or(record.id());
            sequences.insert(
                String::from_utf8_lossy(name).into_owned(),
                record.seq().into_owned(),
            );
        }
        Ok(SequenceStore { sequences })
    }

    /// Folds another store's records into this one, later loads winning on a name clash.
    pub fn merge(&mut self, other: SequenceStore) {
        self.sequences.extend(other.sequences);
    }

    fn get(&self, name: &str) -> Result<&[u8]> {
        self.sequences
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| ScaffoldError::MissingSequence(name.to_string()))
    }
}

/// Concatenates the sequence segments implied by `path`'s coordinates into one assembled
/// record, reverse-complementing segments whose edge has `relative_strand` set.
///
/// A degenerate single-node path (no edges) returns that node's whole sequence.
pub fn stitch(graph: &Graph, path: &Path, sequences: &SequenceStore) -> Result<Vec<u8>> {
    let nodes = path.nodes();
    let edges = path.edges();

    if edges.is_empty() {
        let name = &graph.node(nodes[0]).name;
        return Ok(sequences.get(name)?.to_vec());
    }

    let mut assembled = Vec::new();

    let first = graph.node(nodes[0]);
    let first_seq = sequences.get(&first.name)?;
    let e0 = graph.edge(edges[0]);
    assembled.extend_from_slice(&first_seq[..e0.t_end as usize]);

    for i in 1..edges.len() {
        let prev_edge = graph.edge(edges[i - 1]);
        let cur_edge = graph.edge(edges[i]);
        let node = graph.node(nodes[i]);
        let seq = sequences.get(&node.name)?;

        let start = prev_edge.q_end as usize;
        let end = cur_edge.t_end as usize;
        if start >= end {
            continue;
        }

        let mut segment = seq[start..end].to_vec();
        if prev_edge.relative_strand {
            reverse_complement(&mut segment);
        }
        assembled.extend_from_slice(&segment);
    }

    let last_edge = graph.edge(*edges.last().unwrap());
    let last_node = graph.node(*nodes.last().unwrap());
    let last_seq = sequences.get(&last_node.name)?;
    let mut tail = last_seq[last_edge.q_end as usize..].to_vec();
    if last_edge.relative_strand {
        reverse_complement(&mut tail);
    }
    assembled.extend_from_slice(&tail);

    Ok(assembled)
}

fn reverse_complement(seq: &mut [u8]) {
    seq.reverse();
    for base in seq.iter_mut() {
        *base = match base.to_ascii_uppercase() {
            b'A' => b'T',
            b'T' => b'A',
            b'G' => b'C',
            b'C' => b'G',
            other => other,
        };
    }
}
