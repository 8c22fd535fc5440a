//! Owns every path discovered by the heuristics; dedupes and indexes them by anchor pair.
use std::collections::BTreeMap;

use log::debug;

use crate::graph::NodeId;
use crate::path::Path;

/// The index of a [`Path`] within a [`PathRegistry`].
pub type PathRef = usize;

/// Owns the full set of discovered paths. Groups and the per-anchor-pair index never copy
/// a path; they hold [`PathRef`]s into this registry instead.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: Vec<Path>,
}

impl PathRegistry {
    pub fn new() -> Self {
        PathRegistry { paths: Vec::new() }
    }

    pub fn extend(&mut self, paths: impl IntoIterator<Item = Path>) {
        self.paths.extend(paths);
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn get(&self, idx: PathRef) -> &Path {
        &self.paths[idx]
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Removes adjacent duplicate paths (same node-id sequence). Intentionally not a
    /// full-set dedupe: this preserves discovery order and only collapses bursts produced
    /// by the same heuristic invocation, which is what downstream grouping assumes.
    pub fn dedupe(&mut self) {
        let before = self.paths.len();
        self.paths.dedup_by(|a, b| a.same_nodes(b));
        debug!(
            "registry: deduped {before} paths down to {}",
            self.paths.len()
        );
    }

    /// Groups paths by `(start anchor, end anchor)`. A `BTreeMap` keeps the pair ordering
    /// (and each pair's path order) independent of hashing.
    pub fn paths_between_anchors(&self) -> BTreeMap<(NodeId, NodeId), Vec<PathRef>> {
        let mut map: BTreeMap<(NodeId, NodeId), Vec<PathRef>> = BTreeMap::new();
        for (idx, path) in self.paths.iter().enumerate() {
            map.entry((path.start(), path.end())).or_default().push(idx);
        }
        map
    }
}
