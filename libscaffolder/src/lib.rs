//! Path discovery, deduplication, grouping and consensus selection over a long-read /
//! contig overlap graph — the core of a genome scaffolding pipeline.
//!
//! A typical run: build a [`graph::Graph`] from PAF overlaps with [`graph::Builder`], run
//! [`heuristics::build_monte_carlo`] and/or [`heuristics::build_deterministic`] from every
//! anchor, hand the resulting paths to a [`registry::PathRegistry`], dedupe, split by
//! anchor pair, group each pair's paths with [`group::construct_groups`], and reduce each
//! anchor pair's groups to one [`consensus::anchor_pair_consensus`] path.
pub mod consensus;
pub mod error;
pub mod graph;
pub mod group;
pub mod heuristics;
pub mod metric;
pub mod paf;
pub mod path;
pub mod registry;
pub mod stitch;

pub use consensus::anchor_pair_consensus;
pub use error::{Result, ScaffoldError};
pub use graph::{Graph, Node, Edge, FilterParams};
pub use group::{construct_groups, GroupParams, PathGroup};
pub use heuristics::{build_deterministic, build_monte_carlo, MonteCarloParams};
pub use metric::Metric;
pub use paf::{PafReader, PafRecord};
pub use path::Path;
pub use registry::{PathRef, PathRegistry};
