//! Splits the paths between one anchor pair into length-based groups, then picks a
//! representative consensus path per group.
use std::collections::BTreeMap;

use log::trace;

use crate::registry::{PathRef, PathRegistry};

/// Length beyond which a group is considered too spread out to have a meaningful
/// consensus (see [`PathGroup::compute_consensus`]).
const CONSENSUS_THRESHOLD: i64 = 100_000;

/// Parameters controlling the windowed valley/peak split.
#[derive(Debug, Clone, Copy)]
pub struct GroupParams {
    pub len_threshold: i64,
    pub window_size: i64,
    pub ratio_threshold: f64,
}

impl Default for GroupParams {
    fn default() -> Self {
        GroupParams {
            len_threshold: 10_000,
            window_size: 1_000,
            ratio_threshold: 0.9,
        }
    }
}

/// A length-based partition of the paths discovered between one anchor pair.
#[derive(Debug, Clone, Default)]
pub struct PathGroup {
    /// Path references, ascending by length.
    pub paths: Vec<PathRef>,
    /// `length -> count` over `paths`.
    pub length_freq: BTreeMap<i64, usize>,
    pub consensus: Option<PathRef>,
    pub valid_path_count: usize,
}

impl PathGroup {
    fn from_paths(paths: Vec<PathRef>, registry: &PathRegistry) -> Self {
        let length_freq = freq_map(&paths, registry);
        PathGroup {
            paths,
            length_freq,
            consensus: None,
            valid_path_count: 0,
        }
    }

    /// Removes every path whose length's frequency is strictly below `floor(f_max / 2)`.
    /// A no-op when that floor is zero (i.e. the group has at most one path per length).
    pub fn discard_infrequent(&mut self, registry: &PathRegistry) {
        let f_max = *self.length_freq.values().max().unwrap_or(&0);
        let threshold = f_max / 2;
        if threshold == 0 {
            return;
        }
        self.paths.retain(|&idx| {
            let len = registry.get(idx).length();
            self.length_freq.get(&len).copied().unwrap_or(0) >= threshold
        });
        self.length_freq = freq_map(&self.paths, registry);
    }

    /// Sets [`PathGroup::consensus`] to the first path at or above the group's integer
    /// average length, or the last path if none reaches it. Leaves it unset if the group
    /// spans more than [`CONSENSUS_THRESHOLD`] base pairs.
    pub fn compute_consensus(&mut self, registry: &PathRegistry) {
        self.consensus = None;
        let (Some(&first), Some(&last)) = (self.paths.first(), self.paths.last()) else {
            return;
        };

        let min_len = registry.get(first).length();
        let max_len = registry.get(last).length();
        if max_len - min_len > CONSENSUS_THRESHOLD {
            return;
        }

        let sum: i64 = self.paths.iter().map(|&idx| registry.get(idx).length()).sum();
        let average = sum / self.paths.len() as i64;

        self.consensus = Some(
            self.paths
                .iter()
                .copied()
                .find(|&idx| registry.get(idx).length() >= average)
                .unwrap_or(last),
        );
    }

    /// Counts paths in this group whose node-id sequence matches the consensus'. Requires
    /// [`PathGroup::compute_consensus`] to have been called first; returns 0 without one.
    pub fn valid_path_count(&mut self, registry: &PathRegistry) -> usize {
        let count = match self.consensus {
            None => 0,
            Some(consensus_idx) => {
                let consensus = registry.get(consensus_idx);
                self.paths
                    .iter()
                    .filter(|&&idx| registry.get(idx).same_nodes(consensus))
                    .count()
            }
        };
        self.valid_path_count = count;
        count
    }
}

fn freq_map(paths: &[PathRef], registry: &PathRegistry) -> BTreeMap<i64, usize> {
    let mut freq = BTreeMap::new();
    for &idx in paths {
        *freq.entry(registry.get(idx).length()).or_insert(0) += 1;
    }
    freq
}

struct Window {
    lower: i64,
    freq: BTreeMap<i64, usize>,
}

impl Window {
    fn total(&self) -> usize {
        self.freq.values().sum()
    }

    /// The `(length, frequency)` pair with lowest frequency, first-encountered on a tie.
    /// An empty window (no path falls in its range) has no length to report; it reports
    /// its lower bound at frequency 0, which is always the minimum by construction.
    fn lowest_freq_entry(&self) -> (i64, usize) {
        let mut best: Option<(i64, usize)> = None;
        for (&len, &f) in &self.freq {
            if best.map(|(_, bf)| f < bf).unwrap_or(true) {
                best = Some((len, f));
            }
        }
        best.unwrap_or((self.lower, 0))
    }

    fn highest_freq_entry(&self) -> (i64, usize) {
        let mut best: Option<(i64, usize)> = None;
        for (&len, &f) in &self.freq {
            if best.map(|(_, bf)| f > bf).unwrap_or(true) {
                best = Some((len, f));
            }
        }
        best.unwrap_or((self.lower, 0))
    }
}

/// Splits `path_refs` (paths between one fixed anchor pair) into length-based groups.
///
/// Sorts the input ascending by length, tiles the length range into fixed-width windows,
/// and looks for valleys in the windowed histogram that are significantly below a
/// neighboring peak; each such valley becomes a group boundary. See module docs for the
/// window/valley/peak definitions.
pub fn construct_groups(
    path_refs: &[PathRef],
    registry: &PathRegistry,
    params: &GroupParams,
) -> Vec<PathGroup> {
    if path_refs.is_empty() {
        return Vec::new();
    }

    let mut sorted = path_refs.to_vec();
    sorted.sort_by_key(|&idx| registry.get(idx).length());

    let min_length = registry.get(sorted[0]).length();
    let max_length = registry.get(*sorted.last().unwrap()).length();

    if max_length - min_length < params.len_threshold {
        return vec![PathGroup::from_paths(sorted, registry)];
    }

    // Tile the whole [min_length, max_length] range, including windows no path falls
    // into: an empty window between two populated ones is itself a valley candidate (see
    // `Window::lowest_freq_entry`), which the bubble scenario in the concrete properties
    // depends on. Windows are kept (not dropped) through the interior scan below; only
    // the final per-path split cares whether a given length range held anything.
    let num_windows = ((max_length - min_length) / params.window_size) as usize + 1;
    let mut windows: Vec<Window> = (0..num_windows)
        .map(|i| Window {
            lower: min_length + i as i64 * params.window_size,
            freq: BTreeMap::new(),
        })
        .collect();
    for &idx in &sorted {
        let length = registry.get(idx).length();
        let window_idx = ((length - min_length) / params.window_size) as usize;
        windows[window_idx]
            .freq
            .entry(length)
            .and_modify(|c| *c += 1)
            .or_insert(1);
    }

    let mut dividing_lengths: Vec<i64> = Vec::new();
    if windows.len() >= 3 {
        for i in 1..windows.len() - 1 {
            let triple = [&windows[i - 1], &windows[i], &windows[i + 1]];

            let mut valley_idx = 0;
            let mut peak_idx = 0;
            for (j, w) in triple.iter().enumerate() {
                if w.total() < triple[valley_idx].total() {
                    valley_idx = j;
                }
                if w.total() > triple[peak_idx].total() {
                    peak_idx = j;
                }
            }

            let (l_v, f_v) = triple[valley_idx].lowest_freq_entry();
            let (_, f_p) = triple[peak_idx].highest_freq_entry();

            if (f_v as f64) < params.ratio_threshold * (f_p as f64) {
                trace!("grouping: valley at length {l_v} (freq {f_v} vs peak freq {f_p})");
                dividing_lengths.push(l_v);
            }
        }
    }
    dividing_lengths.sort_unstable();
    dividing_lengths.dedup();

    if dividing_lengths.is_empty() {
        return vec![PathGroup::from_paths(sorted, registry)];
    }
    trace!("grouping: {} dividing length(s) found", dividing_lengths.len());

    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut remaining = dividing_lengths.as_slice();
    for idx in sorted {
        let length = registry.get(idx).length();
        while let Some((&d, rest)) = remaining.split_first() {
            if length >= d {
                groups.push(PathGroup::from_paths(std::mem::take(&mut current), registry));
                remaining = rest;
            } else {
                break;
            }
        }
        current.push(idx);
    }
    groups.push(PathGroup::from_paths(current, registry));
    groups
}
