//! Per-node probability distributions and the convergence helper.

use crate::graph::{LinkGraph, NodeId};
use crate::topk::top_k;
use std::collections::BTreeMap;

/// A total mapping from graph nodes to non-negative values.
///
/// Every distribution produced by this crate has one entry per node of the graph it
/// was computed on and sums to 1.0 within floating-point tolerance. Iteration is in
/// label order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distribution<N: Ord> {
    values: BTreeMap<N, f64>,
}

impl<N: NodeId> Distribution<N> {
    /// Pair index-ordered `scores` with the graph's labels.
    pub(crate) fn from_scores(graph: &LinkGraph<N>, scores: Vec<f64>) -> Self {
        debug_assert_eq!(graph.len(), scores.len());
        Self {
            values: graph.nodes().iter().cloned().zip(scores).collect(),
        }
    }

    /// Read the distribution back into index order for `graph`.
    ///
    /// `None` if any graph node has no entry.
    pub(crate) fn scores_for(&self, graph: &LinkGraph<N>) -> Option<Vec<f64>> {
        graph.nodes().iter().map(|n| self.get(n)).collect()
    }

    pub fn get(&self, node: &N) -> Option<f64> {
        self.values.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, f64)> + '_ {
        self.values.iter().map(|(n, &v)| (n, v))
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Largest absolute per-node difference. Nodes missing on one side count as 0.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        let left = self
            .values
            .iter()
            .map(|(n, &v)| (v - other.get(n).unwrap_or(0.0)).abs());
        let right_only = other
            .values
            .iter()
            .filter(|(n, _)| !self.values.contains_key(*n))
            .map(|(_, &v)| v.abs());
        left.chain(right_only).fold(0.0, f64::max)
    }

    /// The `k` highest-valued nodes, best first. Zero-valued nodes are never returned;
    /// ties go to the node with the smaller label.
    pub fn top(&self, k: usize) -> Vec<(&N, f64)> {
        let keys: Vec<&N> = self.values.keys().collect();
        let scores: Vec<f64> = self.values.values().copied().collect();
        top_k(&scores, k)
            .into_iter()
            .map(|(i, s)| (keys[i], s))
            .collect()
    }

    /// Every node, best first, zero-valued nodes included; ties keep label order.
    pub fn ranked(&self) -> Vec<(&N, f64)> {
        let mut all: Vec<(&N, f64)> = self.iter().collect();
        // Stable, so equal values stay in label order.
        all.sort_by(|a, b| b.1.total_cmp(&a.1));
        all
    }
}

impl<N: Ord> IntoIterator for Distribution<N> {
    type Item = (N, f64);
    type IntoIter = std::collections::btree_map::IntoIter<N, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Largest absolute element-wise difference between two equally long score vectors.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
