//! Random-surfer transition model.
//!
//! From a node with `L > 0` outbound links the surfer teleports with probability
//! `1 - damping` (uniformly over all `N` nodes) and otherwise follows one of its links
//! uniformly:
//!
//! \[
//!   P(u \to v) = \frac{1 - d}{N} + [v \in \mathrm{out}(u)] \frac{d}{L}
//! \]
//!
//! A dangling node (`L = 0`) teleports with probability 1, so every node gets `1/N`
//! whatever the damping factor.

use crate::distribution::Distribution;
use crate::graph::{GraphRef, LinkGraph, NodeId};
use crate::{check_damping, check_links, check_non_empty, Error, Result};

/// Next-node distribution for a surfer currently at `node`.
pub fn transition<N: NodeId>(
    graph: &LinkGraph<N>,
    node: &N,
    damping: f64,
) -> Result<Distribution<N>> {
    check_non_empty(graph)?;
    check_damping(damping, true)?;
    let i = graph
        .index_of(node)
        .ok_or_else(|| Error::InvalidNode(format!("{node:?} is not a node of the graph")))?;

    let mut weights = Vec::with_capacity(graph.len());
    fill_transition_weights(graph, i, damping, &mut weights);
    Ok(Distribution::from_scores(graph, weights))
}

/// Index-level transition model: fill `out` with `P(node -> v)` for every `v`.
///
/// `out` is cleared and resized to `node_count()`; pass the same buffer across calls
/// to avoid reallocating. Fails with `InvalidNode` if `node >= node_count()` and with
/// `InvalidGraph` if the node's links are out of range or include itself. `out` is
/// untouched on error.
pub fn transition_weights<G: GraphRef>(
    graph: &G,
    node: usize,
    damping: f64,
    out: &mut Vec<f64>,
) -> Result<()> {
    check_non_empty(graph)?;
    check_damping(damping, true)?;
    let n = graph.node_count();
    if node >= n {
        return Err(Error::InvalidNode(format!("node {node} is outside 0..{n}")));
    }
    check_links(graph, node)?;
    fill_transition_weights(graph, node, damping, out);
    Ok(())
}

/// Unchecked form of [`transition_weights`] for callers that validated the graph.
pub(crate) fn fill_transition_weights<G: GraphRef>(
    graph: &G,
    node: usize,
    damping: f64,
    out: &mut Vec<f64>,
) {
    let n = graph.node_count();
    let links = graph.neighbors_ref(node);
    out.clear();
    if links.is_empty() {
        out.resize(n, 1.0 / n as f64);
        return;
    }
    out.resize(n, (1.0 - damping) / n as f64);
    let share = damping / links.len() as f64;
    for &v in links {
        out[v] += share;
    }
}
