//! `linkrank`: PageRank estimators over small hyperlinked corpora.
//!
//! Two independent estimators share one graph representation:
//! - [`sample_rank`]: a random-surfer simulation; rank is visit frequency.
//! - [`iterate_rank`]: power iteration of the PageRank recurrence until the largest
//!   per-node change drops below a tolerance.
//!
//! Both consume an immutable [`LinkGraph`] and return a fresh [`Distribution`].
//!
//! Public invariants (must not drift):
//! - **Totality**: every returned distribution has exactly one entry per graph node,
//!   including isolated and dangling nodes, and sums to 1.0 within floating-point tolerance.
//! - **Node order**: index-level APIs address nodes by their position in
//!   [`LinkGraph::nodes`], which is sorted by the label's `Ord`.
//! - **Determinism**: [`iterate_rank`] and the seeded sampler are deterministic given
//!   identical inputs and configs.
//!
//! Dangling nodes are handled differently by the two estimators. The transition model
//! sends a dangling node's surfer to a uniformly random node with probability 1 (no
//! damping), while the iterative recurrence redistributes `damping * rank / N` from a
//! dangling node to every node. Both rules keep probability mass at 1; they are not
//! numerically identical, so the two estimators can disagree slightly on graphs with
//! dangling nodes.

pub mod corpus;
pub mod distribution;
pub mod graph;
pub mod iterative;
pub mod sampling;
pub mod topk;
pub mod transition;

pub use corpus::{crawl, extract_links};
pub use distribution::{max_abs_diff, Distribution};
pub use graph::{GraphRef, LinkGraph, NodeId};
pub use iterative::{
    iterate_rank, iterate_rank_with_config, iterate_scores, iterate_step, IterateConfig,
    IterationRun, PageRankRun,
};
pub use sampling::{
    sample_rank, sample_rank_with_config, sample_rank_with_rng, sample_visits, SampleConfig,
};
pub use topk::{normalize, top_k};
pub use transition::{transition, transition_weights};

use std::path::PathBuf;

/// Probability of following an outbound link rather than teleporting.
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Largest per-node change at which power iteration is considered converged.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Number of random-surfer steps taken by the sampler.
pub const DEFAULT_SAMPLES: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    #[error("invalid node: {0}")]
    InvalidNode(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject damping factors that are not finite or fall outside `[0, 1]`.
///
/// `allow_one` is false for the iterative estimator, where `damping = 1` removes the
/// contraction that guarantees convergence.
pub(crate) fn check_damping(damping: f64, allow_one: bool) -> Result<()> {
    let in_range = if allow_one {
        (0.0..=1.0).contains(&damping)
    } else {
        (0.0..1.0).contains(&damping)
    };
    if !damping.is_finite() || !in_range {
        let range = if allow_one { "[0, 1]" } else { "[0, 1)" };
        return Err(Error::InvalidArgument(format!(
            "damping must be in {range} (got {damping})"
        )));
    }
    Ok(())
}

pub(crate) fn check_non_empty<G: GraphRef>(graph: &G) -> Result<()> {
    if graph.node_count() == 0 {
        return Err(Error::InvalidGraph("graph has no nodes".to_string()));
    }
    Ok(())
}

/// Every link of `node` must point at another node in `0..node_count()`.
pub(crate) fn check_links<G: GraphRef>(graph: &G, node: usize) -> Result<()> {
    let n = graph.node_count();
    for &v in graph.neighbors_ref(node) {
        if v >= n {
            return Err(Error::InvalidGraph(format!(
                "node {node} links to {v}, outside 0..{n}"
            )));
        }
        if v == node {
            return Err(Error::InvalidGraph(format!("node {node} links to itself")));
        }
    }
    Ok(())
}

/// Non-empty, and no self-links or out-of-range links anywhere.
///
/// [`LinkGraph`] guarantees this at construction; other [`GraphRef`] adapters do not.
pub(crate) fn check_graph<G: GraphRef>(graph: &G) -> Result<()> {
    check_non_empty(graph)?;
    (0..graph.node_count()).try_for_each(|u| check_links(graph, u))
}
