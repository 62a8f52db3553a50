//! PageRank by power iteration.
//!
//! Starting from the uniform distribution, each step computes
//!
//! \[
//!   r'(v) = \frac{1 - d}{N} + d \sum_{u \to v} \frac{r(u)}{L_u} + d \sum_{u\ \text{dangling}} \frac{r(u)}{N}
//! \]
//!
//! and the iteration stops once no node moves by `tolerance` or more. Dangling mass is
//! spread over every node, so each step conserves total mass exactly (up to rounding).

use crate::distribution::{max_abs_diff, Distribution};
use crate::graph::{GraphRef, LinkGraph, NodeId};
use crate::{
    check_damping, check_graph, check_non_empty, Error, Result, DEFAULT_DAMPING, DEFAULT_TOLERANCE,
};

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterateConfig {
    /// Must lie in `[0, 1)`.
    pub damping: f64,
    /// Stop once the largest per-node change is strictly below this.
    pub tolerance: f64,
    /// Optional cap on the number of steps. `None` iterates until convergence.
    pub max_iterations: Option<usize>,
}

impl Default for IterateConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
        }
    }
}

impl IterateConfig {
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping, false)?;
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "tolerance must be finite and > 0 (got {})",
                self.tolerance
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::InvalidArgument(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Index-level outcome of [`iterate_scores`].
#[derive(Debug, Clone)]
pub struct PageRankRun {
    /// Scores indexed by node.
    pub scores: Vec<f64>,
    /// Number of update steps performed.
    pub iterations: usize,
    /// Largest per-node change in the last step.
    pub max_diff: f64,
    /// Whether `max_diff < tolerance` was reached (false only when capped).
    pub converged: bool,
}

/// Keyed outcome of [`iterate_rank_with_config`].
#[derive(Debug, Clone)]
pub struct IterationRun<N: Ord> {
    pub ranks: Distribution<N>,
    pub iterations: usize,
    pub max_diff: f64,
    pub converged: bool,
}

/// PageRank of every node by power iteration with the default tolerance.
pub fn iterate_rank<N: NodeId>(graph: &LinkGraph<N>, damping: f64) -> Result<Distribution<N>> {
    let config = IterateConfig {
        damping,
        ..IterateConfig::default()
    };
    Ok(iterate_rank_with_config(graph, config)?.ranks)
}

pub fn iterate_rank_with_config<N: NodeId>(
    graph: &LinkGraph<N>,
    config: IterateConfig,
) -> Result<IterationRun<N>> {
    let run = iterate_scores(graph, config)?;
    Ok(IterationRun {
        ranks: Distribution::from_scores(graph, run.scores),
        iterations: run.iterations,
        max_diff: run.max_diff,
        converged: run.converged,
    })
}

/// Apply exactly one update step to `ranks`.
///
/// `ranks` must have an entry for every node of `graph`.
pub fn iterate_step<N: NodeId>(
    graph: &LinkGraph<N>,
    damping: f64,
    ranks: &Distribution<N>,
) -> Result<Distribution<N>> {
    check_non_empty(graph)?;
    check_damping(damping, false)?;
    let scores = ranks.scores_for(graph).ok_or_else(|| {
        Error::InvalidArgument("ranks must have an entry for every graph node".to_string())
    })?;
    let mut next = vec![0.0; scores.len()];
    pagerank_step(graph, damping, &scores, &mut next);
    Ok(Distribution::from_scores(graph, next))
}

/// Index-level power iteration over any [`GraphRef`].
///
/// Fails with `InvalidGraph` if the graph is empty or any link is a self-link or
/// points outside `0..node_count()`.
pub fn iterate_scores<G: GraphRef>(graph: &G, config: IterateConfig) -> Result<PageRankRun> {
    config.validate()?;
    check_graph(graph)?;

    let n = graph.node_count();
    let mut scores = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];

    let mut iterations = 0usize;
    let mut max_diff = f64::INFINITY;
    let mut converged = false;
    while config.max_iterations.map_or(true, |cap| iterations < cap) {
        iterations += 1;
        pagerank_step(graph, config.damping, &scores, &mut next);
        max_diff = max_abs_diff(&scores, &next);
        std::mem::swap(&mut scores, &mut next);
        tracing::trace!(iteration = iterations, max_diff, "pagerank step");
        if max_diff < config.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        tracing::debug!(nodes = n, iterations, max_diff, "pagerank converged");
    } else {
        tracing::warn!(
            nodes = n,
            iterations,
            max_diff,
            tolerance = config.tolerance,
            "pagerank stopped at iteration cap before converging"
        );
    }

    Ok(PageRankRun {
        scores,
        iterations,
        max_diff,
        converged,
    })
}

/// One PageRank update: read `scores`, write the next iterate into `out`.
///
/// Both slices must be `node_count()` long and every link in range.
pub(crate) fn pagerank_step<G: GraphRef>(
    graph: &G,
    damping: f64,
    scores: &[f64],
    out: &mut [f64],
) {
    let n = graph.node_count();
    debug_assert_eq!(scores.len(), n);
    debug_assert_eq!(out.len(), n);
    let n_f64 = n as f64;

    let dangling_sum: f64 = (0..n)
        .filter(|&u| graph.out_degree(u) == 0)
        .map(|u| scores[u])
        .sum();
    let teleport = (1.0 - damping) / n_f64;
    out.fill(teleport + damping * dangling_sum / n_f64);

    for u in 0..n {
        let nbrs = graph.neighbors_ref(u);
        if nbrs.is_empty() {
            continue;
        }
        let share = damping * scores[u] / nbrs.len() as f64;
        for &v in nbrs {
            out[v] += share;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_cycle_is_even() {
        let g = LinkGraph::from_links([("A", vec!["B"]), ("B", vec!["A"])]).unwrap();
        let r = iterate_rank(&g, 0.85).unwrap();
        assert!((r.get(&"A").unwrap() - 0.5).abs() < 1e-12);
        assert!((r.get(&"B").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn dangling_mass_is_redistributed() {
        // A dangling, B -> A.
        let g = LinkGraph::from_links([("A", vec![]), ("B", vec!["A"])]).unwrap();
        let run = iterate_rank_with_config(&g, IterateConfig::default()).unwrap();
        assert!(run.converged);
        assert!((run.ranks.total() - 1.0).abs() < 1e-9);
        assert!(run.ranks.get(&"A").unwrap() > run.ranks.get(&"B").unwrap());
    }

    #[test]
    fn zero_damping_is_uniform_after_one_step() {
        let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![]), ("c", vec!["a", "b"])])
            .unwrap();
        let run = iterate_rank_with_config(
            &g,
            IterateConfig {
                damping: 0.0,
                ..IterateConfig::default()
            },
        )
        .unwrap();
        assert_eq!(run.iterations, 1);
        assert_eq!(run.max_diff, 0.0);
        for (_, v) in run.ranks.iter() {
            assert!((v - 1.0 / 3.0).abs() < 1e-15);
        }
    }

    #[test]
    fn cap_reports_not_converged() {
        let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![]), ("c", vec!["a", "b"])])
            .unwrap();
        let run = iterate_rank_with_config(
            &g,
            IterateConfig {
                tolerance: 1e-15,
                max_iterations: Some(2),
                ..IterateConfig::default()
            },
        )
        .unwrap();
        assert_eq!(run.iterations, 2);
        assert!(!run.converged);
        assert!((run.ranks.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_config() {
        let g = LinkGraph::from_links([("a", Vec::<&str>::new())]).unwrap();
        for config in [
            IterateConfig { damping: 1.0, ..IterateConfig::default() },
            IterateConfig { damping: -0.1, ..IterateConfig::default() },
            IterateConfig { tolerance: 0.0, ..IterateConfig::default() },
            IterateConfig { tolerance: f64::NAN, ..IterateConfig::default() },
            IterateConfig { max_iterations: Some(0), ..IterateConfig::default() },
        ] {
            let err = iterate_rank_with_config(&g, config).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{err}");
        }

        let empty = LinkGraph::<&str>::default();
        assert!(matches!(iterate_rank(&empty, 0.85), Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn step_requires_every_node() {
        let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a"])]).unwrap();
        let other = LinkGraph::from_links([("a", Vec::<&str>::new())]).unwrap();
        let partial = iterate_rank(&other, 0.85).unwrap();
        assert!(matches!(
            iterate_step(&g, 0.85, &partial),
            Err(Error::InvalidArgument(_))
        ));
    }
}
