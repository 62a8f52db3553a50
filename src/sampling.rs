//! Random-surfer sampling estimator.

use crate::distribution::Distribution;
use crate::graph::{GraphRef, LinkGraph, NodeId};
use crate::topk::normalize;
use crate::transition::fill_transition_weights;
use crate::{check_damping, check_graph, Error, Result, DEFAULT_DAMPING, DEFAULT_SAMPLES};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleConfig {
    pub damping: f64,
    /// Number of surfer steps (visits recorded).
    pub samples: usize,
    /// Seed for the deterministic RNG.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            samples: DEFAULT_SAMPLES,
            seed: 42,
        }
    }
}

impl SampleConfig {
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping, true)?;
        check_samples(self.samples)
    }
}

fn check_samples(samples: usize) -> Result<()> {
    if samples == 0 {
        return Err(Error::InvalidArgument(
            "sample count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Estimate PageRank by walking `n` steps, seeded from OS entropy.
///
/// The result is non-deterministic; use [`sample_rank_with_config`] for reproducible
/// runs.
pub fn sample_rank<N: NodeId>(
    graph: &LinkGraph<N>,
    damping: f64,
    n: usize,
) -> Result<Distribution<N>> {
    sample_rank_with_rng(graph, damping, n, &mut rand::rng())
}

/// Seeded variant of [`sample_rank`]: identical inputs give identical output.
pub fn sample_rank_with_config<N: NodeId>(
    graph: &LinkGraph<N>,
    config: SampleConfig,
) -> Result<Distribution<N>> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    sample_rank_with_rng(graph, config.damping, config.samples, &mut rng)
}

/// Estimate PageRank as the visit frequency of an `n`-step random surfer drawing from `rng`.
///
/// Every step records exactly one visit, so the output sums to 1 by construction.
pub fn sample_rank_with_rng<N: NodeId, R: Rng>(
    graph: &LinkGraph<N>,
    damping: f64,
    n: usize,
    rng: &mut R,
) -> Result<Distribution<N>> {
    let visits = sample_visits(graph, damping, n, rng)?;
    let mut scores: Vec<f64> = visits.iter().map(|&c| c as f64).collect();
    normalize(&mut scores);

    tracing::debug!(
        nodes = graph.len(),
        samples = n,
        damping,
        "sampled random-surfer ranks"
    );
    Ok(Distribution::from_scores(graph, scores))
}

/// Index-level sampler: per-node visit counts of a `samples`-step surfer.
///
/// The start node is uniform over all nodes. Each step records a visit, builds the
/// transition weights for the current node and draws the next node from their
/// cumulative table. Two buffers of `node_count()` floats are allocated up front and
/// reused, so memory use does not grow with `samples`.
///
/// Fails with `InvalidGraph` if the graph is empty or has a self-link or out-of-range
/// link, and with `InvalidArgument` for a bad damping factor or zero samples.
pub fn sample_visits<G: GraphRef, R: Rng>(
    graph: &G,
    damping: f64,
    samples: usize,
    rng: &mut R,
) -> Result<Vec<u64>> {
    check_graph(graph)?;
    check_damping(damping, true)?;
    check_samples(samples)?;

    let n = graph.node_count();
    let mut visits = vec![0u64; n];
    let mut cdf: Vec<f64> = Vec::with_capacity(n);

    let mut curr = rng.random_range(0..n);
    for _ in 0..samples {
        visits[curr] += 1;
        fill_transition_weights(graph, curr, damping, &mut cdf);
        let total = cumulate(&mut cdf);
        curr = sample_cdf(rng, &cdf, total);
    }
    Ok(visits)
}

/// Turn weights into running sums in place; returns the total weight.
fn cumulate(weights: &mut [f64]) -> f64 {
    let mut acc = 0.0;
    for w in weights.iter_mut() {
        acc += *w;
        *w = acc;
    }
    acc
}

/// Draw an index with probability proportional to its weight, given the cumulative
/// table `cdf` and its `total`. Zero-weight entries are never returned.
fn sample_cdf<R: Rng>(rng: &mut R, cdf: &[f64], total: f64) -> usize {
    debug_assert!(!cdf.is_empty());
    if !(total > 0.0) {
        return rng.random_range(0..cdf.len());
    }
    let r = rng.random::<f64>() * total;
    let i = cdf.partition_point(|&c| c <= r);
    if i < cdf.len() {
        return i;
    }
    // r rounded up to the total: take the last entry with positive weight.
    cdf.partition_point(|&c| c < total).min(cdf.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle2() -> LinkGraph<&'static str> {
        LinkGraph::from_links([("A", vec!["B"]), ("B", vec!["A"])]).unwrap()
    }

    #[test]
    fn sample_cdf_never_picks_zero_weight() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cdf = vec![0.0, 0.5, 0.0, 0.5, 0.0];
        let total = cumulate(&mut cdf);
        assert_eq!(total, 1.0);
        for _ in 0..1_000 {
            let i = sample_cdf(&mut rng, &cdf, total);
            assert!(i == 1 || i == 3, "picked zero-weight index {i}");
        }
    }

    #[test]
    fn sample_cdf_is_roughly_proportional() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut cdf = vec![1.0, 3.0];
        let total = cumulate(&mut cdf);
        let hits = (0..40_000)
            .filter(|_| sample_cdf(&mut rng, &cdf, total) == 1)
            .count();
        let frac = hits as f64 / 40_000.0;
        assert!((frac - 0.75).abs() < 0.02, "frac={frac}");
    }

    #[test]
    fn visits_total_equals_samples() {
        let g = cycle2();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let visits = sample_visits(&g, 0.85, 1_234, &mut rng).unwrap();
        assert_eq!(visits.iter().sum::<u64>(), 1_234);
    }

    #[test]
    fn single_sample_puts_all_mass_on_start_node() {
        let g = cycle2();
        let d = sample_rank_with_config(
            &g,
            SampleConfig {
                samples: 1,
                ..SampleConfig::default()
            },
        )
        .unwrap();
        let mut values: Vec<f64> = d.iter().map(|(_, v)| v).collect();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![0.0, 1.0]);
    }

    #[test]
    fn full_damping_alternates_on_a_two_cycle() {
        // With damping 1 the surfer never teleports, so an even number of steps splits evenly.
        let g = cycle2();
        let d = sample_rank_with_config(
            &g,
            SampleConfig {
                damping: 1.0,
                samples: 1_000,
                seed: 5,
            },
        )
        .unwrap();
        assert_eq!(d.get(&"A"), Some(0.5));
        assert_eq!(d.get(&"B"), Some(0.5));
    }

    #[test]
    fn rejects_bad_arguments() {
        let g = cycle2();
        assert!(matches!(sample_rank(&g, 0.85, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(sample_rank(&g, -0.5, 10), Err(Error::InvalidArgument(_))));
        let empty = LinkGraph::<&str>::default();
        assert!(matches!(sample_rank(&empty, 0.85, 10), Err(Error::InvalidGraph(_))));
        assert!(SampleConfig { samples: 0, ..SampleConfig::default() }.validate().is_err());
    }

    #[test]
    fn index_level_sampler_is_checked() {
        let g = cycle2();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(matches!(
            sample_visits(&g, 3.0, 100, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            sample_visits(&g, 0.85, 0, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
        let empty = LinkGraph::<&str>::default();
        assert!(matches!(
            sample_visits(&empty, 0.85, 100, &mut rng),
            Err(Error::InvalidGraph(_))
        ));
    }
}
