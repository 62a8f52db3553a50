//! Ranking utilities.

use ordered_float::NotNan;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Indices of the `k` largest positive, finite scores, best first.
///
/// Ties are broken toward the smaller index, so the result is stable for a given
/// score vector.
pub fn top_k(scores: &[f64], k: usize) -> Vec<(usize, f64)> {
    if k == 0 || scores.is_empty() {
        return Vec::new();
    }
    // Min-heap on (score, Reverse(index)): the root is the weakest entry kept so far.
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (i, &score) in scores.iter().enumerate() {
        if !score.is_finite() || score <= 0.0 {
            continue;
        }
        let Ok(s) = NotNan::new(score) else { continue };
        let entry = Reverse((s, Reverse(i)));
        if heap.len() < k {
            heap.push(entry);
        } else if let Some(weakest) = heap.peek() {
            if entry < *weakest {
                heap.pop();
                heap.push(entry);
            }
        }
    }
    let mut results: Vec<(NotNan<f64>, usize)> = heap
        .into_iter()
        .map(|Reverse((s, Reverse(i)))| (s, i))
        .collect();
    results.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    results.into_iter().map(|(s, i)| (i, s.into_inner())).collect()
}

/// Scale `scores` in place so they sum to 1. Leaves an all-zero vector untouched.
pub fn normalize(scores: &mut [f64]) {
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for s in scores {
            *s /= sum;
        }
    }
}
