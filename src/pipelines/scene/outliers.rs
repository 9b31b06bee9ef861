// SPDX-License-Identifier: GPL-3.0-only

//! Neighbourhood statistics over unordered point sets
//!
//! Brute-force k-nearest search parallelised over query points. The grid is
//! at most a few tens of thousands of points, which keeps this well under a
//! second on desktop hardware.

use glam::Vec3;
use rayon::prelude::*;

/// Squared distances from `points[query]` to its `k` nearest other points, ascending
pub(crate) fn nearest_sq_distances(points: &[Vec3], query: usize, k: usize) -> Vec<f32> {
    let origin = points[query];
    let mut best: Vec<f32> = Vec::with_capacity(k + 1);

    for (j, p) in points.iter().enumerate() {
        if j == query {
            continue;
        }
        let d = origin.distance_squared(*p);
        if best.len() < k || best.last().is_some_and(|&worst| d < worst) {
            let pos = best.partition_point(|&b| b <= d);
            best.insert(pos, d);
            if best.len() > k {
                best.pop();
            }
        }
    }

    best
}

/// Statistical outlier mask over the entries of `points` flagged in `valid`
///
/// For each valid point the mean distance to its `mean_k` nearest valid
/// neighbours is computed. Points whose mean exceeds the global mean by more
/// than `stddev_mult` standard deviations are rejected.
///
/// Returns a mask the same length as `points`; invalid inputs stay false.
/// With too few valid points to form neighbourhoods the mask equals `valid`.
pub fn statistical_outlier_mask(
    points: &[Vec3],
    valid: &[bool],
    mean_k: usize,
    stddev_mult: f32,
) -> Vec<bool> {
    let indices: Vec<usize> = valid
        .iter()
        .enumerate()
        .filter_map(|(i, &ok)| ok.then_some(i))
        .collect();

    if mean_k == 0 || indices.len() <= mean_k {
        return valid.to_vec();
    }

    let subset: Vec<Vec3> = indices.iter().map(|&i| points[i]).collect();
    let mean_distances: Vec<f64> = (0..subset.len())
        .into_par_iter()
        .map(|i| {
            let dists = nearest_sq_distances(&subset, i, mean_k);
            dists.iter().map(|d| d.sqrt() as f64).sum::<f64>() / dists.len() as f64
        })
        .collect();

    let n = mean_distances.len() as f64;
    let sum: f64 = mean_distances.iter().sum();
    let sq_sum: f64 = mean_distances.iter().map(|d| d * d).sum();
    let mean = sum / n;
    let variance = ((sq_sum - sum * sum / n) / (n - 1.0)).max(0.0);
    let threshold = mean + stddev_mult as f64 * variance.sqrt();

    let mut mask = vec![false; points.len()];
    for (&index, &distance) in indices.iter().zip(&mean_distances) {
        mask[index] = distance <= threshold;
    }
    mask
}

/// Local density of each point: sum of inverse squared distances to its `k` nearest neighbours
pub(crate) fn local_densities(points: &[Vec3], k: usize) -> Vec<f32> {
    (0..points.len())
        .into_par_iter()
        .map(|i| {
            nearest_sq_distances(points, i, k)
                .iter()
                .filter(|&&d| d > 0.0)
                .map(|d| 1.0 / d)
                .sum()
        })
        .collect()
}
