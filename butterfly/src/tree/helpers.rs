//! Helper functions used in testing tree implementations and butterfly evaluations, specifically
//! point and charge generators.
use num::Float;
use rand::prelude::*;
use rlst::{c64, rlst_dynamic_array2, Array, BaseArray, RlstScalar, VectorContainer};

/// Alias for an rlst container for point data, expected with shape [dim, n_points];
pub type PointsMat<T> = Array<T, BaseArray<T, VectorContainer<T>, 2>, 2>;

/// Points fixture for testing, uniformly samples in each axis from min to max.
///
/// # Arguments
/// * `n_points` - The number of points to sample.
/// * `dim` - Spatial dimension of the points.
/// * `min` - The minimum coordinate value along each axis, defaults to 0.
/// * `max` - The maximum coordinate value along each axis, defaults to 1.
/// * `seed` - Random seed, defaults to 0.
pub fn points_fixture<T: Float + RlstScalar + rand::distributions::uniform::SampleUniform>(
    n_points: usize,
    dim: usize,
    min: Option<T>,
    max: Option<T>,
    seed: Option<u64>,
) -> PointsMat<T> {
    let seed = seed.unwrap_or(0);
    let mut range = StdRng::seed_from_u64(seed);

    let between = if let (Some(min), Some(max)) = (min, max) {
        rand::distributions::Uniform::from(min..max)
    } else {
        rand::distributions::Uniform::from(<T as num::Zero>::zero()..<T as num::One>::one())
    };

    let mut points = rlst_dynamic_array2!(T, [dim, n_points]);

    for i in 0..n_points {
        for d in 0..dim {
            points[[d, i]] = between.sample(&mut range);
        }
    }

    points
}

/// Clustered points fixture for testing adaptive trees. Every `stride`'th point is sampled
/// uniformly from the unit cube, the rest from a small cube of side `cluster_width` near its
/// corner at 0.1.
///
/// # Arguments
/// * `n_points` - The number of points to sample.
/// * `dim` - Spatial dimension of the points.
/// * `stride` - One in `stride` points forms the uniform background, must be positive.
/// * `cluster_width` - Side length of the cluster.
/// * `seed` - Random seed, defaults to 0.
pub fn clustered_points_fixture(
    n_points: usize,
    dim: usize,
    stride: usize,
    cluster_width: f64,
    seed: Option<u64>,
) -> PointsMat<f64> {
    let seed = seed.unwrap_or(0);
    let mut range = StdRng::seed_from_u64(seed);

    let uniform = rand::distributions::Uniform::from(0.0..1.0);
    let cluster = rand::distributions::Uniform::from(0.1..0.1 + cluster_width);

    let mut points = rlst_dynamic_array2!(f64, [dim, n_points]);

    for i in 0..n_points {
        for d in 0..dim {
            points[[d, i]] = if i % stride.max(1) == 0 {
                uniform.sample(&mut range)
            } else {
                cluster.sample(&mut range)
            };
        }
    }

    points
}

/// Evenly spaced points fixture, the midpoints of `n_points` equal cells of [0, 1) along each
/// axis of a tensor grid. Produces `n_points^dim` points.
///
/// # Arguments
/// * `n_points` - Number of points along each axis.
/// * `dim` - Spatial dimension of the points.
pub fn grid_points_fixture(n_points: usize, dim: usize) -> PointsMat<f64> {
    let total = n_points.pow(dim as u32);
    let mut points = rlst_dynamic_array2!(f64, [dim, total]);

    for i in 0..total {
        let mut rem = i;
        for d in 0..dim {
            points[[d, i]] = ((rem % n_points) as f64 + 0.5) / n_points as f64;
            rem /= n_points;
        }
    }

    points
}

/// Charges fixture for testing, real and imaginary parts sampled uniformly from [0, 1).
///
/// # Arguments
/// * `n_charges` - The number of charges to sample.
/// * `seed` - Random seed, defaults to 0.
pub fn charges_fixture(n_charges: usize, seed: Option<u64>) -> Vec<c64> {
    let seed = seed.unwrap_or(0);
    let mut range = StdRng::seed_from_u64(seed);
    let between = rand::distributions::Uniform::from(0.0..1.0);

    (0..n_charges)
        .map(|_| c64::new(between.sample(&mut range), between.sample(&mut range)))
        .collect()
}
