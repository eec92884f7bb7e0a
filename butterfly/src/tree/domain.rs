//! Constructor for a single node Domain.
use itertools::Itertools;

use crate::tree::{constants::DOMAIN_PADDING, types::Domain};

impl Domain {
    /// Compute the cubic domain enclosing a set of points. The bounding cube is padded along each
    /// axis so that no point lies on the edge of the domain, and centred on the points. A set of
    /// coincident points is given a unit side length.
    ///
    /// # Arguments
    /// * `coordinates` - A slice of point coordinates, expected in row major order [x_1, y_1, ..., x_N, y_N].
    /// * `dim` - Spatial dimension of the points.
    pub fn from_local_points(coordinates: &[f64], dim: usize) -> Domain {
        let (min, max): (Vec<f64>, Vec<f64>) = (0..dim)
            .map(|d| {
                coordinates
                    .iter()
                    .skip(d)
                    .step_by(dim)
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                        (lo.min(x), hi.max(x))
                    })
            })
            .unzip();

        // Want a cubic box to place everything in
        let side_length = min
            .iter()
            .zip(&max)
            .map(|(lo, hi)| hi - lo)
            .fold(0f64, f64::max);

        let side_length = if side_length > 0. { side_length } else { 1.0 };

        let side_length = side_length * (1.0 + 2.0 * DOMAIN_PADDING);

        // Centre the cube on the bounding box of the points
        let origin = min
            .iter()
            .zip(&max)
            .map(|(lo, hi)| 0.5 * (lo + hi) - 0.5 * side_length)
            .collect_vec();

        Domain {
            origin,
            side_length,
        }
    }

    /// Spatial dimension of the domain.
    pub fn dim(&self) -> usize {
        self.origin.len()
    }

    /// Centre of the domain.
    pub fn centre(&self) -> Vec<f64> {
        self.origin
            .iter()
            .map(|o| o + 0.5 * self.side_length)
            .collect_vec()
    }

    /// Check whether a point lies inside the domain.
    pub fn contains(&self, point: &[f64]) -> bool {
        self.origin
            .iter()
            .zip(point)
            .all(|(o, x)| *x >= *o && *x <= o + self.side_length)
    }
}
