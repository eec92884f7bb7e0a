//! Tensor Chebyshev interpolation on boxes.
use std::f64::consts::PI;

use itertools::Itertools;
use rlst::{c64, rlst_dynamic_array2};

use crate::traversal::types::{ChebyshevGrid, Matrix};

impl ChebyshevGrid {
    /// Constructor for interpolation of a given order along each axis, on first kind nodes
    /// z_j = cos(π(2j + 1) / 2p) of the reference interval [-1, 1].
    ///
    /// # Arguments
    /// * `order` - Number of nodes along each axis.
    /// * `dim` - Spatial dimension.
    pub fn new(order: usize, dim: usize) -> Self {
        let p = order as f64;
        let nodes = (0..order)
            .map(|j| (PI * (2 * j + 1) as f64 / (2.0 * p)).cos())
            .collect_vec();

        let weights = (0..order)
            .map(|j| {
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * (PI * (2 * j + 1) as f64 / (2.0 * p)).sin()
            })
            .collect_vec();

        Self {
            order,
            dim,
            nodes,
            weights,
        }
    }

    /// Number of interpolation coefficients per box, `order^dim`.
    pub fn ncoeffs(&self) -> usize {
        self.order.pow(self.dim as u32)
    }

    /// Digits of a tensor index, the first axis varies fastest.
    pub fn multi_index(&self, index: usize) -> Vec<usize> {
        let mut rem = index;
        (0..self.dim)
            .map(|_| {
                let digit = rem % self.order;
                rem /= self.order;
                digit
            })
            .collect_vec()
    }

    /// Interpolation grid of a box in row major order, `ncoeffs()` points.
    ///
    /// # Arguments
    /// * `centre` - Centre of the box.
    /// * `half_width` - Half of the box's side length.
    pub fn grid(&self, centre: &[f64], half_width: f64) -> Vec<f64> {
        (0..self.ncoeffs())
            .flat_map(|t| {
                self.multi_index(t)
                    .into_iter()
                    .zip(centre)
                    .map(move |(j, c)| c + half_width * self.nodes[j])
                    .collect_vec()
            })
            .collect_vec()
    }

    /// Values of the one dimensional Lagrange polynomials at a point of the reference interval,
    /// in barycentric form.
    pub fn basis_1d(&self, u: f64) -> Vec<f64> {
        if let Some(j) = self.nodes.iter().position(|&z| z == u) {
            let mut values = vec![0.; self.order];
            values[j] = 1.0;
            return values;
        }

        let terms = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(z, w)| w / (u - z))
            .collect_vec();
        let denominator: f64 = terms.iter().sum();

        terms.iter().map(|t| t / denominator).collect_vec()
    }

    /// Values of all tensor Lagrange polynomials of a box at a point.
    ///
    /// # Arguments
    /// * `point` - Point at which the basis is evaluated.
    /// * `centre` - Centre of the box.
    /// * `half_width` - Half of the box's side length.
    pub fn basis(&self, point: &[f64], centre: &[f64], half_width: f64) -> Vec<f64> {
        let reference = point
            .iter()
            .zip(centre)
            .map(|(x, c)| (x - c) / half_width)
            .collect_vec();
        self.tensor_basis(&reference)
    }

    fn tensor_basis(&self, reference: &[f64]) -> Vec<f64> {
        let values_1d = reference.iter().map(|&u| self.basis_1d(u)).collect_vec();

        (0..self.ncoeffs())
            .map(|t| {
                self.multi_index(t)
                    .iter()
                    .enumerate()
                    .map(|(d, &j)| values_1d[d][j])
                    .product::<f64>()
            })
            .collect_vec()
    }

    /// Matrix of basis values at a set of points, of shape [ncoeffs, n_points], with entry
    /// (t, i) the t'th basis polynomial of the box at the i'th point.
    ///
    /// # Arguments
    /// * `points` - Points in row major order.
    /// * `centre` - Centre of the box.
    /// * `half_width` - Half of the box's side length.
    pub fn basis_matrix(&self, points: &[f64], centre: &[f64], half_width: f64) -> Matrix {
        let n_points = points.len() / self.dim;
        let mut result = rlst_dynamic_array2!(c64, [self.ncoeffs(), n_points]);

        for (i, point) in points.chunks_exact(self.dim).enumerate() {
            for (t, value) in self.basis(point, centre, half_width).into_iter().enumerate() {
                result[[t, i]] = c64::new(value, 0.);
            }
        }

        result
    }

    /// Interpolation matrix from a parent box to the grid of its child in a given orthant, of
    /// shape [ncoeffs, ncoeffs], with entry (t, t') the t'th parent basis polynomial at the t''th
    /// child grid point. Independent of the box scale.
    ///
    /// # Arguments
    /// * `orthant` - Position of the child, bit `d` set for the upper half along axis `d`.
    pub fn child_to_parent(&self, orthant: usize) -> Matrix {
        let n = self.ncoeffs();
        let mut result = rlst_dynamic_array2!(c64, [n, n]);

        for t_child in 0..n {
            let reference = self
                .multi_index(t_child)
                .iter()
                .enumerate()
                .map(|(d, &j)| {
                    let shift = if orthant & (1 << d) != 0 { 0.5 } else { -0.5 };
                    0.5 * self.nodes[j] + shift
                })
                .collect_vec();

            for (t, value) in self.tensor_basis(&reference).into_iter().enumerate() {
                result[[t, t_child]] = c64::new(value, 0.);
            }
        }

        result
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_nodes() {
        let grid = ChebyshevGrid::new(6, 2);
        assert_eq!(grid.ncoeffs(), 36);
        assert!(grid.nodes.iter().all(|z| z.abs() < 1.0));
        assert_eq!(grid.multi_index(7), vec![1, 1]);

        let points = grid.grid(&[1.0, -1.0], 0.5);
        assert_eq!(points.len(), 72);
        assert_relative_eq!(points[2], 1.0 + 0.5 * grid.nodes[1], epsilon = 1e-14);
        assert_relative_eq!(points[3], -1.0 + 0.5 * grid.nodes[0], epsilon = 1e-14);
    }

    #[test]
    fn test_basis_kronecker() {
        let grid = ChebyshevGrid::new(5, 2);
        let centre = [0.3, 0.7];
        let half_width = 0.25;
        let points = grid.grid(&centre, half_width);

        for (t, point) in points.chunks_exact(2).enumerate() {
            let basis = grid.basis(point, &centre, half_width);
            for (s, value) in basis.iter().enumerate() {
                let expected = if s == t { 1.0 } else { 0.0 };
                assert_relative_eq!(*value, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_partition_of_unity() {
        let grid = ChebyshevGrid::new(8, 3);
        let basis = grid.basis(&[0.11, -0.42, 0.93], &[0.0, 0.0, 0.0], 1.0);
        assert_relative_eq!(basis.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolation() {
        let grid = ChebyshevGrid::new(14, 1);
        let centre = [0.5];
        let half_width = 0.5;
        let f = |x: f64| (3.0 * x).cos();

        let values = grid.grid(&centre, half_width).into_iter().map(f).collect_vec();

        for x in [0.0, 0.123, 0.5, 0.77, 1.0] {
            let approx: f64 = grid
                .basis(&[x], &centre, half_width)
                .iter()
                .zip(&values)
                .map(|(l, v)| l * v)
                .sum();
            assert_relative_eq!(approx, f(x), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_child_to_parent() {
        let grid = ChebyshevGrid::new(4, 2);
        let n = grid.ncoeffs();

        // Polynomials of degree below the order are reproduced exactly
        let f = |u: &[f64]| 1.0 + u[0] - 2.0 * u[0] * u[1] + u[1].powi(3);
        let parent_values = grid.grid(&[0.0, 0.0], 1.0);
        let parent_values = parent_values.chunks_exact(2).map(f).collect_vec();

        for orthant in 0..4 {
            let matrix = grid.child_to_parent(orthant);
            let centre = [
                if orthant & 1 != 0 { 0.5 } else { -0.5 },
                if orthant & 2 != 0 { 0.5 } else { -0.5 },
            ];
            let child_points = grid.grid(&centre, 0.5);

            for (t_child, point) in child_points.chunks_exact(2).enumerate() {
                let interpolated: f64 = (0..n)
                    .map(|t| matrix[[t, t_child]].re * parent_values[t])
                    .sum();
                assert_relative_eq!(interpolated, f(point), epsilon = 1e-12);
            }
        }
    }
}
