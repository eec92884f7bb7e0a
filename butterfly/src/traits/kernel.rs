//! Oscillatory kernel trait
use std::fmt::Display;

use rayon::prelude::*;
use rlst::c64;

/// Interface for kernels of the form K(t, s) = a(t, s) exp(i Φ(t, s)).
///
/// Points are passed as slices of length `dim()`. Batched evaluators expect point data in
/// row major order [x_1, y_1, ..., x_N, y_N].
pub trait OscillatoryKernel: Send + Sync + Display {
    /// Spatial dimension of sources and targets.
    fn dim(&self) -> usize;

    /// Phase of the kernel in radians.
    ///
    /// # Arguments
    /// * `target` - Target point.
    /// * `source` - Source point.
    fn phase(&self, target: &[f64], source: &[f64]) -> f64;

    /// Amplitude of the kernel.
    ///
    /// # Arguments
    /// * `target` - Target point.
    /// * `source` - Source point.
    fn ampl(&self, target: &[f64], source: &[f64]) -> f64;

    /// Kernel value, `ampl(t, s) * exp(i phase(t, s))`.
    fn eval(&self, target: &[f64], source: &[f64]) -> c64 {
        c64::from_polar(self.ampl(target, source), self.phase(target, source))
    }

    /// Single threaded evaluation of the sum over sources, accumulated into `result`.
    ///
    /// # Arguments
    /// * `sources` - Source coordinates in row major order.
    /// * `targets` - Target coordinates in row major order.
    /// * `charges` - One charge per source.
    /// * `result` - One value per target, added to.
    fn evaluate_st(&self, sources: &[f64], targets: &[f64], charges: &[c64], result: &mut [c64]) {
        let dim = self.dim();
        targets
            .chunks_exact(dim)
            .zip(result.iter_mut())
            .for_each(|(target, r)| {
                *r += sources
                    .chunks_exact(dim)
                    .zip(charges)
                    .map(|(source, &charge)| self.eval(target, source) * charge)
                    .sum::<c64>();
            });
    }

    /// Multithreaded evaluation of the sum over sources, parallel over targets.
    ///
    /// # Arguments
    /// * `sources` - Source coordinates in row major order.
    /// * `targets` - Target coordinates in row major order.
    /// * `charges` - One charge per source.
    /// * `result` - One value per target, added to.
    fn evaluate_mt(&self, sources: &[f64], targets: &[f64], charges: &[c64], result: &mut [c64]) {
        let dim = self.dim();
        targets
            .par_chunks_exact(dim)
            .zip(result.par_iter_mut())
            .for_each(|(target, r)| {
                self.evaluate_st(sources, target, charges, std::slice::from_mut(r))
            });
    }
}
