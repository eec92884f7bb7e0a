//! Accuracy verification against direct evaluation.
use std::fmt::{Display, Formatter};

use log::warn;
use rlst::c64;

use crate::direct;
use crate::traits::{kernel::OscillatoryKernel, types::ButterflyError};

/// Relative errors of an approximate result against an exact one.
///
/// Targets whose exact value is zero have undefined relative error. Their NaN or infinite errors
/// are propagated into the average and maximum, and counted in `degenerate_targets`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReport {
    /// ‖exact - result‖₂ / ‖exact‖₂ over the whole vector.
    pub vector_relative_error: f64,

    /// Mean of the per target relative errors.
    pub average_relative_error: f64,

    /// Largest per target relative error.
    pub maximum_relative_error: f64,

    /// Number of targets with a zero exact value.
    pub degenerate_targets: usize,
}

impl ErrorReport {
    /// Compare a result with the exact values.
    ///
    /// # Arguments
    /// * `result` - Approximate values, one per target.
    /// * `exact` - Exact values, in the same order.
    pub fn new(result: &[c64], exact: &[c64]) -> Result<Self, ButterflyError> {
        if result.len() != exact.len() || result.is_empty() {
            return Err(ButterflyError::Failed(format!(
                "Cannot compare {} results with {} exact values",
                result.len(),
                exact.len()
            )));
        }

        let mut error_sq = 0f64;
        let mut norm_sq = 0f64;
        let mut total_relative_error = 0f64;
        let mut maximum_relative_error = 0f64;
        let mut degenerate_targets = 0;

        for (r, e) in result.iter().zip(exact) {
            let difference = e - r;
            let relative_error = difference.norm() / e.norm();

            if e.norm() == 0. {
                degenerate_targets += 1;
            }

            total_relative_error += relative_error;
            maximum_relative_error = if relative_error.is_nan() || maximum_relative_error.is_nan()
            {
                f64::NAN
            } else {
                maximum_relative_error.max(relative_error)
            };

            error_sq += difference.norm_sqr();
            norm_sq += e.norm_sqr();
        }

        if degenerate_targets > 0 {
            warn!(
                "{} targets have a zero exact value, their relative errors are undefined",
                degenerate_targets
            );
        }

        Ok(Self {
            vector_relative_error: (error_sq / norm_sq).sqrt(),
            average_relative_error: total_relative_error / result.len() as f64,
            maximum_relative_error,
            degenerate_targets,
        })
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vector  relative error: {}", self.vector_relative_error)?;
        writeln!(f, "Average relative error: {}", self.average_relative_error)?;
        write!(f, "Maximum relative error: {}", self.maximum_relative_error)
    }
}

/// Evaluate the sum directly and compare it with an approximate result. Returns the report and
/// the exact values.
///
/// # Arguments
/// * `kernel` - The oscillatory kernel.
/// * `sources` - Source coordinates in row major order.
/// * `charges` - One charge per source.
/// * `targets` - Target coordinates in row major order.
/// * `result` - Approximate values, one per target.
pub fn verify<K: OscillatoryKernel>(
    kernel: &K,
    sources: &[f64],
    charges: &[c64],
    targets: &[f64],
    result: &[c64],
) -> Result<(ErrorReport, Vec<c64>), ButterflyError> {
    let exact = direct::evaluate(kernel, sources, charges, targets)?;
    let report = ErrorReport::new(result, &exact)?;
    Ok((report, exact))
}
