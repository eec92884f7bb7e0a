//! Direct O(N M) evaluation of kernel sums
use rlst::c64;

use crate::traits::{kernel::OscillatoryKernel, types::ButterflyError};

/// Evaluate r(t) = Σ_s K(t, s) c(s) at every target, parallel over targets.
///
/// # Arguments
/// * `kernel` - The oscillatory kernel.
/// * `sources` - Source coordinates in row major order.
/// * `charges` - One charge per source.
/// * `targets` - Target coordinates in row major order.
pub fn evaluate<K: OscillatoryKernel>(
    kernel: &K,
    sources: &[f64],
    charges: &[c64],
    targets: &[f64],
) -> Result<Vec<c64>, ButterflyError> {
    let dim = kernel.dim();
    if dim == 0 || sources.len() % dim != 0 || targets.len() % dim != 0 {
        return Err(ButterflyError::InvalidConfiguration(format!(
            "Coordinates are not a multiple of the kernel dimension {}",
            dim
        )));
    }

    let n_sources = sources.len() / dim;
    if charges.len() != n_sources {
        return Err(ButterflyError::ChargeMismatch {
            expected: n_sources,
            found: charges.len(),
        });
    }

    let mut result = vec![c64::new(0., 0.); targets.len() / dim];
    kernel.evaluate_mt(sources, targets, charges, &mut result);
    Ok(result)
}
