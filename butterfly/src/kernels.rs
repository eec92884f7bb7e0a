//! Oscillatory kernels
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

use crate::traits::kernel::OscillatoryKernel;

/// The Fourier kernel K(t, s) = exp(i 2π κ ⟨t, s⟩) in any dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierKernel {
    /// Spatial dimension.
    pub dim: usize,

    /// Frequency κ.
    pub frequency: f64,
}

impl FourierKernel {
    /// Constructor
    ///
    /// # Arguments
    /// * `dim` - Spatial dimension.
    /// * `frequency` - Frequency κ.
    pub fn new(dim: usize, frequency: f64) -> Self {
        Self { dim, frequency }
    }
}

impl Default for FourierKernel {
    fn default() -> Self {
        Self::new(1, 1.0)
    }
}

impl OscillatoryKernel for FourierKernel {
    fn dim(&self) -> usize {
        self.dim
    }

    fn phase(&self, target: &[f64], source: &[f64]) -> f64 {
        let inner: f64 = target.iter().zip(source).map(|(t, s)| t * s).sum();
        2.0 * PI * self.frequency * inner
    }

    fn ampl(&self, _target: &[f64], _source: &[f64]) -> f64 {
        1.0
    }
}

impl Display for FourierKernel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FourierKernel: K(t, s) = exp(i 2π κ <t, s>), dim = {}, κ = {}",
            self.dim, self.frequency
        )
    }
}
