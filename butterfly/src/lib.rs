//! # Butterfly Algorithm for Oscillatory Kernel Sums
//!
//! Evaluates r(t) = Σ_s K(t, s) c(s) for oscillatory kernels K(t, s) = a(t, s) exp(i Φ(t, s)),
//! such as the Fourier kernel, over independent trees built on the sources and the targets, in
//! close to linear time rather than O(N M), based on \[1\].
//!
//! Notable features of this library are:
//! * Adaptive 2^D-ary trees in any spatial dimension, with sources and targets refined independently.
//! * Tensor Chebyshev interpolation, with multipoles aggregated over the source tree up to a split
//!   level and locals redistributed over the target tree after it.
//! * Data parallel operators within each level of the traversal.
//! * An accuracy oracle comparing results with direct evaluation.
//!
//! ## References
//! \[1\] Candès, E., Demanet, L., & Ying, L. (2009). A fast butterfly algorithm for the computation of Fourier integral operators. Multiscale Modeling & Simulation, 7(4), 1727-1750.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod direct;
pub mod kernels;
pub mod oracle;
pub mod traits;
pub mod traversal;
pub mod tree;

// Public API
#[doc(inline)]
pub use kernels::FourierKernel;
#[doc(inline)]
pub use traits::types::ButterflyError;
#[doc(inline)]
pub use traversal::types::Butterfly;
#[doc(inline)]
pub use traversal::types::ButterflyBuilder;
