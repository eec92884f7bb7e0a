//! Crate wide constants for butterfly evaluation

/// Default number of Chebyshev nodes along each axis of a box.
pub const DEFAULT_INTERPOLATION_ORDER: usize = 10;

/// Largest number of interpolation coefficients per box, `order^dim`.
pub const MAX_COEFFICIENTS: usize = 4096;
