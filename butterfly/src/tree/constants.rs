//! Crate wide constants for trees

/// Deepest level a tree is refined to, regardless of the number of points in a box.
pub const DEEPEST_LEVEL: u64 = 16;

/// Default maximum number of points held by a leaf.
pub const DEFAULT_LEAF_CAPACITY: usize = 16;

/// Fraction of the bounding cube's side added as padding on each side of a domain.
pub const DOMAIN_PADDING: f64 = 0.005;

/// Largest supported spatial dimension, boxes have up to 2^dim children.
pub const MAX_DIMENSION: usize = 16;
