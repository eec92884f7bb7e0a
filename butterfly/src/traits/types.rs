//! Utility types for trait definitions.

/// Type to handle butterfly related errors
#[derive(thiserror::Error, Debug)]
pub enum ButterflyError {
    /// The requested parameters cannot produce a valid traversal, for example when the
    /// trees are too shallow to admit a crossover level.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Source, target and kernel dimensions disagree.
    #[error("Dimension mismatch: sources are {source_dim}D, targets are {target_dim}D, kernel is {kernel_dim}D")]
    DimensionMismatch {
        /// Dimension of the source points
        source_dim: usize,
        /// Dimension of the target points
        target_dim: usize,
        /// Dimension expected by the kernel
        kernel_dim: usize,
    },

    /// The number of charges does not match the number of sources.
    #[error("Expected {expected} charges, found {found}")]
    ChargeMismatch {
        /// Number of source points
        expected: usize,
        /// Number of charges supplied
        found: usize,
    },

    /// Failure to run some business logic
    #[error("Failed: {0}")]
    Failed(String),
}

/// Enumeration of operator types, used for dispatch and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Source to multipole, direct projection of source charges.
    S2M,
    /// Multipole to multipole, aggregation of child multipoles.
    M2M,
    /// Source to local, direct injection of source charges into local coefficients.
    S2L,
    /// Multipole to local, the crossover translation.
    M2L,
    /// Local to local, redistribution of local coefficients to finer target boxes.
    L2L,
    /// Multipole to target, direct evaluation of multipole coefficients.
    M2T,
    /// Local to target, interpolation of local coefficients onto targets.
    L2T,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operator::S2M => "S2M",
            Operator::M2M => "M2M",
            Operator::S2L => "S2L",
            Operator::M2L => "M2L",
            Operator::L2L => "L2L",
            Operator::M2T => "M2T",
            Operator::L2T => "L2T",
        };
        write!(f, "{}", name)
    }
}
