//! Butterfly traits
use rlst::c64;

use crate::traits::{tree::ButterflyTree, types::ButterflyError};
use crate::traversal::expansion::ExpansionTable;

/// Interface for the source leg of the multipole phase, traversal levels up to the crossover.
///
/// Each operator writes the multipole coefficients of the (source box, target box) pairs it is
/// dispatched to at traversal level `level`, pairing source boxes at source level
/// `max_level - level` with target boxes at target level `level`.
pub trait SourceTranslation {
    /// Source to multipole, projects the charges of a source box onto its interpolation grid.
    /// Applied at traversal level 0 and to every source leaf.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    /// * `multipoles` - Multipole bindings, written at `level`.
    fn s2m(&self, level: u64, multipoles: &mut ExpansionTable<c64>) -> Result<(), ButterflyError>;

    /// Multipole to multipole, aggregates the multipoles of the children of a source box,
    /// paired with the parent of the target box, read from the previous level.
    ///
    /// # Arguments
    /// * `level` - The traversal level being written.
    /// * `multipoles` - Multipole bindings, read at `level - 1` and written at `level`.
    fn m2m(&self, level: u64, multipoles: &mut ExpansionTable<c64>) -> Result<(), ButterflyError>;
}

/// Interface for translations that produce local coefficients from source data.
pub trait SourceToTargetTranslation {
    /// Multipole to local, the crossover translation, applied once at the split level.
    ///
    /// # Arguments
    /// * `level` - The split level.
    /// * `multipoles` - Multipole bindings, read at `level`.
    /// * `locals` - Local bindings, written at `level`.
    fn m2l(
        &self,
        level: u64,
        multipoles: &ExpansionTable<c64>,
        locals: &mut ExpansionTable<c64>,
    ) -> Result<(), ButterflyError>;

    /// Source to local, evaluates the charges of a source leaf directly at the interpolation grid
    /// of each target box. Applied to source leaves beyond the split level.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    /// * `locals` - Local bindings, written at `level`.
    fn s2l(&self, level: u64, locals: &mut ExpansionTable<c64>) -> Result<(), ButterflyError>;
}

/// Interface for the target leg, local redistribution and evaluation at targets.
pub trait TargetTranslation {
    /// Local to local, interpolates the locals of the parent target box, paired with the
    /// children of the source box, onto the target box's grid.
    ///
    /// # Arguments
    /// * `level` - The traversal level being written.
    /// * `locals` - Local bindings, read at `level - 1` and written at `level`.
    fn l2l(&self, level: u64, locals: &mut ExpansionTable<c64>) -> Result<(), ButterflyError>;

    /// Multipole to target, evaluates multipoles directly at the targets of target boxes that
    /// terminate before the crossover.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    /// * `multipoles` - Multipole bindings, read at `level`.
    /// * `potentials` - Results in target tree order.
    fn m2t(
        &self,
        level: u64,
        multipoles: &ExpansionTable<c64>,
        potentials: &mut [c64],
    ) -> Result<(), ButterflyError>;

    /// Local to target, interpolates locals onto the targets of terminating target boxes.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    /// * `locals` - Local bindings, read at `level`.
    /// * `potentials` - Results in target tree order.
    fn l2t(
        &self,
        level: u64,
        locals: &ExpansionTable<c64>,
        potentials: &mut [c64],
    ) -> Result<(), ButterflyError>;
}

/// Access to the data of a butterfly evaluator.
pub trait DataAccess {
    /// Kernel associated with this evaluator.
    type Kernel;

    /// Tree associated with this evaluator.
    type Tree: ButterflyTree;

    /// Get the trees.
    fn tree(&self) -> &Self::Tree;

    /// Get the kernel.
    fn kernel(&self) -> &Self::Kernel;

    /// Spatial dimension.
    fn dim(&self) -> usize;

    /// Interpolation order along each axis.
    fn order(&self) -> usize;

    /// Number of interpolation coefficients per box.
    fn ncoeffs(&self) -> usize;

    /// Deepest traversal level.
    fn max_level(&self) -> u64;

    /// Level at which multipoles are converted to locals.
    fn split_level(&self) -> u64;

    /// Multipole bindings.
    fn multipoles(&self) -> &ExpansionTable<c64>;

    /// Local bindings.
    fn locals(&self) -> &ExpansionTable<c64>;

    /// Multipole coefficients of a (source box, target box) pair at a traversal level.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    /// * `source_index` - Index of the source box at source level `max_level - level`.
    /// * `target_index` - Index of the target box at target level `level`.
    fn multipole(&self, level: u64, source_index: usize, target_index: usize) -> Option<&[c64]>;

    /// Local coefficients of a (target box, source box) pair at a traversal level.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    /// * `target_index` - Index of the target box at target level `level`.
    /// * `source_index` - Index of the source box at source level `max_level - level`.
    fn local(&self, level: u64, target_index: usize, source_index: usize) -> Option<&[c64]>;

    /// Results in target tree order.
    fn potentials(&self) -> &[c64];

    /// Results in the order the targets were supplied.
    fn results(&self) -> Vec<c64>;
}

/// Interface for running a butterfly evaluation.
pub trait Evaluate {
    /// Run the level synchronised traversal, overwriting any previous results.
    fn evaluate(&mut self) -> Result<(), ButterflyError>;

    /// Reset all bindings and results and attach a new set of charges.
    ///
    /// # Arguments
    /// * `charges` - One charge per source, in the order the sources were supplied.
    fn clear(&mut self, charges: &[c64]) -> Result<(), ButterflyError>;
}
