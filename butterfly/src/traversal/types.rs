//! Data structures for butterfly evaluation
use rlst::{c64, Array, BaseArray, VectorContainer};

use crate::traversal::expansion::ExpansionTable;
use crate::tree::types::SingleNodeTree;

/// Represents coordinate data in a two-dimensional array with shape `[dim, n_points]`,
/// stored in column-major order, so that the coordinates of each point are contiguous.
pub type Coordinates = Array<f64, BaseArray<f64, VectorContainer<f64>, 2>, 2>;

/// Dense complex matrix, column-major.
pub type Matrix = Array<c64, BaseArray<c64, VectorContainer<c64>, 2>, 2>;

/// Tensor Chebyshev interpolation of a fixed order on boxes of any dimension.
///
/// # Fields
/// - `order` - Number of nodes along each axis.
/// - `dim` - Spatial dimension.
/// - `nodes` - First kind Chebyshev nodes on [-1, 1].
/// - `weights` - Barycentric weights of the nodes.
#[derive(Debug, Clone, Default)]
pub struct ChebyshevGrid {
    /// Number of nodes along each axis.
    pub order: usize,

    /// Spatial dimension.
    pub dim: usize,

    /// Reference nodes.
    pub nodes: Vec<f64>,

    /// Barycentric weights.
    pub weights: Vec<f64>,
}

/// Independent trees over the sources and the targets, coupled by the butterfly traversal.
///
/// At traversal level `l` source boxes at source level `max_level - l` are paired with target
/// boxes at target level `l`.
#[derive(Debug, Clone, Default)]
pub struct DualTree {
    /// Tree over the source points.
    pub source_tree: SingleNodeTree,

    /// Tree over the target points.
    pub target_tree: SingleNodeTree,

    /// Deepest traversal level, one less than the smaller number of levels of the two trees.
    pub max_level: u64,
}

/// Everything the operators read during a traversal. Bindings are owned by [`Butterfly`] and
/// passed to each operator explicitly.
pub struct OperatorSuite<K> {
    /// Source and target trees.
    pub tree: DualTree,

    /// The associated kernel function.
    pub kernel: K,

    /// Interpolation order along each axis.
    pub order: usize,

    /// Number of coefficients per (source box, target box) pair.
    pub ncoeffs: usize,

    /// Spatial dimension.
    pub dim: usize,

    /// Deepest traversal level.
    pub max_level: u64,

    /// Crossover level.
    pub split_level: u64,

    /// Interpolation nodes and weights.
    pub grid: ChebyshevGrid,

    /// Interpolation matrices from a parent to the grid of its child, one per orthant, used to
    /// aggregate multipoles.
    pub source_data: Vec<Matrix>,

    /// Transposes of the child to parent interpolation matrices, used to redistribute locals.
    pub target_data: Vec<Matrix>,

    /// Charges in source tree order.
    pub charges: Vec<c64>,

    /// For each traversal level, the source leaves coarser than the source level visited there,
    /// as indices into the source tree's leaves.
    pub orphans: Vec<Vec<usize>>,
}

/// Holds all required data for a butterfly evaluation on a single node.
pub struct Butterfly<K> {
    /// Operators and the data they read.
    pub operators: OperatorSuite<K>,

    /// Multipole bindings, level `l` holds rows of source boxes at source level `max_level - l`,
    /// each with one entry per target box at target level `l`.
    pub multipoles: ExpansionTable<c64>,

    /// Local bindings, level `l` holds rows of target boxes at target level `l`, each with one
    /// entry per source box at source level `max_level - l`.
    pub locals: ExpansionTable<c64>,

    /// Results in target tree order.
    pub potentials: Vec<c64>,
}

/// Builder for a [`Butterfly`], staged as trees, then parameters, then build.
///
/// # Example
/// ```
/// use butterfly::{ButterflyBuilder, FourierKernel};
/// use butterfly::traits::butterfly::{DataAccess, Evaluate};
/// use butterfly::tree::helpers::{charges_fixture, points_fixture};
///
/// let sources = points_fixture::<f64>(200, 1, None, None, Some(0));
/// let targets = points_fixture::<f64>(200, 1, None, None, Some(1));
/// let charges = charges_fixture(200, Some(2));
///
/// let mut butterfly = ButterflyBuilder::new()
///     .tree(&sources, &targets, 8)
///     .unwrap()
///     .parameters(&charges, 10, FourierKernel::new(1, 1.0))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// butterfly.evaluate().unwrap();
/// assert_eq!(butterfly.results().len(), 200);
/// ```
#[derive(Default)]
pub struct ButterflyBuilder<K> {
    /// Trees
    pub tree: Option<DualTree>,
    /// Charges in the order the sources were supplied
    pub charges: Option<Vec<c64>>,
    /// Kernel
    pub kernel: Option<K>,
    /// Interpolation order
    pub order: Option<usize>,
}
