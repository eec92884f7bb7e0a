//! Data structures for adaptive 2^D-ary trees.

/// A cube in D dimensions characterised by its origin and side length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    /// The lower corner of the domain, the minimum value along each axis.
    pub origin: Vec<f64>,

    /// The side length, shared by every axis.
    pub side_length: f64,
}

/// A box in a tree, addressed by its level and its index amongst the boxes at that level.
///
/// # Fields
/// - `level` - Level of the box, the root is at level 0.
/// - `index` - Stable index of the box at its level, assigned at construction.
/// - `parent` - Index of the parent at the previous level.
/// - `orthant` - Position of the box within its parent, bit `d` is set for the upper half along axis `d`.
/// - `children` - Half open range of child indices at the next level, empty for leaves.
/// - `points` - Half open range of the box's points in tree order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeBox {
    /// Level of the box.
    pub level: u64,

    /// Index of the box at its level.
    pub index: usize,

    /// Index of the parent at the previous level.
    pub parent: Option<usize>,

    /// Position within the parent.
    pub orthant: usize,

    /// Child index range at the next level.
    pub children: (usize, usize),

    /// Point range in tree order.
    pub points: (usize, usize),
}

/// A tree built over the points held on a single node.
///
/// Points are sorted into tree order at construction, so that the points of any box, leaf or
/// otherwise, form a contiguous range. Box centres are stored per level, in the same order as
/// the boxes.
///
/// # Fields
/// - `dim` - Spatial dimension of the points.
/// - `domain` - Cubic domain enclosing all points.
/// - `leaf_capacity` - A box is refined while it holds more points than this.
/// - `coordinates` - Point coordinates in tree order, row major.
/// - `global_indices` - Position of each sorted point in the input.
/// - `levels` - The boxes at each level, in construction order.
/// - `centres` - Box centres at each level, row major.
/// - `leaves` - All leaves, sorted by level and then by index.
#[derive(Debug, Clone, Default)]
pub struct SingleNodeTree {
    /// Spatial dimension.
    pub dim: usize,

    /// Domain of the tree.
    pub domain: Domain,

    /// Maximum number of points in a leaf, unless the deepest level is reached.
    pub leaf_capacity: usize,

    /// Coordinates in tree order.
    pub coordinates: Vec<f64>,

    /// Map from tree order to input order.
    pub global_indices: Vec<usize>,

    /// Boxes at each level.
    pub levels: Vec<Vec<TreeBox>>,

    /// Box centres at each level.
    pub centres: Vec<Vec<f64>>,

    /// All leaves.
    pub leaves: Vec<TreeBox>,
}
