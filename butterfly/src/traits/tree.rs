//! Tree Traits
use std::ops::Range;

/// Trees on a single node, whose boxes are addressed by (level, index) pairs.
pub trait SingleTree {
    /// A tree node.
    type Node: TreeNode + Clone + Copy;

    /// Spatial dimension of the points in the tree.
    fn dim(&self) -> usize;

    /// Number of levels, the root is level 0 so this is the depth plus one.
    fn n_levels(&self) -> usize;

    /// Get depth of tree.
    fn depth(&self) -> u64;

    /// Root node
    fn root(&self) -> Self::Node;

    /// Get a reference to keys at a given level, in their stable construction order.
    ///
    /// # Arguments
    /// * `level` - The level being queried.
    fn keys(&self, level: u64) -> Option<&[Self::Node]>;

    /// Number of keys at a given tree level
    ///
    /// # Arguments
    /// * `level` - The level being queried.
    fn n_keys(&self, level: u64) -> Option<usize>;

    /// Map from a (level, index) pair to a node
    ///
    /// # Arguments
    /// * `level` - Level of the node.
    /// * `index` - Index of the node at this level.
    fn node(&self, level: u64, index: usize) -> Option<&Self::Node>;

    /// Get a reference to all leaves, sorted by level and then by index.
    fn all_leaves(&self) -> &[Self::Node];

    /// Number of leaves
    fn n_leaves(&self) -> usize;

    /// Gets a reference to the coordinates contained within a node, in row major order
    /// [x_1, y_1, ..., x_N, y_N]. Defined for any node, not just leaves.
    ///
    /// # Arguments
    /// - `node` - node being queried.
    fn coordinates(&self, node: &Self::Node) -> &[f64];

    /// Query number of coordinates contained within a node.
    ///
    /// # Arguments
    /// - `node` - node being queried.
    fn n_coordinates(&self, node: &Self::Node) -> usize;

    /// Gets a reference to all coordinates in the tree, in tree order.
    fn all_coordinates(&self) -> &[f64];

    /// Total number of coordinates
    fn n_coordinates_tot(&self) -> usize;

    /// Map from each position in tree order to the position of the point in the input.
    fn all_global_indices(&self) -> &[usize];

    /// Centre of a node.
    ///
    /// # Arguments
    /// - `node` - node being queried.
    fn centre(&self, node: &Self::Node) -> &[f64];

    /// Half of the side length of every box at a level.
    ///
    /// # Arguments
    /// * `level` - The level being queried.
    fn half_width(&self, level: u64) -> f64;
}

/// Interface for the nodes of a tree.
pub trait TreeNode {
    /// Level of this node, the root is at level 0.
    fn level(&self) -> u64;

    /// Stable index of this node amongst the nodes at its level.
    fn level_index(&self) -> usize;

    /// Index of the parent at the previous level, `None` for the root.
    fn parent(&self) -> Option<usize>;

    /// Indices of the children at the next level, contiguous and possibly empty.
    fn children(&self) -> Range<usize>;

    /// Position of this node within its parent, bit `d` set when the node is in the upper half
    /// of the parent along axis `d`.
    fn orthant(&self) -> usize;

    /// Range of the node's points in tree order.
    fn point_range(&self) -> Range<usize>;

    /// A leaf has no children.
    fn is_leaf(&self) -> bool;
}

/// Source and target trees built independently, coupled by the butterfly traversal.
pub trait ButterflyTree {
    /// Tree associated with this butterfly tree
    type Tree: SingleTree;

    /// Get the source tree
    fn source_tree(&self) -> &Self::Tree;

    /// Get the target tree
    fn target_tree(&self) -> &Self::Tree;

    /// The deepest level both hierarchies can jointly address.
    fn max_level(&self) -> u64;
}
