//! Implementation of constructors for single node trees.
use std::ops::Range;

use itertools::Itertools;
use log::debug;

use crate::traits::{
    tree::{SingleTree, TreeNode},
    types::ButterflyError,
};
use crate::tree::{
    constants::{DEEPEST_LEVEL, MAX_DIMENSION},
    types::{Domain, SingleNodeTree, TreeBox},
};

impl SingleNodeTree {
    /// Constructor for adaptive trees on a single node. A box is split into at most 2^D
    /// children while it holds more than `leaf_capacity` points and is above the deepest level,
    /// children that would hold no points are never created.
    ///
    /// # Arguments
    /// * `coordinates` - A slice of point coordinates, expected in row major order.
    /// \[x_1, y_1, ..., x_N, y_N\].
    /// * `dim` - Spatial dimension of the points.
    /// * `leaf_capacity` - Maximum number of points in a leaf.
    pub fn new(
        coordinates: &[f64],
        dim: usize,
        leaf_capacity: usize,
    ) -> Result<SingleNodeTree, ButterflyError> {
        if dim == 0 || dim > MAX_DIMENSION {
            return Err(ButterflyError::InvalidConfiguration(format!(
                "Trees must have a spatial dimension between 1 and {}, found {}",
                MAX_DIMENSION, dim
            )));
        }

        if leaf_capacity == 0 {
            return Err(ButterflyError::InvalidConfiguration(
                "Leaf capacity must be positive".to_string(),
            ));
        }

        if coordinates.is_empty() || coordinates.len() % dim != 0 {
            return Err(ButterflyError::InvalidConfiguration(format!(
                "Expected a positive multiple of {} coordinates, found {}",
                dim,
                coordinates.len()
            )));
        }

        let n_points = coordinates.len() / dim;
        let domain = Domain::from_local_points(coordinates, dim);

        let mut indices = (0..n_points).collect_vec();

        let root = TreeBox {
            level: 0,
            index: 0,
            parent: None,
            orthant: 0,
            children: (0, 0),
            points: (0, n_points),
        };

        let mut levels = vec![vec![root]];
        let mut centres = vec![domain.centre()];

        let mut level = 0;
        while level < DEEPEST_LEVEL as usize {
            let child_half_width = domain.side_length / (1u64 << (level + 2)) as f64;
            let mut next_boxes = Vec::new();
            let mut next_centres = Vec::new();

            for (index, node) in levels[level].iter_mut().enumerate() {
                let (start, end) = node.points;
                if end - start <= leaf_capacity {
                    continue;
                }

                let centre = &centres[level][index * dim..(index + 1) * dim];
                let orthant = |i: usize| {
                    let point = &coordinates[i * dim..(i + 1) * dim];
                    point
                        .iter()
                        .zip(centre)
                        .enumerate()
                        .fold(0usize, |o, (d, (x, c))| if x >= c { o | (1 << d) } else { o })
                };

                // Stable sort keeps the input order of points within each child
                indices[start..end].sort_by_key(|&i| orthant(i));

                let first_child = next_boxes.len();
                let mut child_start = start;
                for (o, group) in &indices[start..end].iter().chunk_by(|&&i| orthant(i)) {
                    let child_end = child_start + group.count();

                    next_boxes.push(TreeBox {
                        level: (level + 1) as u64,
                        index: next_boxes.len(),
                        parent: Some(index),
                        orthant: o,
                        children: (0, 0),
                        points: (child_start, child_end),
                    });

                    next_centres.extend(centre.iter().enumerate().map(|(d, c)| {
                        if o & (1 << d) != 0 {
                            c + child_half_width
                        } else {
                            c - child_half_width
                        }
                    }));

                    child_start = child_end;
                }
                node.children = (first_child, next_boxes.len());
            }

            if next_boxes.is_empty() {
                break;
            }

            levels.push(next_boxes);
            centres.push(next_centres);
            level += 1;
        }

        let sorted_coordinates = indices
            .iter()
            .flat_map(|&i| coordinates[i * dim..(i + 1) * dim].iter().cloned())
            .collect_vec();

        let leaves = levels
            .iter()
            .flat_map(|boxes| boxes.iter().filter(|node| node.is_leaf()).cloned())
            .collect_vec();

        debug!(
            "Built {}D tree over {} points with {} levels and {} leaves",
            dim,
            n_points,
            levels.len(),
            leaves.len()
        );

        Ok(SingleNodeTree {
            dim,
            domain,
            leaf_capacity,
            coordinates: sorted_coordinates,
            global_indices: indices,
            levels,
            centres,
            leaves,
        })
    }
}

impl TreeNode for TreeBox {
    fn level(&self) -> u64 {
        self.level
    }

    fn level_index(&self) -> usize {
        self.index
    }

    fn parent(&self) -> Option<usize> {
        self.parent
    }

    fn children(&self) -> Range<usize> {
        self.children.0..self.children.1
    }

    fn orthant(&self) -> usize {
        self.orthant
    }

    fn point_range(&self) -> Range<usize> {
        self.points.0..self.points.1
    }

    fn is_leaf(&self) -> bool {
        self.children.0 == self.children.1
    }
}

impl SingleTree for SingleNodeTree {
    type Node = TreeBox;

    fn dim(&self) -> usize {
        self.dim
    }

    fn n_levels(&self) -> usize {
        self.levels.len()
    }

    fn depth(&self) -> u64 {
        (self.levels.len() - 1) as u64
    }

    fn root(&self) -> Self::Node {
        self.levels[0][0]
    }

    fn keys(&self, level: u64) -> Option<&[Self::Node]> {
        self.levels.get(level as usize).map(|boxes| boxes.as_slice())
    }

    fn n_keys(&self, level: u64) -> Option<usize> {
        self.levels.get(level as usize).map(|boxes| boxes.len())
    }

    fn node(&self, level: u64, index: usize) -> Option<&Self::Node> {
        self.levels.get(level as usize)?.get(index)
    }

    fn all_leaves(&self) -> &[Self::Node] {
        &self.leaves
    }

    fn n_leaves(&self) -> usize {
        self.leaves.len()
    }

    fn coordinates(&self, node: &Self::Node) -> &[f64] {
        &self.coordinates[node.points.0 * self.dim..node.points.1 * self.dim]
    }

    fn n_coordinates(&self, node: &Self::Node) -> usize {
        node.points.1 - node.points.0
    }

    fn all_coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    fn n_coordinates_tot(&self) -> usize {
        self.global_indices.len()
    }

    fn all_global_indices(&self) -> &[usize] {
        &self.global_indices
    }

    fn centre(&self, node: &Self::Node) -> &[f64] {
        &self.centres[node.level as usize][node.index * self.dim..(node.index + 1) * self.dim]
    }

    fn half_width(&self, level: u64) -> f64 {
        self.domain.side_length / (1u64 << (level + 1)) as f64
    }
}

#[cfg(test)]
mod test {
    use rlst::RawAccess;

    use super::*;
    use crate::tree::{
        constants::DEFAULT_LEAF_CAPACITY,
        helpers::{clustered_points_fixture, points_fixture},
    };

    fn check_invariants(tree: &SingleNodeTree) {
        let n_points = tree.n_coordinates_tot();

        // Global indices are a permutation
        let mut sorted = tree.all_global_indices().to_vec();
        sorted.sort();
        assert!(sorted.iter().enumerate().all(|(i, &j)| i == j));

        for level in 0..tree.n_levels() as u64 {
            let keys = tree.keys(level).unwrap();

            // Point ranges at a level are disjoint and ordered by index
            let mut previous_end = 0;
            for (index, key) in keys.iter().enumerate() {
                assert_eq!(key.level_index(), index);
                assert_eq!(key.level(), level);
                assert!(key.points.0 >= previous_end);
                assert!(key.points.1 > key.points.0);
                previous_end = key.points.1;

                // Children are contiguous and cover the parent's points
                if !key.is_leaf() {
                    let children = tree.keys(level + 1).unwrap();
                    let first = &children[key.children().start];
                    let last = &children[key.children().end - 1];
                    assert_eq!(first.points.0, key.points.0);
                    assert_eq!(last.points.1, key.points.1);
                    for child in key.children() {
                        assert_eq!(children[child].parent(), Some(index));
                    }
                }

                // Points lie within the box
                let centre = tree.centre(key);
                let hw = tree.half_width(level);
                for point in tree.coordinates(key).chunks_exact(tree.dim()) {
                    for (x, c) in point.iter().zip(centre) {
                        assert!((x - c).abs() <= hw + 1e-12);
                    }
                }
            }
        }

        // Leaves partition all points and respect the capacity
        let n_leaf_points: usize = tree.all_leaves().iter().map(|l| tree.n_coordinates(l)).sum();
        assert_eq!(n_leaf_points, n_points);
        for leaf in tree.all_leaves() {
            assert!(leaf.is_leaf());
            assert!(
                tree.n_coordinates(leaf) <= tree.leaf_capacity || leaf.level == DEEPEST_LEVEL
            );
        }
        assert!(tree
            .all_leaves()
            .windows(2)
            .all(|w| (w[0].level, w[0].index) < (w[1].level, w[1].index)));
    }

    #[test]
    pub fn test_uniform_tree() {
        for dim in 1..4 {
            let n_points = 1000;
            let points = points_fixture::<f64>(n_points, dim, None, None, Some(0));
            let tree = SingleNodeTree::new(points.data(), dim, DEFAULT_LEAF_CAPACITY).unwrap();

            assert_eq!(tree.n_coordinates_tot(), n_points);
            assert!(tree.depth() > 0);
            check_invariants(&tree);
        }
    }

    #[test]
    pub fn test_adaptive_tree() {
        let dim = 2;
        let points = clustered_points_fixture(2000, dim, 2, 0.05, Some(1));
        let tree = SingleNodeTree::new(points.data(), dim, 8).unwrap();

        check_invariants(&tree);

        // A clustered distribution produces leaves at several levels
        let leaf_levels = tree.all_leaves().iter().map(|l| l.level).unique().count();
        assert!(leaf_levels > 1);
    }

    #[test]
    pub fn test_sorted_coordinates() {
        let dim = 3;
        let points = points_fixture::<f64>(500, dim, Some(-1.0), Some(1.0), Some(3));
        let tree = SingleNodeTree::new(points.data(), dim, 10).unwrap();

        for (i, &j) in tree.all_global_indices().iter().enumerate() {
            assert_eq!(
                &tree.all_coordinates()[i * dim..(i + 1) * dim],
                &points.data()[j * dim..(j + 1) * dim]
            );
        }
    }

    #[test]
    pub fn test_small_tree() {
        let points = vec![0.1, 0.2, 0.3];
        let tree = SingleNodeTree::new(&points, 1, 16).unwrap();

        assert_eq!(tree.n_levels(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    pub fn test_coincident_points() {
        let points = vec![0.5; 40];
        let tree = SingleNodeTree::new(&points, 2, 4).unwrap();

        assert_eq!(tree.depth(), DEEPEST_LEVEL);
        assert_eq!(tree.n_leaves(), 1);
        check_invariants(&tree);
    }

    #[test]
    pub fn test_invalid_input() {
        assert!(SingleNodeTree::new(&[], 1, 16).is_err());
        assert!(SingleNodeTree::new(&[0.1, 0.2, 0.3], 2, 16).is_err());
        assert!(SingleNodeTree::new(&[0.1, 0.2], 0, 16).is_err());
        assert!(SingleNodeTree::new(&[0.1, 0.2], 1, 0).is_err());
        assert!(SingleNodeTree::new(&[0.5; 17], 17, 16).is_err());
    }
}
