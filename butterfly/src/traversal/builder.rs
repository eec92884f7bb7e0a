//! Builder objects to construct butterfly evaluators
use itertools::Itertools;
use log::info;
use rlst::{c64, rlst_dynamic_array2, RawAccess, Shape};

use crate::traits::{
    kernel::OscillatoryKernel,
    tree::{SingleTree, TreeNode},
    types::ButterflyError,
};
use crate::traversal::{
    constants::MAX_COEFFICIENTS,
    dispatch::split_level,
    expansion::ExpansionTable,
    types::{Butterfly, ButterflyBuilder, ChebyshevGrid, Coordinates, DualTree, OperatorSuite},
};
use crate::tree::types::SingleNodeTree;

impl<K> ButterflyBuilder<K>
where
    K: OscillatoryKernel,
{
    /// Initialise an empty butterfly builder
    pub fn new() -> Self {
        Self {
            tree: None,
            charges: None,
            kernel: None,
            order: None,
        }
    }

    /// Associate the builder with independent source and target trees.
    ///
    /// # Arguments
    /// * `sources` - Source coordinates, of shape [dim, n_sources].
    /// * `targets` - Target coordinates, of shape [dim, n_targets].
    /// * `leaf_capacity` - Maximum number of points per leaf box.
    pub fn tree(
        mut self,
        sources: &Coordinates,
        targets: &Coordinates,
        leaf_capacity: usize,
    ) -> Result<Self, ButterflyError> {
        let [source_dim, n_sources] = sources.shape();
        let [target_dim, n_targets] = targets.shape();

        if n_sources == 0 || n_targets == 0 {
            return Err(ButterflyError::InvalidConfiguration(
                "Must have a positive number of source and target points".to_string(),
            ));
        }

        let source_tree = SingleNodeTree::new(sources.data(), source_dim, leaf_capacity)?;
        let target_tree = SingleNodeTree::new(targets.data(), target_dim, leaf_capacity)?;

        let max_level = source_tree.n_levels().min(target_tree.n_levels()) as u64 - 1;

        self.tree = Some(DualTree {
            source_tree,
            target_tree,
            max_level,
        });

        Ok(self)
    }

    /// For a builder with associated trees, specify evaluation parameters.
    ///
    /// # Arguments
    /// * `charges` - One charge per source, in the order the sources were supplied.
    /// * `order` - Interpolation order along each axis.
    /// * `kernel` - The oscillatory kernel.
    pub fn parameters(
        mut self,
        charges: &[c64],
        order: usize,
        kernel: K,
    ) -> Result<Self, ButterflyError> {
        let Some(tree) = self.tree.as_ref() else {
            return Err(ButterflyError::InvalidConfiguration(
                "Must build tree before specifying parameters".to_string(),
            ));
        };

        let source_dim = tree.source_tree.dim();
        let target_dim = tree.target_tree.dim();
        let kernel_dim = kernel.dim();
        if source_dim != target_dim || source_dim != kernel_dim {
            return Err(ButterflyError::DimensionMismatch {
                source_dim,
                target_dim,
                kernel_dim,
            });
        }

        let expected = tree.source_tree.n_coordinates_tot();
        if charges.len() != expected {
            return Err(ButterflyError::ChargeMismatch {
                expected,
                found: charges.len(),
            });
        }

        if order == 0 {
            return Err(ButterflyError::InvalidConfiguration(
                "Interpolation order must be positive".to_string(),
            ));
        }

        match order.checked_pow(kernel_dim as u32) {
            Some(ncoeffs) if ncoeffs <= MAX_COEFFICIENTS => {}
            _ => {
                return Err(ButterflyError::InvalidConfiguration(format!(
                    "Order {} in {} dimensions exceeds {} coefficients per box",
                    order, kernel_dim, MAX_COEFFICIENTS
                )))
            }
        }

        self.charges = Some(map_charges(
            tree.source_tree.all_global_indices(),
            charges,
        ));
        self.order = Some(order);
        self.kernel = Some(kernel);

        Ok(self)
    }

    /// Finalize and build the butterfly evaluator, allocating the bindings of every level.
    pub fn build(self) -> Result<Butterfly<K>, ButterflyError> {
        let (Some(tree), Some(charges), Some(kernel), Some(order)) =
            (self.tree, self.charges, self.kernel, self.order)
        else {
            return Err(ButterflyError::InvalidConfiguration(
                "Must specify trees and parameters before building".to_string(),
            ));
        };

        let max_level = tree.max_level;
        let split_level = split_level(max_level)?;
        let dim = tree.source_tree.dim();

        let grid = ChebyshevGrid::new(order, dim);
        let ncoeffs = grid.ncoeffs();

        let n_orthants = 1 << dim;
        let source_data = (0..n_orthants)
            .map(|orthant| grid.child_to_parent(orthant))
            .collect_vec();
        let target_data = source_data
            .iter()
            .map(|matrix| {
                let [rows, cols] = matrix.shape();
                let mut transpose = rlst_dynamic_array2!(c64, [cols, rows]);
                for i in 0..rows {
                    for j in 0..cols {
                        transpose[[j, i]] = matrix[[i, j]];
                    }
                }
                transpose
            })
            .collect_vec();

        let (multipole_shapes, local_shapes) = binding_shapes(&tree)?;
        let multipoles = ExpansionTable::new(multipole_shapes, ncoeffs);
        let locals = ExpansionTable::new(local_shapes, ncoeffs);

        let orphans = orphans(&tree);

        let potentials = vec![c64::new(0., 0.); tree.target_tree.n_coordinates_tot()];

        info!(
            "Butterfly built: {} source levels, {} target levels, max level {}, split level {}, {} coefficients per pair, {} multipole and {} local coefficients",
            tree.source_tree.n_levels(),
            tree.target_tree.n_levels(),
            max_level,
            split_level,
            ncoeffs,
            multipoles.len(),
            locals.len()
        );

        Ok(Butterfly {
            operators: OperatorSuite {
                tree,
                kernel,
                order,
                ncoeffs,
                dim,
                max_level,
                split_level,
                grid,
                source_data,
                target_data,
                charges,
                orphans,
            },
            multipoles,
            locals,
            potentials,
        })
    }
}

/// Reorder charges from input order into tree order.
///
/// # Arguments
/// * `global_indices` - Position in the input of each point in tree order.
/// * `charges` - Charges in input order.
pub fn map_charges(global_indices: &[usize], charges: &[c64]) -> Vec<c64> {
    global_indices.iter().map(|&i| charges[i]).collect_vec()
}

/// Shapes of the multipole and local bindings at each traversal level. Multipoles at level `l`
/// are indexed [source box][target box], locals [target box][source box], with source boxes at
/// source level `max_level - l` and target boxes at target level `l`.
pub fn binding_shapes(
    tree: &DualTree,
) -> Result<(Vec<(usize, usize)>, Vec<(usize, usize)>), ButterflyError> {
    let mut multipole_shapes = Vec::new();
    let mut local_shapes = Vec::new();

    for level in 0..=tree.max_level {
        let n_sources = tree
            .source_tree
            .n_keys(tree.max_level - level)
            .ok_or_else(|| {
                ButterflyError::Failed(format!(
                    "No source boxes at level {}",
                    tree.max_level - level
                ))
            })?;
        let n_targets = tree
            .target_tree
            .n_keys(level)
            .ok_or_else(|| ButterflyError::Failed(format!("No target boxes at level {}", level)))?;

        multipole_shapes.push((n_sources, n_targets));
        local_shapes.push((n_targets, n_sources));
    }

    Ok((multipole_shapes, local_shapes))
}

/// For each traversal level, the source leaves strictly coarser than the source level visited,
/// whose sources no box at that level represents.
fn orphans(tree: &DualTree) -> Vec<Vec<usize>> {
    (0..=tree.max_level)
        .map(|level| {
            let source_level = tree.max_level - level;
            tree.source_tree
                .all_leaves()
                .iter()
                .enumerate()
                .filter(|(_, leaf)| leaf.level() < source_level)
                .map(|(i, _)| i)
                .collect_vec()
        })
        .collect_vec()
}
