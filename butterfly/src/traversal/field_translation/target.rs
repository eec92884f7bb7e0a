//! Local translations and evaluation at targets
use itertools::Itertools;
use rayon::prelude::*;
use rlst::{c64, empty_array, rlst_dynamic_array2, MultIntoResize};

use crate::traits::{
    butterfly::TargetTranslation,
    kernel::OscillatoryKernel,
    tree::{SingleTree, TreeNode},
    types::{ButterflyError, Operator},
};
use crate::traversal::{
    dispatch::{source_operator, target_operator},
    expansion::ExpansionTable,
    helpers::{split_point_ranges_mut, target_phases},
    types::OperatorSuite,
};
use crate::tree::types::TreeBox;

impl<K> OperatorSuite<K>
where
    K: OscillatoryKernel,
{
    /// Target boxes at a level that terminate there with the given operator.
    fn terminating(&self, level: u64, operator: Operator) -> Result<Vec<TreeBox>, ButterflyError> {
        let (_, targets) = self.boxes(level)?;
        Ok(targets
            .iter()
            .filter(|target| {
                target_operator(level, self.split_level, self.max_level, target.is_leaf())
                    == Some(operator)
            })
            .cloned()
            .collect_vec())
    }

    /// Direct contribution of the source leaves no box at this level's source level represents,
    /// to the targets of a terminating target box.
    ///
    /// # Arguments
    /// * `level` - The traversal level at which the target box terminates.
    /// * `target` - The terminating target box.
    /// * `potentials` - Results associated with the target box's points.
    pub fn orphan_completion(&self, level: u64, target: &TreeBox, potentials: &mut [c64]) {
        let source_tree = &self.tree.source_tree;
        let targets = self.tree.target_tree.coordinates(target);
        let leaves = source_tree.all_leaves();

        for &index in self.orphans[level as usize].iter() {
            let leaf = &leaves[index];
            self.kernel.evaluate_st(
                source_tree.coordinates(leaf),
                targets,
                &self.charges[leaf.point_range()],
                potentials,
            );
        }
    }
}

impl<K> TargetTranslation for OperatorSuite<K>
where
    K: OscillatoryKernel,
{
    fn l2l(&self, level: u64, locals: &mut ExpansionTable<c64>) -> Result<(), ButterflyError> {
        if level == 0 {
            return Ok(());
        }

        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;
        let source_level = self.max_level - level;

        let (sources, targets) = self.boxes(level)?;
        let Some(children) = source_tree.keys(source_level + 1) else {
            return Err(ButterflyError::Failed(format!(
                "L2L failed, no source boxes at level {}",
                source_level + 1
            )));
        };
        let Some(parents) = target_tree.keys(level - 1) else {
            return Err(ButterflyError::Failed(format!(
                "L2L failed, no target boxes at level {}",
                level - 1
            )));
        };

        let half_width = target_tree.half_width(level);
        let parent_half_width = target_tree.half_width(level - 1);
        let n_sources = sources.len();
        let ncoeffs = self.ncoeffs;
        let parent_row_len = children.len() * ncoeffs;

        let Some((previous, current)) = locals.split_level_mut(level) else {
            return Err(ButterflyError::Failed(format!(
                "L2L failed, no locals at level {}",
                level
            )));
        };

        current
            .par_chunks_exact_mut(n_sources * ncoeffs)
            .zip(targets.par_iter())
            .for_each(|(row, target)| {
                let Some(parent_index) = target.parent() else {
                    return;
                };
                let parent = &parents[parent_index];
                let parent_row =
                    &previous[parent_index * parent_row_len..(parent_index + 1) * parent_row_len];

                let grid = self.grid.grid(target_tree.centre(target), half_width);
                let parent_grid = self
                    .grid
                    .grid(target_tree.centre(parent), parent_half_width);
                let interpolation = &self.target_data[target.orthant()];

                for (source, local) in sources.iter().zip(row.chunks_exact_mut(ncoeffs)) {
                    if source_operator(level, self.split_level, source.is_leaf()) != Operator::L2L
                    {
                        continue;
                    }

                    let source_children = source.children().map(|i| &children[i]).collect_vec();

                    // Parent locals of each child source box, demodulated at the child's centre
                    let mut demodulated = rlst_dynamic_array2!(c64, [ncoeffs, source_children.len()]);
                    for (k, child) in source_children.iter().enumerate() {
                        let index = child.level_index();
                        let u = &parent_row[index * ncoeffs..(index + 1) * ncoeffs];
                        let phases =
                            target_phases(&self.kernel, &parent_grid, source_tree.centre(child), -1.0);
                        for (t, (phase, u)) in phases.iter().zip(u).enumerate() {
                            demodulated[[t, k]] = phase * u;
                        }
                    }

                    let interpolated = empty_array::<c64, 2>()
                        .simple_mult_into_resize(interpolation.view(), demodulated.view());

                    for (k, child) in source_children.iter().enumerate() {
                        let phases =
                            target_phases(&self.kernel, &grid, source_tree.centre(child), 1.0);
                        local
                            .iter_mut()
                            .zip(phases)
                            .enumerate()
                            .for_each(|(t, (l, phase))| *l += phase * interpolated[[t, k]]);
                    }
                }
            });

        Ok(())
    }

    fn m2t(
        &self,
        level: u64,
        multipoles: &ExpansionTable<c64>,
        potentials: &mut [c64],
    ) -> Result<(), ButterflyError> {
        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;
        let source_level = self.max_level - level;

        let (sources, targets) = self.boxes(level)?;
        let half_width = source_tree.half_width(source_level);
        let n_targets = targets.len();
        let ncoeffs = self.ncoeffs;

        let terminating = self.terminating(level, Operator::M2T)?;
        if terminating.is_empty() {
            return Ok(());
        }

        let Some(multipoles) = multipoles.level(level) else {
            return Err(ButterflyError::Failed(format!(
                "M2T failed, no multipoles at level {}",
                level
            )));
        };

        let source_grids = sources
            .iter()
            .map(|source| self.grid.grid(source_tree.centre(source), half_width))
            .collect_vec();

        let potentials = split_point_ranges_mut(potentials, &terminating)?;

        terminating
            .par_iter()
            .zip(potentials.into_par_iter())
            .for_each(|(target, potentials)| {
                let coordinates = target_tree.coordinates(target);
                let j = target.level_index();

                for (i, source_grid) in source_grids.iter().enumerate() {
                    let offset = (i * n_targets + j) * ncoeffs;
                    self.kernel.evaluate_st(
                        source_grid,
                        coordinates,
                        &multipoles[offset..offset + ncoeffs],
                        potentials,
                    );
                }

                self.orphan_completion(level, target, potentials);
            });

        Ok(())
    }

    fn l2t(
        &self,
        level: u64,
        locals: &ExpansionTable<c64>,
        potentials: &mut [c64],
    ) -> Result<(), ButterflyError> {
        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;

        let (sources, _) = self.boxes(level)?;
        let half_width = target_tree.half_width(level);
        let n_sources = sources.len();
        let ncoeffs = self.ncoeffs;
        let dim = self.dim;

        let terminating = self.terminating(level, Operator::L2T)?;
        if terminating.is_empty() {
            return Ok(());
        }

        let Some(locals) = locals.level(level) else {
            return Err(ButterflyError::Failed(format!(
                "L2T failed, no locals at level {}",
                level
            )));
        };

        let potentials = split_point_ranges_mut(potentials, &terminating)?;

        terminating
            .par_iter()
            .zip(potentials.into_par_iter())
            .for_each(|(target, potentials)| {
                let coordinates = target_tree.coordinates(target);
                let n_points = coordinates.len() / dim;
                let centre = target_tree.centre(target);
                let grid = self.grid.grid(centre, half_width);
                let row = &locals[target.level_index() * n_sources * ncoeffs
                    ..(target.level_index() + 1) * n_sources * ncoeffs];

                // Interpolation from the box's grid to its points, [n_points, ncoeffs]
                let mut interpolation = rlst_dynamic_array2!(c64, [n_points, ncoeffs]);
                for (i, point) in coordinates.chunks_exact(dim).enumerate() {
                    for (t, value) in self.grid.basis(point, centre, half_width).iter().enumerate() {
                        interpolation[[i, t]] = c64::new(*value, 0.);
                    }
                }

                // Locals demodulated at each source box centre, [ncoeffs, n_sources]
                let mut demodulated = rlst_dynamic_array2!(c64, [ncoeffs, n_sources]);
                for (k, (source, local)) in sources.iter().zip(row.chunks_exact(ncoeffs)).enumerate()
                {
                    let phases = target_phases(&self.kernel, &grid, source_tree.centre(source), -1.0);
                    for (t, (phase, u)) in phases.iter().zip(local).enumerate() {
                        demodulated[[t, k]] = phase * u;
                    }
                }

                let interpolated = empty_array::<c64, 2>()
                    .simple_mult_into_resize(interpolation.view(), demodulated.view());

                for (k, source) in sources.iter().enumerate() {
                    let phases =
                        target_phases(&self.kernel, coordinates, source_tree.centre(source), 1.0);
                    potentials
                        .iter_mut()
                        .zip(phases)
                        .enumerate()
                        .for_each(|(i, (p, phase))| *p += phase * interpolated[[i, k]]);
                }

                self.orphan_completion(level, target, potentials);
            });

        Ok(())
    }
}
