//! Multipole translations
use rayon::prelude::*;
use rlst::{c64, empty_array, rlst_dynamic_array2, MultIntoResize, RawAccess, RawAccessMut};

use crate::traits::{
    butterfly::SourceTranslation,
    kernel::OscillatoryKernel,
    tree::{SingleTree, TreeNode},
    types::{ButterflyError, Operator},
};
use crate::traversal::{
    dispatch::source_operator, expansion::ExpansionTable, helpers::source_phases,
    types::OperatorSuite,
};

impl<K> SourceTranslation for OperatorSuite<K>
where
    K: OscillatoryKernel,
{
    fn s2m(&self, level: u64, multipoles: &mut ExpansionTable<c64>) -> Result<(), ButterflyError> {
        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;
        let source_level = self.max_level - level;

        let (sources, targets) = self.boxes(level)?;
        let half_width = source_tree.half_width(source_level);
        let n_targets = targets.len();
        let ncoeffs = self.ncoeffs;

        let Some(current) = multipoles.level_mut(level) else {
            return Err(ButterflyError::Failed(format!(
                "S2M failed, no multipoles at level {}",
                level
            )));
        };

        current
            .par_chunks_exact_mut(n_targets * ncoeffs)
            .zip(sources.par_iter())
            .filter(|(_, source)| {
                source_operator(level, self.split_level, source.is_leaf()) == Operator::S2M
            })
            .for_each(|(row, source)| {
                let coordinates = source_tree.coordinates(source);
                let charges = &self.charges[source.point_range()];
                let centre = source_tree.centre(source);
                let grid = self.grid.grid(centre, half_width);

                // Charges modulated by the phase at each target box centre, [n_sources, n_targets]
                let mut modulated = rlst_dynamic_array2!(c64, [charges.len(), n_targets]);
                for (j, target) in targets.iter().enumerate() {
                    let phases = source_phases(
                        &self.kernel,
                        target_tree.centre(target),
                        coordinates,
                        1.0,
                    );
                    for (i, (phase, charge)) in phases.iter().zip(charges).enumerate() {
                        modulated[[i, j]] = phase * charge;
                    }
                }

                let basis = self.grid.basis_matrix(coordinates, centre, half_width);
                let projected = empty_array::<c64, 2>()
                    .simple_mult_into_resize(basis.view(), modulated.view());

                for (j, (target, multipole)) in
                    targets.iter().zip(row.chunks_exact_mut(ncoeffs)).enumerate()
                {
                    let demodulation =
                        source_phases(&self.kernel, target_tree.centre(target), &grid, -1.0);
                    multipole
                        .iter_mut()
                        .zip(demodulation)
                        .enumerate()
                        .for_each(|(t, (m, phase))| *m = phase * projected[[t, j]]);
                }
            });

        Ok(())
    }

    fn m2m(&self, level: u64, multipoles: &mut ExpansionTable<c64>) -> Result<(), ButterflyError> {
        if level == 0 {
            return Ok(());
        }

        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;
        let source_level = self.max_level - level;

        let (sources, targets) = self.boxes(level)?;
        let Some(children) = source_tree.keys(source_level + 1) else {
            return Err(ButterflyError::Failed(format!(
                "M2M failed, no source boxes at level {}",
                source_level + 1
            )));
        };
        let Some(n_parent_targets) = target_tree.n_keys(level - 1) else {
            return Err(ButterflyError::Failed(format!(
                "M2M failed, no target boxes at level {}",
                level - 1
            )));
        };

        let half_width = source_tree.half_width(source_level);
        let child_half_width = source_tree.half_width(source_level + 1);
        let n_targets = targets.len();
        let ncoeffs = self.ncoeffs;
        let child_row_len = n_parent_targets * ncoeffs;

        let Some((previous, current)) = multipoles.split_level_mut(level) else {
            return Err(ButterflyError::Failed(format!(
                "M2M failed, no multipoles at level {}",
                level
            )));
        };

        current
            .par_chunks_exact_mut(n_targets * ncoeffs)
            .zip(sources.par_iter())
            .filter(|(_, source)| {
                source_operator(level, self.split_level, source.is_leaf()) == Operator::M2M
            })
            .for_each(|(row, source)| {
                let mut aggregated = rlst_dynamic_array2!(c64, [ncoeffs, n_targets]);

                for child in source.children().map(|index| &children[index]) {
                    let child_grid = self.grid.grid(source_tree.centre(child), child_half_width);
                    let index = child.level_index();
                    let child_row = &previous[index * child_row_len..(index + 1) * child_row_len];

                    // Child multipoles paired with each target box's parent, re-modulated to the
                    // target box's centre
                    let mut modulated = rlst_dynamic_array2!(c64, [ncoeffs, n_targets]);
                    for (j, target) in targets.iter().enumerate() {
                        let Some(parent) = target.parent() else {
                            continue;
                        };
                        let delta = &child_row[parent * ncoeffs..(parent + 1) * ncoeffs];
                        let phases = source_phases(
                            &self.kernel,
                            target_tree.centre(target),
                            &child_grid,
                            1.0,
                        );
                        for (t, (phase, d)) in phases.iter().zip(delta).enumerate() {
                            modulated[[t, j]] = phase * d;
                        }
                    }

                    let contribution = empty_array::<c64, 2>().simple_mult_into_resize(
                        self.source_data[child.orthant()].view(),
                        modulated.view(),
                    );

                    aggregated
                        .data_mut()
                        .iter_mut()
                        .zip(contribution.data())
                        .for_each(|(a, c)| *a += c);
                }

                let grid = self.grid.grid(source_tree.centre(source), half_width);
                for (j, (target, multipole)) in
                    targets.iter().zip(row.chunks_exact_mut(ncoeffs)).enumerate()
                {
                    let demodulation =
                        source_phases(&self.kernel, target_tree.centre(target), &grid, -1.0);
                    multipole
                        .iter_mut()
                        .zip(demodulation)
                        .enumerate()
                        .for_each(|(t, (m, phase))| *m = phase * aggregated[[t, j]]);
                }
            });

        Ok(())
    }
}
