//! Crossover and direct source to local translations
use rayon::prelude::*;
use rlst::c64;

use crate::traits::{
    butterfly::SourceToTargetTranslation,
    kernel::OscillatoryKernel,
    tree::{SingleTree, TreeNode},
    types::{ButterflyError, Operator},
};
use crate::traversal::{
    dispatch::source_operator, expansion::ExpansionTable, types::OperatorSuite,
};

impl<K> SourceToTargetTranslation for OperatorSuite<K>
where
    K: OscillatoryKernel,
{
    fn m2l(
        &self,
        level: u64,
        multipoles: &ExpansionTable<c64>,
        locals: &mut ExpansionTable<c64>,
    ) -> Result<(), ButterflyError> {
        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;
        let source_level = self.max_level - level;

        let (sources, targets) = self.boxes(level)?;
        let source_half_width = source_tree.half_width(source_level);
        let target_half_width = target_tree.half_width(level);
        let n_sources = sources.len();
        let n_targets = targets.len();
        let ncoeffs = self.ncoeffs;

        let Some(multipoles) = multipoles.level(level) else {
            return Err(ButterflyError::Failed(format!(
                "M2L failed, no multipoles at level {}",
                level
            )));
        };
        let Some(current) = locals.level_mut(level) else {
            return Err(ButterflyError::Failed(format!(
                "M2L failed, no locals at level {}",
                level
            )));
        };

        // Source grids are shared by every target box
        let source_grids = sources
            .iter()
            .map(|source| self.grid.grid(source_tree.centre(source), source_half_width))
            .collect::<Vec<_>>();

        current
            .par_chunks_exact_mut(n_sources * ncoeffs)
            .zip(targets.par_iter())
            .for_each(|(row, target)| {
                let target_grid = self.grid.grid(target_tree.centre(target), target_half_width);
                let j = target.level_index();

                for (i, (local, source_grid)) in
                    row.chunks_exact_mut(ncoeffs).zip(&source_grids).enumerate()
                {
                    let offset = (i * n_targets + j) * ncoeffs;
                    let multipole = &multipoles[offset..offset + ncoeffs];
                    self.kernel
                        .evaluate_st(source_grid, &target_grid, multipole, local);
                }
            });

        Ok(())
    }

    fn s2l(&self, level: u64, locals: &mut ExpansionTable<c64>) -> Result<(), ButterflyError> {
        let source_tree = &self.tree.source_tree;
        let target_tree = &self.tree.target_tree;

        let (sources, targets) = self.boxes(level)?;
        let target_half_width = target_tree.half_width(level);
        let n_sources = sources.len();
        let ncoeffs = self.ncoeffs;

        // Source leaves injected directly at this level
        let leaves = sources
            .iter()
            .filter(|source| {
                source_operator(level, self.split_level, source.is_leaf()) == Operator::S2L
            })
            .collect::<Vec<_>>();

        if leaves.is_empty() {
            return Ok(());
        }

        let Some(current) = locals.level_mut(level) else {
            return Err(ButterflyError::Failed(format!(
                "S2L failed, no locals at level {}",
                level
            )));
        };

        current
            .par_chunks_exact_mut(n_sources * ncoeffs)
            .zip(targets.par_iter())
            .for_each(|(row, target)| {
                let target_grid = self.grid.grid(target_tree.centre(target), target_half_width);

                for source in leaves.iter() {
                    let i = source.level_index();
                    let local = &mut row[i * ncoeffs..(i + 1) * ncoeffs];
                    self.kernel.evaluate_st(
                        source_tree.coordinates(source),
                        &target_grid,
                        &self.charges[source.point_range()],
                        local,
                    );
                }
            });

        Ok(())
    }
}
