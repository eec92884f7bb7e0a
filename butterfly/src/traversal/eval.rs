//! Level synchronised butterfly traversal
use log::debug;
use rlst::c64;

use crate::traits::{
    butterfly::{Evaluate, SourceToTargetTranslation, SourceTranslation, TargetTranslation},
    kernel::OscillatoryKernel,
    tree::SingleTree,
    types::ButterflyError,
};
use crate::traversal::{builder::map_charges, types::Butterfly};

impl<K> Evaluate for Butterfly<K>
where
    K: OscillatoryKernel,
{
    fn evaluate(&mut self) -> Result<(), ButterflyError> {
        self.multipoles.clear();
        self.locals.clear();
        self.potentials
            .iter_mut()
            .for_each(|p| *p = c64::new(0., 0.));

        let operators = &self.operators;
        let split_level = operators.split_level;

        for level in 0..=operators.max_level {
            // Fill the (source box, target box) coefficients of this level
            if level <= split_level {
                operators.s2m(level, &mut self.multipoles)?;
                operators.m2m(level, &mut self.multipoles)?;
            } else {
                operators.s2l(level, &mut self.locals)?;
                operators.l2l(level, &mut self.locals)?;
            }

            if level == split_level {
                operators.m2l(level, &self.multipoles, &mut self.locals)?;
            }

            // Evaluate at the targets of boxes terminating at this level
            if level < split_level {
                operators.m2t(level, &self.multipoles, &mut self.potentials)?;
            } else {
                operators.l2t(level, &self.locals, &mut self.potentials)?;
            }

            debug!(
                "Traversal level {} of {} complete, split level {}",
                level, operators.max_level, split_level
            );
        }

        Ok(())
    }

    fn clear(&mut self, charges: &[c64]) -> Result<(), ButterflyError> {
        let source_tree = &self.operators.tree.source_tree;
        let expected = source_tree.n_coordinates_tot();
        if charges.len() != expected {
            return Err(ButterflyError::ChargeMismatch {
                expected,
                found: charges.len(),
            });
        }

        self.operators.charges = map_charges(source_tree.all_global_indices(), charges);
        self.multipoles.clear();
        self.locals.clear();
        self.potentials
            .iter_mut()
            .for_each(|p| *p = c64::new(0., 0.));

        Ok(())
    }
}
