//! Access to the data of a butterfly evaluator.
use rlst::c64;

use crate::traits::{
    butterfly::DataAccess,
    tree::{ButterflyTree, SingleTree},
    types::ButterflyError,
};
use crate::traversal::{
    expansion::ExpansionTable,
    types::{Butterfly, DualTree, OperatorSuite},
};
use crate::tree::types::{SingleNodeTree, TreeBox};

impl ButterflyTree for DualTree {
    type Tree = SingleNodeTree;

    fn source_tree(&self) -> &Self::Tree {
        &self.source_tree
    }

    fn target_tree(&self) -> &Self::Tree {
        &self.target_tree
    }

    fn max_level(&self) -> u64 {
        self.max_level
    }
}

impl<K> OperatorSuite<K> {
    /// Source boxes at source level `max_level - level` and target boxes at target level `level`,
    /// the boxes paired at a traversal level.
    ///
    /// # Arguments
    /// * `level` - The traversal level.
    pub fn boxes(&self, level: u64) -> Result<(&[TreeBox], &[TreeBox]), ButterflyError> {
        if level > self.max_level {
            return Err(ButterflyError::Failed(format!(
                "Traversal level {} beyond deepest level {}",
                level, self.max_level
            )));
        }

        let source_level = self.max_level - level;
        let Some(sources) = self.tree.source_tree.keys(source_level) else {
            return Err(ButterflyError::Failed(format!(
                "No source boxes at level {}",
                source_level
            )));
        };
        let Some(targets) = self.tree.target_tree.keys(level) else {
            return Err(ButterflyError::Failed(format!(
                "No target boxes at level {}",
                level
            )));
        };

        Ok((sources, targets))
    }
}

impl<K> DataAccess for Butterfly<K> {
    type Kernel = K;
    type Tree = DualTree;

    fn tree(&self) -> &Self::Tree {
        &self.operators.tree
    }

    fn kernel(&self) -> &Self::Kernel {
        &self.operators.kernel
    }

    fn dim(&self) -> usize {
        self.operators.dim
    }

    fn order(&self) -> usize {
        self.operators.order
    }

    fn ncoeffs(&self) -> usize {
        self.operators.ncoeffs
    }

    fn max_level(&self) -> u64 {
        self.operators.max_level
    }

    fn split_level(&self) -> u64 {
        self.operators.split_level
    }

    fn multipoles(&self) -> &ExpansionTable<c64> {
        &self.multipoles
    }

    fn locals(&self) -> &ExpansionTable<c64> {
        &self.locals
    }

    fn multipole(&self, level: u64, source_index: usize, target_index: usize) -> Option<&[c64]> {
        self.multipoles.entry(level, source_index, target_index)
    }

    fn local(&self, level: u64, target_index: usize, source_index: usize) -> Option<&[c64]> {
        self.locals.entry(level, target_index, source_index)
    }

    fn potentials(&self) -> &[c64] {
        &self.potentials
    }

    fn results(&self) -> Vec<c64> {
        let mut results = vec![c64::new(0., 0.); self.potentials.len()];
        self.operators
            .tree
            .target_tree
            .all_global_indices()
            .iter()
            .zip(&self.potentials)
            .for_each(|(&i, &p)| results[i] = p);
        results
    }
}
