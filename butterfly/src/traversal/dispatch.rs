//! Classification of (source box, target box) pairs into operators.
use itertools::Itertools;

use crate::traits::{
    tree::{SingleTree, TreeNode},
    types::{ButterflyError, Operator},
};

/// Operators applied to a (source box, target box) pair at a traversal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Operator filling the pair's multipole or local coefficients.
    pub source: Operator,

    /// Crossover, only at the split level.
    pub crossover: Option<Operator>,

    /// Evaluation at targets, only when the target box terminates at this level.
    pub target: Option<Operator>,
}

/// A (source box, target box) pair at a traversal level, with its dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    /// Traversal level.
    pub level: u64,

    /// Index of the source box at source level `max_level - level`.
    pub source_index: usize,

    /// Index of the target box at target level `level`.
    pub target_index: usize,

    /// Operators applied to this pair.
    pub dispatch: Dispatch,
}

/// The crossover level, half the deepest traversal level rounded down. Must be positive.
///
/// # Arguments
/// * `max_level` - Deepest traversal level.
pub fn split_level(max_level: u64) -> Result<u64, ButterflyError> {
    let split = max_level / 2;
    if split == 0 {
        return Err(ButterflyError::InvalidConfiguration(format!(
            "Trees too shallow for a crossover, deepest traversal level is {}, at least 2 is required",
            max_level
        )));
    }
    Ok(split)
}

/// Operator that fills the coefficients of a pair.
///
/// # Arguments
/// * `level` - Traversal level.
/// * `split_level` - Crossover level.
/// * `source_is_leaf` - Whether the source box is a leaf.
pub fn source_operator(level: u64, split_level: u64, source_is_leaf: bool) -> Operator {
    if level <= split_level {
        if level == 0 || source_is_leaf {
            Operator::S2M
        } else {
            Operator::M2M
        }
    } else if source_is_leaf {
        Operator::S2L
    } else {
        Operator::L2L
    }
}

/// Operator that evaluates a pair's coefficients at the targets, if the target box terminates.
///
/// # Arguments
/// * `level` - Traversal level.
/// * `split_level` - Crossover level.
/// * `max_level` - Deepest traversal level.
/// * `target_is_leaf` - Whether the target box is a leaf.
pub fn target_operator(
    level: u64,
    split_level: u64,
    max_level: u64,
    target_is_leaf: bool,
) -> Option<Operator> {
    if level == max_level || target_is_leaf {
        if level < split_level {
            Some(Operator::M2T)
        } else {
            Some(Operator::L2T)
        }
    } else {
        None
    }
}

/// Classify a pair at a traversal level.
pub fn classify(
    level: u64,
    split_level: u64,
    max_level: u64,
    source_is_leaf: bool,
    target_is_leaf: bool,
) -> Dispatch {
    Dispatch {
        source: source_operator(level, split_level, source_is_leaf),
        crossover: (level == split_level).then_some(Operator::M2L),
        target: target_operator(level, split_level, max_level, target_is_leaf),
    }
}

/// Every pair visited at a traversal level, source boxes outermost.
///
/// # Arguments
/// * `source_tree` - Source tree, visited at level `max_level - level`.
/// * `target_tree` - Target tree, visited at level `level`.
/// * `level` - Traversal level.
/// * `split_level` - Crossover level.
/// * `max_level` - Deepest traversal level.
pub fn schedule<T: SingleTree>(
    source_tree: &T,
    target_tree: &T,
    level: u64,
    split_level: u64,
    max_level: u64,
) -> Result<Vec<Interaction>, ButterflyError> {
    if level > max_level {
        return Err(ButterflyError::Failed(format!(
            "Traversal level {} beyond deepest level {}",
            level, max_level
        )));
    }

    let sources = source_tree.keys(max_level - level).ok_or_else(|| {
        ButterflyError::Failed(format!("No source boxes at level {}", max_level - level))
    })?;
    let targets = target_tree
        .keys(level)
        .ok_or_else(|| ButterflyError::Failed(format!("No target boxes at level {}", level)))?;

    Ok(sources
        .iter()
        .cartesian_product(targets.iter())
        .map(|(source, target)| Interaction {
            level,
            source_index: source.level_index(),
            target_index: target.level_index(),
            dispatch: classify(
                level,
                split_level,
                max_level,
                source.is_leaf(),
                target.is_leaf(),
            ),
        })
        .collect_vec())
}
