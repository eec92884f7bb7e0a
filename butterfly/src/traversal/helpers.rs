//! Helper Functions
use itertools::Itertools;
use rlst::c64;

use crate::traits::{kernel::OscillatoryKernel, tree::TreeNode, types::ButterflyError};

/// Unit modulus factors exp(i sign Φ(target, s)) for each source point s.
///
/// # Arguments
/// * `kernel` - The oscillatory kernel.
/// * `target` - A single target point.
/// * `sources` - Source points in row major order.
/// * `sign` - Sign of the exponent, 1 or -1.
pub fn source_phases<K: OscillatoryKernel>(
    kernel: &K,
    target: &[f64],
    sources: &[f64],
    sign: f64,
) -> Vec<c64> {
    sources
        .chunks_exact(kernel.dim())
        .map(|source| c64::from_polar(1.0, sign * kernel.phase(target, source)))
        .collect_vec()
}

/// Unit modulus factors exp(i sign Φ(x, source)) for each target point x.
///
/// # Arguments
/// * `kernel` - The oscillatory kernel.
/// * `targets` - Target points in row major order.
/// * `source` - A single source point.
/// * `sign` - Sign of the exponent, 1 or -1.
pub fn target_phases<K: OscillatoryKernel>(
    kernel: &K,
    targets: &[f64],
    source: &[f64],
    sign: f64,
) -> Vec<c64> {
    targets
        .chunks_exact(kernel.dim())
        .map(|target| c64::from_polar(1.0, sign * kernel.phase(target, source)))
        .collect_vec()
}

/// Split a buffer in tree order into the disjoint point ranges of a set of boxes, which must be
/// ordered by their ranges.
///
/// # Arguments
/// * `buffer` - Data associated with points in tree order.
/// * `nodes` - Boxes with non overlapping, increasing point ranges.
pub fn split_point_ranges_mut<'a, T, N: TreeNode>(
    buffer: &'a mut [T],
    nodes: &[N],
) -> Result<Vec<&'a mut [T]>, ButterflyError> {
    let mut rest = buffer;
    let mut offset = 0;
    let mut result = Vec::with_capacity(nodes.len());

    for node in nodes {
        let range = node.point_range();
        if range.start < offset || range.end - offset > rest.len() {
            return Err(ButterflyError::Failed(format!(
                "Point range {:?} overlaps or exceeds buffer",
                range
            )));
        }

        let tmp = std::mem::take(&mut rest);
        let (_, tail) = tmp.split_at_mut(range.start - offset);
        let (current, tail) = tail.split_at_mut(range.end - range.start);
        result.push(current);
        rest = tail;
        offset = range.end;
    }

    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::types::TreeBox;

    #[test]
    fn test_split_point_ranges() {
        let mut buffer = (0..10).collect_vec();
        let nodes = [(1, 3), (3, 4), (7, 10)]
            .iter()
            .map(|&points| TreeBox {
                points,
                ..Default::default()
            })
            .collect_vec();

        let slices = split_point_ranges_mut(&mut buffer, &nodes).unwrap();
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0], &[1, 2]);
        assert_eq!(slices[1], &[3]);
        assert_eq!(slices[2], &[7, 8, 9]);

        let overlapping = [nodes[1], nodes[0]];
        assert!(split_point_ranges_mut(&mut buffer, &overlapping).is_err());
    }
}
