//! Ragged storage for the coefficients bound to pairs of boxes at each traversal level.
use itertools::Itertools;
use num::Zero;

/// Coefficients of every (row box, column box) pair at every traversal level, held in a single
/// buffer. Level `l` is a row major block of `rows(l) * cols(l)` entries of `ncoeffs`
/// coefficients each, starting at `displacements[l]`.
#[derive(Debug, Clone, Default)]
pub struct ExpansionTable<T> {
    data: Vec<T>,
    displacements: Vec<usize>,
    shapes: Vec<(usize, usize)>,
    ncoeffs: usize,
}

impl<T> ExpansionTable<T>
where
    T: Zero + Copy + Send + Sync,
{
    /// Allocate every level up front, zero initialised.
    ///
    /// # Arguments
    /// * `shapes` - Number of (rows, columns) at each level.
    /// * `ncoeffs` - Number of coefficients in each entry.
    pub fn new(shapes: Vec<(usize, usize)>, ncoeffs: usize) -> Self {
        let displacements = shapes
            .iter()
            .scan(0, |offset, (rows, cols)| {
                let displacement = *offset;
                *offset += rows * cols * ncoeffs;
                Some(displacement)
            })
            .collect_vec();

        let size = shapes
            .iter()
            .map(|(rows, cols)| rows * cols * ncoeffs)
            .sum();

        Self {
            data: vec![T::zero(); size],
            displacements,
            shapes,
            ncoeffs,
        }
    }

    /// Number of levels.
    pub fn n_levels(&self) -> usize {
        self.shapes.len()
    }

    /// Number of coefficients in each entry.
    pub fn ncoeffs(&self) -> usize {
        self.ncoeffs
    }

    /// Total number of coefficients.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the table holds no coefficients.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of (rows, columns) at a level.
    pub fn shape(&self, level: u64) -> Option<(usize, usize)> {
        self.shapes.get(level as usize).copied()
    }

    /// Number of coefficients in a row of a level.
    pub fn row_len(&self, level: u64) -> Option<usize> {
        self.shape(level).map(|(_, cols)| cols * self.ncoeffs)
    }

    fn range(&self, level: u64) -> Option<std::ops::Range<usize>> {
        let (rows, cols) = self.shape(level)?;
        let start = self.displacements[level as usize];
        Some(start..start + rows * cols * self.ncoeffs)
    }

    /// All coefficients at a level.
    pub fn level(&self, level: u64) -> Option<&[T]> {
        let range = self.range(level)?;
        Some(&self.data[range])
    }

    /// All coefficients at a level, mutably.
    pub fn level_mut(&mut self, level: u64) -> Option<&mut [T]> {
        let range = self.range(level)?;
        Some(&mut self.data[range])
    }

    /// Coefficients of every entry in a row of a level.
    pub fn row(&self, level: u64, row: usize) -> Option<&[T]> {
        let (rows, _) = self.shape(level)?;
        if row >= rows {
            return None;
        }
        let row_len = self.row_len(level)?;
        let start = self.displacements[level as usize] + row * row_len;
        Some(&self.data[start..start + row_len])
    }

    /// Coefficients of a single entry.
    pub fn entry(&self, level: u64, row: usize, col: usize) -> Option<&[T]> {
        let (_, cols) = self.shape(level)?;
        if col >= cols {
            return None;
        }
        let row = self.row(level, row)?;
        Some(&row[col * self.ncoeffs..(col + 1) * self.ncoeffs])
    }

    /// Split the buffer at a level, giving the previous level immutably alongside the level
    /// itself mutably. The previous level is empty at level 0.
    pub fn split_level_mut(&mut self, level: u64) -> Option<(&[T], &mut [T])> {
        let current = self.range(level)?;
        let previous_start = if level > 0 {
            self.displacements[level as usize - 1]
        } else {
            current.start
        };

        let (head, tail) = self.data.split_at_mut(current.start);
        Some((
            &head[previous_start..],
            &mut tail[..current.end - current.start],
        ))
    }

    /// Zero every coefficient, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|x| *x = T::zero());
    }
}
