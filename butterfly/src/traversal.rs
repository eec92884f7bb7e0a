//! # Butterfly Traversal
//!
//! Evaluates oscillatory kernel sums over independent source and target trees. At traversal
//! level `l` every source box at source level `max_level - l` is paired with every target box at
//! target level `l`. Multipoles are aggregated bottom up over the sources until the split level,
//! converted to locals, and then redistributed top down over the targets, with results evaluated
//! wherever a target box terminates.
pub mod builder;
pub mod chebyshev;
pub mod constants;
pub mod data_access;
pub mod dispatch;
pub mod eval;
pub mod expansion;
pub mod field_translation;
pub mod helpers;
pub mod types;

#[cfg(test)]
mod test {
    extern crate blas_src;
    extern crate lapack_src;
}
