//! Field translations, the operators applied to (source box, target box) pairs.
pub mod source;
pub mod source_to_target;
pub mod target;
