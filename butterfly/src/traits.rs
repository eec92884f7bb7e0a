//! # Trait Definitions
pub mod butterfly;
pub mod kernel;
pub mod tree;
pub mod types;
