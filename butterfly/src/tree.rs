//! # Adaptive 2^D-ary Trees
//!
//! Trees over point sets of any spatial dimension, built breadth first. Boxes are addressed by
//! (level, index) pairs assigned at construction, children of a box are contiguous at the next
//! level and the points under any box are contiguous in tree order.
//!
//! # Example Usage
//! ```
//! use butterfly::traits::tree::{SingleTree, TreeNode};
//! use butterfly::tree::{helpers::points_fixture, SingleNodeTree};
//! use rlst::RawAccess;
//!
//! let points = points_fixture::<f64>(1000, 2, None, None, Some(0));
//! let tree = SingleNodeTree::new(points.data(), 2, 16).unwrap();
//! assert!(tree.all_leaves().iter().all(|leaf| tree.n_coordinates(leaf) <= 16));
//! ```
pub mod constants;
pub mod types;

mod domain;
pub mod helpers;
mod single_node;

pub use types::{Domain, SingleNodeTree, TreeBox};
