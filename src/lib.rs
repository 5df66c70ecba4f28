//! A generic AVL tree: an ordered set of distinct values that stays height-balanced
//! across insertions and removals.
//!
//! ```
//! use avl_tree::{AvlTree, Order};
//!
//! let tree: AvlTree<i32> = [3, 1, 2].into_iter().collect();
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//! assert_eq!(tree.traverse(Order::PreOrder).copied().collect::<Vec<_>>(), [2, 1, 3]);
//! assert!(tree.is_valid());
//! ```
//!
//! Rotations are reported as `tracing` events at trace level.

mod error;
mod traverse;
mod tree;

pub use error::InvariantViolation;
pub use traverse::{InOrder, IntoIter, LevelOrder, Order, PostOrder, PreOrder, Traverse};
pub use tree::AvlTree;
