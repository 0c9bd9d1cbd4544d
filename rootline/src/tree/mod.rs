//! Family-tree builder: rooted, spouse-annotated descendant trees
//!
//! Builds the full tree of a family anchored at its eldest member. Unlike
//! the bounded ancestor/descendant traversals, the tree walk is bounded by
//! the actual graph: a visited set guarantees every member is placed at most
//! once, which also terminates the walk on cyclic or duplicate edge data.

mod builder;

pub use builder::{FamilyTree, FamilyTreeBuilder, TreeNode};
