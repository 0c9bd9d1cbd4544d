//! Kinship resolver: derived relatives computed from typed edges
//!
//! The resolver composes batched edge lookups into the classic derived
//! relations (siblings, grandparents, cousins of first and second degree)
//! and depth-bounded ancestor/descendant trees. Every operation returns a
//! deduplicated list of [`Relative`]s annotated with the relation label of
//! the traversal that reached them; an id with no matching edges yields an
//! empty list, never an error.

mod resolver;
mod traversal;
mod types;

pub use resolver::KinshipResolver;
pub use types::{
    AncestorLookup, AncestorNode, DescendantLookup, DescendantNode, RelationLabel, Relative,
};

/// Default recursion bound for ancestor/descendant traversals
///
/// Parent/child edges are not validated acyclic at write time, so the depth
/// bound is the traversal's only protection against cyclic edge data.
pub const DEFAULT_MAX_DEPTH: u8 = 5;
