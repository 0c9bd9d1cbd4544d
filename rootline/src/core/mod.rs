//! Core orchestration for the family graph

mod manager;

pub use manager::{FamilyGraphManager, NewRelationship, RelationshipView};
