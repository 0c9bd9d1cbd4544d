//! Filter types for storage queries
//!
//! Every filter field is optional; absent fields match everything. Lookups
//! that fan out over several members take id *sets*, so a traversal level is
//! always a single store call rather than one call per id.

use serde::{Deserialize, Serialize};

use crate::models::Gender;
use crate::storage::models::{AttestationTarget, RelationshipKind};

/// Filter for member queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemberFilter {
    /// Filter by member IDs
    pub ids: Option<Vec<String>>,

    /// Filter by owning family
    pub family_id: Option<String>,

    /// Filter by name (substring match on first/middle/last/nick name)
    pub name_contains: Option<String>,

    /// Filter by gender
    pub gender: Option<Gender>,

    /// Filter by verification flag
    pub verified: Option<bool>,
}

/// Filter for relationship edge queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelationshipFilter {
    /// Filter by edge IDs
    pub ids: Option<Vec<String>>,

    /// Filter by edge kinds
    pub kinds: Option<Vec<RelationshipKind>>,

    /// Filter by the `member_id` endpoint (child side for parental edges)
    pub member_ids: Option<Vec<String>>,

    /// Filter by the `related_member_id` endpoint (parent side for parental edges)
    pub related_member_ids: Option<Vec<String>>,

    /// Match edges where either endpoint is in the set
    pub involving: Option<Vec<String>>,

    /// Filter by owning family
    pub family_id: Option<String>,

    /// Filter by verification flag
    pub verified: Option<bool>,
}

/// Filter for attestation queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttestationFilter {
    /// Filter by attesting user
    pub attestor_id: Option<String>,

    /// Filter by target kind
    pub target: Option<AttestationTarget>,

    /// Filter by target id
    pub target_id: Option<String>,
}

/// Helper functions for constructing filters
pub mod helpers {
    use super::*;

    /// Members with the given ids
    pub fn members_by_ids(ids: &[String]) -> MemberFilter {
        MemberFilter {
            ids: Some(ids.to_vec()),
            ..Default::default()
        }
    }

    /// Members belonging to a family
    pub fn members_of_family(family_id: &str) -> MemberFilter {
        MemberFilter {
            family_id: Some(family_id.to_string()),
            ..Default::default()
        }
    }

    /// Parental edges whose child endpoint is in the set
    ///
    /// These are the edges naming the given members' parents.
    pub fn parent_edges_of(child_ids: &[String]) -> RelationshipFilter {
        RelationshipFilter {
            kinds: Some(RelationshipKind::PARENTAL.to_vec()),
            member_ids: Some(child_ids.to_vec()),
            ..Default::default()
        }
    }

    /// Parental edges whose parent endpoint is in the set
    ///
    /// These are the edges naming the given members' children.
    pub fn child_edges_of(parent_ids: &[String]) -> RelationshipFilter {
        RelationshipFilter {
            kinds: Some(RelationshipKind::PARENTAL.to_vec()),
            related_member_ids: Some(parent_ids.to_vec()),
            ..Default::default()
        }
    }

    /// Spouse edges touching any member in the set, in either direction
    pub fn spouse_edges_involving(member_ids: &[String]) -> RelationshipFilter {
        RelationshipFilter {
            kinds: Some(vec![RelationshipKind::Spouse]),
            involving: Some(member_ids.to_vec()),
            ..Default::default()
        }
    }

    /// All edges touching a member, in either direction
    pub fn edges_involving(member_id: &str) -> RelationshipFilter {
        RelationshipFilter {
            involving: Some(vec![member_id.to_string()]),
            ..Default::default()
        }
    }

    /// Attestations recorded for a target
    pub fn attestations_for(target: AttestationTarget, target_id: &str) -> AttestationFilter {
        AttestationFilter {
            target: Some(target),
            target_id: Some(target_id.to_string()),
            ..Default::default()
        }
    }
}
