//! Edge and attestation records persisted by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed kind of a relationship edge
///
/// For `Father` and `Mother` edges the direction is fixed: `member_id` is the
/// child and `related_member_id` is the parent. Traversing "down" (children)
/// therefore matches on `related_member_id`, traversing "up" (parents) on
/// `member_id`. Spouse edges are logically symmetric but stored once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    /// `related_member_id` is the father of `member_id`
    Father,

    /// `related_member_id` is the mother of `member_id`
    Mother,

    /// `member_id` and `related_member_id` are spouses
    Spouse,
}

impl RelationshipKind {
    /// The two parental kinds, in the order queries use them
    pub const PARENTAL: [RelationshipKind; 2] = [RelationshipKind::Father, RelationshipKind::Mother];

    /// Whether this kind encodes a parent/child link
    pub fn is_parental(self) -> bool {
        matches!(self, Self::Father | Self::Mother)
    }

    /// Convert a string to a RelationshipKind
    ///
    /// Accepts the legacy `wife`/`husband` spellings as spouse aliases.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "father" => Some(Self::Father),
            "mother" => Some(Self::Mother),
            "spouse" | "wife" | "husband" => Some(Self::Spouse),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Father => write!(f, "father"),
            Self::Mother => write!(f, "mother"),
            Self::Spouse => write!(f, "spouse"),
        }
    }
}

/// A directed, typed relationship edge between two members
///
/// At most one edge may exist per ordered `(member_id, related_member_id)`
/// pair; a spouse edge is additionally unique across the reversed pair. Both
/// invariants are enforced at insert time and surface as a duplicate error,
/// never as a silent overwrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    /// Unique identifier for the edge
    pub id: String,

    /// First endpoint; the child for parental edges
    pub member_id: String,

    /// Second endpoint; the parent for parental edges
    pub related_member_id: String,

    /// Kind of the edge
    pub kind: RelationshipKind,

    /// Free-form qualifier (e.g. "adoptive", "step")
    pub qualifier: Option<String>,

    /// Derived verification flag, true once enough attestations exist
    pub verified: bool,

    /// Identifier of the owning family
    pub family_id: String,

    /// When the edge was created
    pub created_at: DateTime<Utc>,

    /// When the edge was last updated
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    /// Create a new unverified edge with a generated id
    pub fn new(
        member_id: impl Into<String>,
        related_member_id: impl Into<String>,
        kind: RelationshipKind,
        family_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            member_id: member_id.into(),
            related_member_id: related_member_id.into(),
            kind,
            qualifier: None,
            verified: false,
            family_id: family_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a qualifier to the edge
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Whether the given member id is one of the edge's endpoints
    pub fn involves(&self, member_id: &str) -> bool {
        self.member_id == member_id || self.related_member_id == member_id
    }

    /// The endpoint opposite to the given member id, if the edge touches it
    pub fn other_endpoint(&self, member_id: &str) -> Option<&str> {
        if self.member_id == member_id {
            Some(&self.related_member_id)
        } else if self.related_member_id == member_id {
            Some(&self.member_id)
        } else {
            None
        }
    }
}

/// What an attestation vouches for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttestationTarget {
    /// The attestation targets a member record
    Member,

    /// The attestation targets a relationship edge
    Relationship,
}

impl std::fmt::Display for AttestationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Relationship => write!(f, "relationship"),
        }
    }
}

/// One user's vote that a member or relationship is genuine
///
/// Unique per `(attestor_id, target, target_id)`; never updated after
/// creation; removed only when the target itself is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attestation {
    /// Unique identifier for the attestation
    pub id: String,

    /// Identifier of the attesting user
    pub attestor_id: String,

    /// Kind of record being attested
    pub target: AttestationTarget,

    /// Identifier of the attested member or relationship
    pub target_id: String,

    /// When the attestation was recorded
    pub created_at: DateTime<Utc>,
}

impl Attestation {
    /// Record a new attestation with a generated id
    pub fn new(
        attestor_id: impl Into<String>,
        target: AttestationTarget,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            attestor_id: attestor_id.into(),
            target,
            target_id: target_id.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        assert_eq!(RelationshipKind::from_str("father"), Some(RelationshipKind::Father));
        assert_eq!(RelationshipKind::from_str("MOTHER"), Some(RelationshipKind::Mother));
        assert_eq!(RelationshipKind::from_str("spouse"), Some(RelationshipKind::Spouse));
        assert_eq!(RelationshipKind::from_str("cousin"), None);
        assert_eq!(RelationshipKind::Father.to_string(), "father");
    }

    #[test]
    fn legacy_spouse_spellings_are_accepted() {
        assert_eq!(RelationshipKind::from_str("wife"), Some(RelationshipKind::Spouse));
        assert_eq!(RelationshipKind::from_str("husband"), Some(RelationshipKind::Spouse));
    }

    #[test]
    fn other_endpoint_resolves_both_directions() {
        let edge = Relationship::new("child", "parent", RelationshipKind::Father, "fam");
        assert_eq!(edge.other_endpoint("child"), Some("parent"));
        assert_eq!(edge.other_endpoint("parent"), Some("child"));
        assert_eq!(edge.other_endpoint("stranger"), None);
        assert!(edge.involves("parent"));
    }
}
