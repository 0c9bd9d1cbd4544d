//! Result types produced by the kinship resolver

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DateQualifier, Gender, Member};
use crate::storage::models::RelationshipKind;

/// How a resolved member relates to the anchor of the query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationLabel {
    /// Father of the anchor
    Father,

    /// Mother of the anchor
    Mother,

    /// Child of the anchor
    Child,

    /// Spouse of the anchor
    Spouse,

    /// Sibling of the anchor (shares at least one parent)
    Sibling,

    /// Grandparent of the anchor
    Grandparent,

    /// Great-grandparent of the anchor
    GreatGrandparent,

    /// Grandchild of the anchor
    Grandchild,

    /// Great-grandchild of the anchor
    GreatGrandchild,

    /// Sibling of a parent
    UncleOrAunt,

    /// First cousin
    Cousin,

    /// Second cousin
    SecondCousin,
}

impl RelationLabel {
    /// Label for the parent reached over the given edge kind
    pub(crate) fn for_parent_edge(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Mother => Self::Mother,
            // Spouse edges never reach this path; parental queries filter on
            // father/mother kinds only.
            _ => Self::Father,
        }
    }
}

/// A member reached by a kinship query, annotated with the relation label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relative {
    /// Member id
    pub id: String,

    /// Given name
    pub first_name: String,

    /// Middle name, if recorded
    pub middle_name: Option<String>,

    /// Family name
    pub last_name: String,

    /// Nickname, if recorded
    pub nick_name: Option<String>,

    /// Gender, possibly inferred from the edge that reached the member
    pub gender: Gender,

    /// Date of birth, if recorded
    pub date_of_birth: Option<NaiveDate>,

    /// Precision of the recorded date of birth
    pub dob_qualifier: DateQualifier,

    /// Date of death, if the member is deceased
    pub date_of_death: Option<NaiveDate>,

    /// Precision of the recorded date of death
    pub dod_qualifier: Option<DateQualifier>,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Portrait reference
    pub member_image: Option<String>,

    /// Derived verification flag
    pub verified: bool,

    /// How this member relates to the query's anchor
    pub relation: RelationLabel,
}

impl Relative {
    /// Project a member into a relative with the given label
    pub fn from_member(member: &Member, relation: RelationLabel) -> Self {
        Self {
            id: member.id.clone(),
            first_name: member.first_name.clone(),
            middle_name: member.middle_name.clone(),
            last_name: member.last_name.clone(),
            nick_name: member.nick_name.clone(),
            gender: member.gender,
            date_of_birth: member.date_of_birth,
            dob_qualifier: member.dob_qualifier,
            date_of_death: member.date_of_death,
            dod_qualifier: member.dod_qualifier,
            email: member.email.clone(),
            phone_number: member.phone_number.clone(),
            member_image: member.member_image.clone(),
            verified: member.verified,
            relation,
        }
    }

    /// Fill an unspecified gender from the parental edge kind that reached
    /// this member (a `father` edge implies Male, a `mother` edge Female).
    ///
    /// Never overrides a recorded gender and never writes back to the store.
    pub(crate) fn infer_gender_from(&mut self, kind: RelationshipKind) {
        if self.gender == Gender::Unspecified {
            self.gender = match kind {
                RelationshipKind::Father => Gender::Male,
                RelationshipKind::Mother => Gender::Female,
                RelationshipKind::Spouse => Gender::Unspecified,
            };
        }
    }

    /// Replace the relation label, keeping everything else
    pub(crate) fn relabeled(mut self, relation: RelationLabel) -> Self {
        self.relation = relation;
        self
    }
}

/// One ancestor in a nested ancestor tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AncestorNode {
    /// The ancestor, labeled father/mother relative to the node below
    pub member: Relative,

    /// The ancestor's own parents, one level further up
    pub parents: Vec<AncestorNode>,
}

/// Result of an ancestor traversal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AncestorLookup {
    /// The anchor's parents, each nesting their own parents
    pub ancestors: Vec<AncestorNode>,

    /// Total number of ancestors in the tree (every node, all levels)
    pub count: usize,

    /// True when the depth bound cut the walk while edges remained
    pub depth_limited: bool,
}

/// One descendant in a nested descendant tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescendantNode {
    /// The descendant
    pub member: Relative,

    /// All current spouses of the descendant
    pub spouses: Vec<Relative>,

    /// The descendant's own children, one level further down
    pub children: Vec<DescendantNode>,
}

/// Result of a descendant traversal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescendantLookup {
    /// The anchor's children, each nesting their own children
    pub descendants: Vec<DescendantNode>,

    /// Total number of descendants in the tree (spouses are not counted)
    pub count: usize,

    /// True when the depth bound cut the walk while edges remained
    pub depth_limited: bool,
}

/// Collapse a relative list by member id, keeping the first occurrence
///
/// A member can be reached over multiple paths (e.g. via both parents); the
/// first path wins and later duplicates are dropped.
pub(crate) fn dedupe_by_id(relatives: Vec<Relative>) -> Vec<Relative> {
    let mut seen = std::collections::HashSet::new();
    relatives
        .into_iter()
        .filter(|relative| seen.insert(relative.id.clone()))
        .collect()
}
