//! Domain models for the family graph

mod family;
mod member;

pub use family::{Family, FamilyBuilder, DEFAULT_VERIFICATION_THRESHOLD};
pub use member::{DateQualifier, Gender, Member, MemberBuilder, MemberRole, PersonSummary};
