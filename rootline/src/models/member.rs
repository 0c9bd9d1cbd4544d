//! Member model representing a person in a family graph

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gender recorded for a member
///
/// `Unspecified` is a valid stored value; the kinship resolver may infer a
/// gender from the edge type that reached the member (a `father` edge implies
/// `Male`, a `mother` edge implies `Female`) without writing it back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Female
    Female,

    /// Male
    Male,

    /// No gender recorded
    Unspecified,
}

impl Default for Gender {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "female"),
            Self::Male => write!(f, "male"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

impl Gender {
    /// Convert a string to a Gender
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "female" | "f" => Self::Female,
            "male" | "m" => Self::Male,
            _ => Self::Unspecified,
        }
    }
}

/// Precision qualifier attached to a recorded life date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateQualifier {
    /// The date is known exactly
    Exact,

    /// The date is a family estimate (often just the year)
    Approximate,

    /// The date is not known at all
    Unknown,
}

impl Default for DateQualifier {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for DateQualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Approximate => write!(f, "approximate"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Role a member holds within their family
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Regular family member
    Member,

    /// Family administrator
    Admin,
}

impl Default for MemberRole {
    fn default() -> Self {
        Self::Member
    }
}

/// A person recorded in a family graph
///
/// Every member belongs to exactly one family. The `verified` flag is a
/// cached derived value maintained by the verification ledger; it is never
/// set directly by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// Unique identifier for the member
    pub id: String,

    /// Identifier of the owning family
    pub family_id: String,

    /// Given name
    pub first_name: String,

    /// Middle name, if recorded
    pub middle_name: Option<String>,

    /// Family name
    pub last_name: String,

    /// Nickname, if recorded
    pub nick_name: Option<String>,

    /// Recorded gender
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

    /// Free-form biography / notes
    pub description: Option<String>,

    /// Portrait reference (opaque to this crate; the hosting layer owns it)
    pub member_image: Option<String>,

    /// Role within the family
    pub role: MemberRole,

    /// Derived verification flag, true once enough attestations exist
    pub verified: bool,

    /// When the member record was created
    pub created_at: DateTime<Utc>,

    /// When the member record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member with minimal information
    pub fn new(id: String, family_id: String, first_name: String, last_name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            family_id,
            first_name,
            middle_name: None,
            last_name,
            nick_name: None,
            gender: Gender::Unspecified,
            date_of_birth: None,
            dob_qualifier: DateQualifier::Unknown,
            date_of_death: None,
            dod_qualifier: None,
            email: None,
            phone_number: None,
            description: None,
            member_image: None,
            role: MemberRole::Member,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a builder for more complex member creation
    pub fn builder(
        family_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> MemberBuilder {
        MemberBuilder::new(family_id, first_name, last_name)
    }

    /// Full display name: first, middle (if any), last
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Whether the member has a recorded date of death
    pub fn is_deceased(&self) -> bool {
        self.date_of_death.is_some()
    }
}

/// Builder for creating Member instances
///
/// Generates a UUID for the member id; use [`MemberBuilder::id`] to override
/// when replaying records from an external source.
pub struct MemberBuilder {
    member: Member,
}

impl MemberBuilder {
    /// Create a new member builder with an auto-generated UUID
    pub fn new(
        family_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            member: Member::new(
                Uuid::new_v4().to_string(),
                family_id.into(),
                first_name.into(),
                last_name.into(),
            ),
        }
    }

    /// Override the generated id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.member.id = id.into();
        self
    }

    /// Set the middle name
    pub fn middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.member.middle_name = Some(middle_name.into());
        self
    }

    /// Set the nickname
    pub fn nick_name(mut self, nick_name: impl Into<String>) -> Self {
        self.member.nick_name = Some(nick_name.into());
        self
    }

    /// Set the gender
    pub fn gender(mut self, gender: Gender) -> Self {
        self.member.gender = gender;
        self
    }

    /// Set the date of birth together with its precision
    pub fn date_of_birth(mut self, date: NaiveDate, qualifier: DateQualifier) -> Self {
        self.member.date_of_birth = Some(date);
        self.member.dob_qualifier = qualifier;
        self
    }

    /// Set the date of death together with its precision
    pub fn date_of_death(mut self, date: NaiveDate, qualifier: DateQualifier) -> Self {
        self.member.date_of_death = Some(date);
        self.member.dod_qualifier = Some(qualifier);
        self
    }

    /// Set the contact email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.member.email = Some(email.into());
        self
    }

    /// Set the contact phone number
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.member.phone_number = Some(phone_number.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.member.description = Some(description.into());
        self
    }

    /// Set the portrait reference
    pub fn member_image(mut self, member_image: impl Into<String>) -> Self {
        self.member.member_image = Some(member_image.into());
        self
    }

    /// Set the family role
    pub fn role(mut self, role: MemberRole) -> Self {
        self.member.role = role;
        self
    }

    /// Build the final Member instance
    pub fn build(self) -> Member {
        self.member
    }
}

/// Compact member projection used in trees and relationship views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
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

    /// Recorded gender
    pub gender: Gender,

    /// Date of birth, if recorded
    pub date_of_birth: Option<NaiveDate>,

    /// Date of death, if the member is deceased
    pub date_of_death: Option<NaiveDate>,

    /// Portrait reference
    pub member_image: Option<String>,

    /// Derived verification flag
    pub verified: bool,
}

impl From<&Member> for PersonSummary {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            first_name: member.first_name.clone(),
            middle_name: member.middle_name.clone(),
            last_name: member.last_name.clone(),
            nick_name: member.nick_name.clone(),
            gender: member.gender,
            date_of_birth: member.date_of_birth,
            date_of_death: member.date_of_death,
            member_image: member.member_image.clone(),
            verified: member.verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_defaults() {
        let member = Member::builder("fam-1", "Ada", "Lovelace").build();

        assert_eq!(member.family_id, "fam-1");
        assert_eq!(member.gender, Gender::Unspecified);
        assert_eq!(member.dob_qualifier, DateQualifier::Unknown);
        assert_eq!(member.role, MemberRole::Member);
        assert!(!member.verified);
        assert!(!member.id.is_empty());
    }

    #[test]
    fn full_name_includes_middle_when_present() {
        let member = Member::builder("fam-1", "Ada", "Lovelace")
            .middle_name("King")
            .build();
        assert_eq!(member.full_name(), "Ada King Lovelace");

        let member = Member::builder("fam-1", "Ada", "Lovelace").build();
        assert_eq!(member.full_name(), "Ada Lovelace");
    }

    #[test]
    fn gender_parses_loose_strings() {
        assert_eq!(Gender::from_str("Female"), Gender::Female);
        assert_eq!(Gender::from_str("M"), Gender::Male);
        assert_eq!(Gender::from_str("anything"), Gender::Unspecified);
    }
}
