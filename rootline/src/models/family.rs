//! Family model owning members and their relationship edges

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of distinct attestations required before a member or
/// relationship is promoted to verified.
pub const DEFAULT_VERIFICATION_THRESHOLD: u32 = 3;

/// A family: the ownership boundary for members, relationship edges and
/// attestations.
///
/// `verifications` is the consensus threshold used by the verification
/// ledger. A family that still owns members cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Family {
    /// Unique identifier for the family
    pub id: String,

    /// Family name, unique across the store
    pub family_name: String,

    /// Free-form description
    pub description: Option<String>,

    /// Ancestral origin, as recorded by the family
    pub origin: Option<String>,

    /// Country of origin
    pub country: Option<String>,

    /// County / region of origin
    pub county: Option<String>,

    /// Present-day location
    pub location: Option<String>,

    /// Tribe or clan, where applicable
    pub tribe: Option<String>,

    /// Number of distinct attestations required to mark a member or
    /// relationship as verified
    pub verifications: u32,

    /// When the family record was created
    pub created_at: DateTime<Utc>,

    /// When the family record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Family {
    /// Create a new family with the default verification threshold
    pub fn new(id: String, family_name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            family_name,
            description: None,
            origin: None,
            country: None,
            county: None,
            location: None,
            tribe: None,
            verifications: DEFAULT_VERIFICATION_THRESHOLD,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a builder for more complex family creation
    pub fn builder(family_name: impl Into<String>) -> FamilyBuilder {
        FamilyBuilder::new(family_name)
    }
}

/// Builder for creating Family instances
pub struct FamilyBuilder {
    family: Family,
}

impl FamilyBuilder {
    /// Create a new family builder with an auto-generated UUID
    pub fn new(family_name: impl Into<String>) -> Self {
        Self {
            family: Family::new(Uuid::new_v4().to_string(), family_name.into()),
        }
    }

    /// Override the generated id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.family.id = id.into();
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.family.description = Some(description.into());
        self
    }

    /// Set the ancestral origin
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.family.origin = Some(origin.into());
        self
    }

    /// Set the country of origin
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.family.country = Some(country.into());
        self
    }

    /// Set the county / region of origin
    pub fn county(mut self, county: impl Into<String>) -> Self {
        self.family.county = Some(county.into());
        self
    }

    /// Set the present-day location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.family.location = Some(location.into());
        self
    }

    /// Set the tribe or clan
    pub fn tribe(mut self, tribe: impl Into<String>) -> Self {
        self.family.tribe = Some(tribe.into());
        self
    }

    /// Set the attestation threshold
    pub fn verifications(mut self, verifications: u32) -> Self {
        self.family.verifications = verifications;
        self
    }

    /// Build the final Family instance
    pub fn build(self) -> Family {
        self.family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_family_uses_default_threshold() {
        let family = Family::builder("Kimani").build();
        assert_eq!(family.verifications, DEFAULT_VERIFICATION_THRESHOLD);
        assert!(!family.id.is_empty());
    }

    #[test]
    fn builder_overrides_threshold() {
        let family = Family::builder("Kimani").verifications(5).build();
        assert_eq!(family.verifications, 5);
    }
}
