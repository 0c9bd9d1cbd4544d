//! Verification ledger: multi-party attestation consensus
//!
//! Members and relationships start unverified. Each family member may attest
//! a target at most once; when the number of distinct attestors reaches the
//! owning family's `verifications` threshold the target's cached `verified`
//! flag is flipped. The transition is one-way: no unverify operation exists.
//!
//! Concurrency: the insert-then-recount sequence is serialized by the
//! store's uniqueness invariant. Two racing attestors both insert (distinct
//! rows, so both commit), and whichever recount runs last observes the full
//! count, so the threshold check cannot miss the promotion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::storage::errors::StorageError;
use crate::storage::filters::helpers;
use crate::storage::models::{Attestation, AttestationTarget};
use crate::storage::traits::{
    AttestationStore, FamilyGraphStore, FamilyStore, MemberStore, RelationshipStore,
};
use crate::{Result, RootlineError};

/// The promotion rule, kept pure so the cached flag and the count rule
/// cannot drift apart under test.
pub fn is_verified(count: usize, threshold: u32) -> bool {
    count >= threshold as usize
}

/// Snapshot of a target's verification state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationStatus {
    /// Number of distinct attestations recorded for the target
    pub attestations: usize,

    /// The owning family's threshold
    pub required: u32,

    /// Whether the attestation count has reached the threshold
    pub verified: bool,
}

/// Records attestations and promotes targets to verified
#[derive(Debug, Clone)]
pub struct VerificationLedger {
    store: Arc<dyn FamilyGraphStore>,
}

impl VerificationLedger {
    /// Create a ledger over the given store
    pub fn new(store: Arc<dyn FamilyGraphStore>) -> Self {
        Self { store }
    }

    /// Record one user's attestation of a member
    ///
    /// A repeat attestation by the same user is rejected with
    /// [`RootlineError::DuplicateAttestation`] and changes nothing.
    pub async fn attest_member(
        &self,
        attestor_id: &str,
        member_id: &str,
    ) -> Result<VerificationStatus> {
        let member = self
            .store
            .get_member(member_id)
            .await
            .map_err(RootlineError::from)?
            .ok_or_else(|| RootlineError::NotFound(format!("Member {} not found", member_id)))?;

        self.insert(attestor_id, AttestationTarget::Member, member_id)
            .await?;

        let count = self
            .store
            .count_attestations(AttestationTarget::Member, member_id)
            .await?;
        let required = self.family_threshold(&member.family_id).await?;
        let verified = is_verified(count, required);

        if verified && !member.verified {
            self.store.set_member_verified(member_id).await?;
            info!(member_id, count, required, "member promoted to verified");
        }

        Ok(VerificationStatus {
            attestations: count,
            required,
            verified,
        })
    }

    /// Record one user's attestation of a relationship edge
    pub async fn attest_relationship(
        &self,
        attestor_id: &str,
        relationship_id: &str,
    ) -> Result<VerificationStatus> {
        let relationship = self
            .store
            .get_relationship(relationship_id)
            .await
            .map_err(RootlineError::from)?
            .ok_or_else(|| {
                RootlineError::NotFound(format!("Relationship {} not found", relationship_id))
            })?;

        self.insert(attestor_id, AttestationTarget::Relationship, relationship_id)
            .await?;

        let count = self
            .store
            .count_attestations(AttestationTarget::Relationship, relationship_id)
            .await?;
        let required = self.family_threshold(&relationship.family_id).await?;
        let verified = is_verified(count, required);

        if verified && !relationship.verified {
            self.store
                .set_relationship_verified(relationship_id)
                .await?;
            info!(
                relationship_id,
                count, required, "relationship promoted to verified"
            );
        }

        Ok(VerificationStatus {
            attestations: count,
            required,
            verified,
        })
    }

    /// Current verification state of a member
    pub async fn member_status(&self, member_id: &str) -> Result<VerificationStatus> {
        let member = self
            .store
            .get_member(member_id)
            .await
            .map_err(RootlineError::from)?
            .ok_or_else(|| RootlineError::NotFound(format!("Member {} not found", member_id)))?;

        let count = self
            .store
            .count_attestations(AttestationTarget::Member, member_id)
            .await?;
        let required = self.family_threshold(&member.family_id).await?;

        Ok(VerificationStatus {
            attestations: count,
            required,
            verified: is_verified(count, required),
        })
    }

    /// Current verification state of a relationship edge
    pub async fn relationship_status(&self, relationship_id: &str) -> Result<VerificationStatus> {
        let relationship = self
            .store
            .get_relationship(relationship_id)
            .await
            .map_err(RootlineError::from)?
            .ok_or_else(|| {
                RootlineError::NotFound(format!("Relationship {} not found", relationship_id))
            })?;

        let count = self
            .store
            .count_attestations(AttestationTarget::Relationship, relationship_id)
            .await?;
        let required = self.family_threshold(&relationship.family_id).await?;

        Ok(VerificationStatus {
            attestations: count,
            required,
            verified: is_verified(count, required),
        })
    }

    /// All attestations recorded for a target, oldest first
    pub async fn attestations(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<Vec<Attestation>> {
        let attestations = self
            .store
            .list_attestations(Some(helpers::attestations_for(target, target_id)))
            .await?;
        Ok(attestations)
    }

    async fn insert(
        &self,
        attestor_id: &str,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<()> {
        let attestation = Attestation::new(attestor_id, target, target_id);
        match self.store.insert_attestation(attestation).await {
            Ok(_) => {
                debug!(attestor_id, target_id, %target, "attestation recorded");
                Ok(())
            }
            Err(StorageError::AlreadyExists(_)) => Err(RootlineError::DuplicateAttestation {
                attestor_id: attestor_id.to_string(),
                target_id: target_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn family_threshold(&self, family_id: &str) -> Result<u32> {
        let family = self
            .store
            .get_family(family_id)
            .await
            .map_err(RootlineError::from)?
            .ok_or_else(|| RootlineError::NotFound(format!("Family {} not found", family_id)))?;
        Ok(family.verifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_rule_is_inclusive_at_threshold() {
        assert!(!is_verified(0, 3));
        assert!(!is_verified(2, 3));
        assert!(is_verified(3, 3));
        assert!(is_verified(4, 3));
    }

    #[test]
    fn zero_threshold_verifies_immediately() {
        assert!(is_verified(0, 0));
    }
}
