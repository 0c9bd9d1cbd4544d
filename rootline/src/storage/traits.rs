//! Trait definitions for storage components in Rootline

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{Family, Member};
use crate::storage::errors::StorageError;
use crate::storage::filters::{AttestationFilter, MemberFilter, RelationshipFilter};
use crate::storage::models::{Attestation, AttestationTarget, Relationship};

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError>;

    /// Close connections and release resources
    async fn close(&self) -> Result<(), StorageError>;
}

/// Trait for member operations
#[async_trait]
pub trait MemberStore: BaseStore {
    /// Create a new member; fails with `AlreadyExists` on an id collision
    async fn create_member(&self, member: Member) -> Result<Member, StorageError>;

    /// Get a member by id
    async fn get_member(&self, id: &str) -> Result<Option<Member>, StorageError>;

    /// Update an existing member; fails with `NotFound` when absent
    async fn update_member(&self, member: Member) -> Result<Member, StorageError>;

    /// Delete a member by id; returns whether a record was removed
    ///
    /// This is the raw row delete. Cascading edge and attestation removal is
    /// orchestrated above the store, in the manager.
    async fn delete_member(&self, id: &str) -> Result<bool, StorageError>;

    /// List members with optional filtering
    async fn list_members(
        &self,
        filter: Option<MemberFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Member>, StorageError>;

    /// Count members with optional filtering
    async fn count_members(&self, filter: Option<MemberFilter>) -> Result<usize, StorageError>;

    /// Flip a member's derived verified flag to true
    async fn set_member_verified(&self, id: &str) -> Result<(), StorageError>;
}

/// Trait for relationship edge operations
#[async_trait]
pub trait RelationshipStore: BaseStore {
    /// Create a new edge
    ///
    /// Fails with `AlreadyExists` when an edge for the same ordered
    /// `(member_id, related_member_id)` pair is already stored.
    async fn create_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError>;

    /// Get an edge by id
    async fn get_relationship(&self, id: &str) -> Result<Option<Relationship>, StorageError>;

    /// Delete an edge by id; returns whether a record was removed
    async fn delete_relationship(&self, id: &str) -> Result<bool, StorageError>;

    /// Delete every edge touching the member, in either direction
    ///
    /// Returns the removed edges so callers can cascade their attestations.
    async fn delete_relationships_for_member(
        &self,
        member_id: &str,
    ) -> Result<Vec<Relationship>, StorageError>;

    /// List edges with optional filtering
    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Relationship>, StorageError>;

    /// Count edges with optional filtering
    async fn count_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<usize, StorageError>;

    /// Flip an edge's derived verified flag to true
    async fn set_relationship_verified(&self, id: &str) -> Result<(), StorageError>;
}

/// Trait for family operations
#[async_trait]
pub trait FamilyStore: BaseStore {
    /// Create a new family; fails with `AlreadyExists` on a duplicate name
    async fn create_family(&self, family: Family) -> Result<Family, StorageError>;

    /// Get a family by id
    async fn get_family(&self, id: &str) -> Result<Option<Family>, StorageError>;

    /// Update an existing family; fails with `NotFound` when absent
    async fn update_family(&self, family: Family) -> Result<Family, StorageError>;

    /// Delete a family by id; returns whether a record was removed
    ///
    /// The "no members left behind" guard lives in the manager, not here.
    async fn delete_family(&self, id: &str) -> Result<bool, StorageError>;

    /// List all families
    async fn list_families(&self) -> Result<Vec<Family>, StorageError>;
}

/// Trait for attestation operations
///
/// The insert-then-recount sequence used by the verification ledger relies on
/// this trait's uniqueness invariant: a second attestation by the same user
/// for the same target must fail with `AlreadyExists`, and `count_attestations`
/// must observe a fresh count afterwards.
#[async_trait]
pub trait AttestationStore: BaseStore {
    /// Record an attestation
    ///
    /// Fails with `AlreadyExists` when the attestor has already attested this
    /// target.
    async fn insert_attestation(
        &self,
        attestation: Attestation,
    ) -> Result<Attestation, StorageError>;

    /// Count distinct attestations for a target
    async fn count_attestations(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<usize, StorageError>;

    /// List attestations with optional filtering
    async fn list_attestations(
        &self,
        filter: Option<AttestationFilter>,
    ) -> Result<Vec<Attestation>, StorageError>;

    /// Delete all attestations for a target; returns how many were removed
    async fn delete_attestations_for_target(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<usize, StorageError>;
}

/// Unified store contract the manager and resolver operate against
///
/// Implementations provide all of the component traits; consumers hold an
/// `Arc<dyn FamilyGraphStore>` and never name a concrete backend.
pub trait FamilyGraphStore:
    MemberStore + RelationshipStore + FamilyStore + AttestationStore
{
}

impl<T> FamilyGraphStore for T where
    T: MemberStore + RelationshipStore + FamilyStore + AttestationStore
{
}
