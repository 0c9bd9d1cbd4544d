//! In-process memory store
//!
//! A `RwLock`-backed implementation of the full store contract. Used for
//! tests and development; the uniqueness invariants hold because every write
//! runs under the single write lock, which also serializes the verification
//! ledger's insert-then-recount sequence.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::{Family, Member};
use crate::storage::errors::StorageError;
use crate::storage::filters::{AttestationFilter, MemberFilter, RelationshipFilter};
use crate::storage::models::{Attestation, AttestationTarget, Relationship};
use crate::storage::traits::{
    AttestationStore, BaseStore, FamilyStore, MemberStore, RelationshipStore,
};

#[derive(Debug, Default)]
struct MemoryStoreInner {
    members: HashMap<String, Member>,
    families: HashMap<String, Family>,
    // Vec keeps insertion order, so listings are deterministic.
    relationships: Vec<Relationship>,
    attestations: Vec<Attestation>,
}

/// In-process implementation of [`crate::storage::traits::FamilyGraphStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn member_matches(member: &Member, filter: &MemberFilter) -> bool {
        if let Some(ids) = &filter.ids
            && !ids.iter().any(|id| id == &member.id)
        {
            return false;
        }
        if let Some(family_id) = &filter.family_id
            && family_id != &member.family_id
        {
            return false;
        }
        if let Some(needle) = &filter.name_contains {
            let needle = needle.to_lowercase();
            let mut haystack = format!("{} {}", member.first_name, member.last_name);
            if let Some(middle) = &member.middle_name {
                haystack.push(' ');
                haystack.push_str(middle);
            }
            if let Some(nick) = &member.nick_name {
                haystack.push(' ');
                haystack.push_str(nick);
            }
            if !haystack.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(gender) = &filter.gender
            && gender != &member.gender
        {
            return false;
        }
        if let Some(verified) = filter.verified
            && verified != member.verified
        {
            return false;
        }
        true
    }

    fn relationship_matches(edge: &Relationship, filter: &RelationshipFilter) -> bool {
        if let Some(ids) = &filter.ids
            && !ids.iter().any(|id| id == &edge.id)
        {
            return false;
        }
        if let Some(kinds) = &filter.kinds
            && !kinds.contains(&edge.kind)
        {
            return false;
        }
        if let Some(member_ids) = &filter.member_ids
            && !member_ids.iter().any(|id| id == &edge.member_id)
        {
            return false;
        }
        if let Some(related_ids) = &filter.related_member_ids
            && !related_ids.iter().any(|id| id == &edge.related_member_id)
        {
            return false;
        }
        if let Some(involving) = &filter.involving
            && !involving.iter().any(|id| edge.involves(id))
        {
            return false;
        }
        if let Some(family_id) = &filter.family_id
            && family_id != &edge.family_id
        {
            return false;
        }
        if let Some(verified) = filter.verified
            && verified != edge.verified
        {
            return false;
        }
        true
    }

    fn attestation_matches(attestation: &Attestation, filter: &AttestationFilter) -> bool {
        if let Some(attestor_id) = &filter.attestor_id
            && attestor_id != &attestation.attestor_id
        {
            return false;
        }
        if let Some(target) = &filter.target
            && target != &attestation.target
        {
            return false;
        }
        if let Some(target_id) = &filter.target_id
            && target_id != &attestation.target_id
        {
            return false;
        }
        true
    }

    fn paginate<T>(items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Vec<T> {
        let start = offset.unwrap_or(0);
        if start >= items.len() {
            return vec![];
        }
        let mut items: Vec<T> = items.into_iter().skip(start).collect();
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        items
    }
}

#[async_trait]
impl BaseStore for InMemoryStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.write().unwrap();
        inner.members.clear();
        inner.families.clear();
        inner.relationships.clear();
        inner.attestations.clear();
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(serde_json::json!({
            "type": "memory_store",
            "member_count": inner.members.len(),
            "family_count": inner.families.len(),
            "relationship_count": inner.relationships.len(),
            "attestation_count": inner.attestations.len(),
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn create_member(&self, member: Member) -> Result<Member, StorageError> {
        let mut inner = self.inner.write().unwrap();
        if inner.members.contains_key(&member.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Member with ID {} already exists",
                member.id
            )));
        }
        inner.members.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    async fn get_member(&self, id: &str) -> Result<Option<Member>, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.members.get(id).cloned())
    }

    async fn update_member(&self, member: Member) -> Result<Member, StorageError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.members.contains_key(&member.id) {
            return Err(StorageError::NotFound(format!(
                "Member with ID {} not found",
                member.id
            )));
        }
        inner.members.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    async fn delete_member(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().unwrap();
        Ok(inner.members.remove(id).is_some())
    }

    async fn list_members(
        &self,
        filter: Option<MemberFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Member>, StorageError> {
        let inner = self.inner.read().unwrap();
        let mut members: Vec<Member> = inner
            .members
            .values()
            .filter(|member| {
                filter
                    .as_ref()
                    .is_none_or(|f| Self::member_matches(member, f))
            })
            .cloned()
            .collect();

        // Stable listing order across calls.
        members.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Self::paginate(members, limit, offset))
    }

    async fn count_members(&self, filter: Option<MemberFilter>) -> Result<usize, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .members
            .values()
            .filter(|member| {
                filter
                    .as_ref()
                    .is_none_or(|f| Self::member_matches(member, f))
            })
            .count())
    }

    async fn set_member_verified(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().unwrap();
        match inner.members.get_mut(id) {
            Some(member) => {
                member.verified = true;
                member.updated_at = chrono::Utc::now();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!(
                "Member with ID {} not found",
                id
            ))),
        }
    }
}

#[async_trait]
impl RelationshipStore for InMemoryStore {
    async fn create_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner.relationships.iter().any(|edge| {
            edge.member_id == relationship.member_id
                && edge.related_member_id == relationship.related_member_id
        });
        if duplicate {
            return Err(StorageError::AlreadyExists(format!(
                "A relationship between {} and {} already exists",
                relationship.member_id, relationship.related_member_id
            )));
        }
        inner.relationships.push(relationship.clone());
        Ok(relationship)
    }

    async fn get_relationship(&self, id: &str) -> Result<Option<Relationship>, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .relationships
            .iter()
            .find(|edge| edge.id == id)
            .cloned())
    }

    async fn delete_relationship(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().unwrap();
        let before = inner.relationships.len();
        inner.relationships.retain(|edge| edge.id != id);
        Ok(inner.relationships.len() < before)
    }

    async fn delete_relationships_for_member(
        &self,
        member_id: &str,
    ) -> Result<Vec<Relationship>, StorageError> {
        let mut inner = self.inner.write().unwrap();
        let (removed, kept): (Vec<Relationship>, Vec<Relationship>) = inner
            .relationships
            .drain(..)
            .partition(|edge| edge.involves(member_id));
        inner.relationships = kept;
        Ok(removed)
    }

    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Relationship>, StorageError> {
        let inner = self.inner.read().unwrap();
        let edges: Vec<Relationship> = inner
            .relationships
            .iter()
            .filter(|edge| {
                filter
                    .as_ref()
                    .is_none_or(|f| Self::relationship_matches(edge, f))
            })
            .cloned()
            .collect();

        Ok(Self::paginate(edges, limit, offset))
    }

    async fn count_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<usize, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .relationships
            .iter()
            .filter(|edge| {
                filter
                    .as_ref()
                    .is_none_or(|f| Self::relationship_matches(edge, f))
            })
            .count())
    }

    async fn set_relationship_verified(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().unwrap();
        match inner.relationships.iter_mut().find(|edge| edge.id == id) {
            Some(edge) => {
                edge.verified = true;
                edge.updated_at = chrono::Utc::now();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!(
                "Relationship with ID {} not found",
                id
            ))),
        }
    }
}

#[async_trait]
impl FamilyStore for InMemoryStore {
    async fn create_family(&self, family: Family) -> Result<Family, StorageError> {
        let mut inner = self.inner.write().unwrap();
        if inner.families.contains_key(&family.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Family with ID {} already exists",
                family.id
            )));
        }
        let name_taken = inner
            .families
            .values()
            .any(|existing| existing.family_name == family.family_name);
        if name_taken {
            return Err(StorageError::AlreadyExists(format!(
                "Family named '{}' already exists",
                family.family_name
            )));
        }
        inner.families.insert(family.id.clone(), family.clone());
        Ok(family)
    }

    async fn get_family(&self, id: &str) -> Result<Option<Family>, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.families.get(id).cloned())
    }

    async fn update_family(&self, family: Family) -> Result<Family, StorageError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.families.contains_key(&family.id) {
            return Err(StorageError::NotFound(format!(
                "Family with ID {} not found",
                family.id
            )));
        }
        inner.families.insert(family.id.clone(), family.clone());
        Ok(family)
    }

    async fn delete_family(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().unwrap();
        Ok(inner.families.remove(id).is_some())
    }

    async fn list_families(&self) -> Result<Vec<Family>, StorageError> {
        let inner = self.inner.read().unwrap();
        let mut families: Vec<Family> = inner.families.values().cloned().collect();
        families.sort_by(|a, b| a.family_name.cmp(&b.family_name));
        Ok(families)
    }
}

#[async_trait]
impl AttestationStore for InMemoryStore {
    async fn insert_attestation(
        &self,
        attestation: Attestation,
    ) -> Result<Attestation, StorageError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner.attestations.iter().any(|existing| {
            existing.attestor_id == attestation.attestor_id
                && existing.target == attestation.target
                && existing.target_id == attestation.target_id
        });
        if duplicate {
            return Err(StorageError::AlreadyExists(format!(
                "User {} has already attested {} {}",
                attestation.attestor_id, attestation.target, attestation.target_id
            )));
        }
        inner.attestations.push(attestation.clone());
        Ok(attestation)
    }

    async fn count_attestations(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<usize, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .attestations
            .iter()
            .filter(|a| a.target == target && a.target_id == target_id)
            .count())
    }

    async fn list_attestations(
        &self,
        filter: Option<AttestationFilter>,
    ) -> Result<Vec<Attestation>, StorageError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .attestations
            .iter()
            .filter(|a| {
                filter
                    .as_ref()
                    .is_none_or(|f| Self::attestation_matches(a, f))
            })
            .cloned()
            .collect())
    }

    async fn delete_attestations_for_target(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<usize, StorageError> {
        let mut inner = self.inner.write().unwrap();
        let before = inner.attestations.len();
        inner
            .attestations
            .retain(|a| !(a.target == target && a.target_id == target_id));
        Ok(before - inner.attestations.len())
    }
}
