//! Family graph manager interface for Rootline
//!
//! This module provides the primary interface for interacting with the
//! family graph. It orchestrates the storage layer, the kinship resolver,
//! the family-tree builder and the verification ledger behind one typed API.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RootlineConfig;
use crate::kinship::{AncestorLookup, DescendantLookup, KinshipResolver, Relative};
use crate::models::{Family, Member, PersonSummary};
use crate::storage::errors::StorageError;
use crate::storage::filters::{helpers, MemberFilter};
use crate::storage::models::{AttestationTarget, Relationship, RelationshipKind};
use crate::storage::traits::{
    AttestationStore, FamilyGraphStore, FamilyStore, MemberStore, RelationshipStore,
};
use crate::tree::{FamilyTree, FamilyTreeBuilder};
use crate::verification::{VerificationLedger, VerificationStatus};
use crate::{Result, RootlineError};

/// Input for creating a relationship edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelationship {
    /// First endpoint; the child for parental edges
    pub member_id: String,

    /// Second endpoint; the parent for parental edges
    pub related_member_id: String,

    /// Kind of the edge
    pub kind: RelationshipKind,

    /// Free-form qualifier (e.g. "adoptive", "step")
    pub qualifier: Option<String>,
}

/// One row of a member's relationship listing
///
/// Shows the opposite endpoint of each edge touching the member: the
/// member's own parental edges plus spouse edges in either direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipView {
    /// Edge id
    pub relationship_id: String,

    /// Kind of the edge
    pub kind: RelationshipKind,

    /// Edge qualifier, if any
    pub qualifier: Option<String>,

    /// Whether the edge itself is verified
    pub verified: bool,

    /// The member on the other end of the edge
    pub member: PersonSummary,
}

/// The primary interface for interacting with Rootline's family graph.
///
/// `FamilyGraphManager` wires the storage backend to the kinship resolver,
/// the family-tree builder and the verification ledger, and carries the
/// member/relationship/family lifecycle operations the API layer calls.
#[derive(Debug, Clone)]
pub struct FamilyGraphManager {
    store: Arc<dyn FamilyGraphStore>,
    resolver: KinshipResolver,
    tree_builder: FamilyTreeBuilder,
    ledger: VerificationLedger,
    #[allow(dead_code)]
    config: RootlineConfig,
}

impl FamilyGraphManager {
    /// Create a new manager over the provided storage and configuration
    pub fn new(store: Arc<dyn FamilyGraphStore>, config: RootlineConfig) -> Self {
        let resolver =
            KinshipResolver::new(Arc::clone(&store)).with_max_depth(config.traversal.max_depth);
        let tree_builder = FamilyTreeBuilder::new(Arc::clone(&store));
        let ledger = VerificationLedger::new(Arc::clone(&store));

        Self {
            store,
            resolver,
            tree_builder,
            ledger,
            config,
        }
    }

    /// The kinship resolver, for direct use by advanced callers
    pub fn resolver(&self) -> &KinshipResolver {
        &self.resolver
    }

    // =========================================================================
    // Family operations
    // =========================================================================

    /// Create a family
    pub async fn create_family(&self, family: Family) -> Result<Family> {
        match self.store.create_family(family).await {
            Ok(created) => {
                info!(family_id = %created.id, family_name = %created.family_name, "family created");
                Ok(created)
            }
            Err(StorageError::AlreadyExists(msg)) => Err(RootlineError::Validation(msg)),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a family by id
    pub async fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        Ok(self.store.get_family(family_id).await?)
    }

    /// Update an existing family
    pub async fn update_family(&self, family: Family) -> Result<Family> {
        Ok(self.store.update_family(family).await?)
    }

    /// Delete a family
    ///
    /// Fails with [`RootlineError::FamilyNotEmpty`] while the family still
    /// owns members.
    pub async fn delete_family(&self, family_id: &str) -> Result<()> {
        if self.store.get_family(family_id).await?.is_none() {
            return Err(RootlineError::NotFound(format!(
                "Family {} not found",
                family_id
            )));
        }

        let member_count = self
            .store
            .count_members(Some(helpers::members_of_family(family_id)))
            .await?;
        if member_count > 0 {
            return Err(RootlineError::FamilyNotEmpty {
                family_id: family_id.to_string(),
            });
        }

        self.store.delete_family(family_id).await?;
        info!(family_id, "family deleted");
        Ok(())
    }

    /// List all families
    pub async fn list_families(&self) -> Result<Vec<Family>> {
        Ok(self.store.list_families().await?)
    }

    // =========================================================================
    // Member operations
    // =========================================================================

    /// Add a member to their family
    pub async fn add_member(&self, member: Member) -> Result<Member> {
        if self.store.get_family(&member.family_id).await?.is_none() {
            return Err(RootlineError::NotFound(format!(
                "Family {} not found",
                member.family_id
            )));
        }

        let created = self.store.create_member(member).await?;
        info!(member_id = %created.id, family_id = %created.family_id, "member created");
        Ok(created)
    }

    /// Get a member by id
    pub async fn get_member(&self, member_id: &str) -> Result<Option<Member>> {
        Ok(self.store.get_member(member_id).await?)
    }

    /// Update an existing member
    pub async fn update_member(&self, member: Member) -> Result<Member> {
        Ok(self.store.update_member(member).await?)
    }

    /// List a family's members
    pub async fn list_family_members(&self, family_id: &str) -> Result<Vec<Member>> {
        Ok(self
            .store
            .list_members(Some(helpers::members_of_family(family_id)), None, None)
            .await?)
    }

    /// List members with an arbitrary filter
    pub async fn list_members(&self, filter: MemberFilter) -> Result<Vec<Member>> {
        Ok(self.store.list_members(Some(filter), None, None).await?)
    }

    /// Remove a member, cascading everything that references them
    ///
    /// Deletes every edge touching the member in either direction, the
    /// attestations of those edges, the attestations of the member, and
    /// finally the member record itself.
    pub async fn remove_member(&self, member_id: &str) -> Result<()> {
        if self.store.get_member(member_id).await?.is_none() {
            return Err(RootlineError::NotFound(format!(
                "Member {} not found",
                member_id
            )));
        }

        let removed_edges = self
            .store
            .delete_relationships_for_member(member_id)
            .await?;
        for edge in &removed_edges {
            self.store
                .delete_attestations_for_target(AttestationTarget::Relationship, &edge.id)
                .await?;
        }

        self.store
            .delete_attestations_for_target(AttestationTarget::Member, member_id)
            .await?;

        self.store.delete_member(member_id).await?;
        info!(
            member_id,
            removed_edges = removed_edges.len(),
            "member removed with cascade"
        );
        Ok(())
    }

    // =========================================================================
    // Relationship operations
    // =========================================================================

    /// Add a relationship edge between two members of the same family
    ///
    /// Duplicate pairs are rejected with
    /// [`RootlineError::DuplicateRelationship`]: at most one edge per
    /// ordered pair, and spouse edges are also unique across the reversed
    /// pair.
    pub async fn add_relationship(&self, new: NewRelationship) -> Result<Relationship> {
        if new.member_id == new.related_member_id {
            return Err(RootlineError::Validation(
                "A member cannot be related to themselves".to_string(),
            ));
        }

        let member = self
            .store
            .get_member(&new.member_id)
            .await?
            .ok_or_else(|| {
                RootlineError::NotFound(format!("Member {} not found", new.member_id))
            })?;
        let related = self
            .store
            .get_member(&new.related_member_id)
            .await?
            .ok_or_else(|| {
                RootlineError::NotFound(format!("Member {} not found", new.related_member_id))
            })?;

        if member.family_id != related.family_id {
            return Err(RootlineError::Validation(
                "Both members must belong to the same family".to_string(),
            ));
        }

        // A spouse edge is symmetric: reject it when the reversed pair is
        // already stored, which the ordered-pair index alone would not catch.
        if new.kind == RelationshipKind::Spouse {
            let reversed = self
                .store
                .list_relationships(
                    Some(crate::storage::filters::RelationshipFilter {
                        kinds: Some(vec![RelationshipKind::Spouse]),
                        member_ids: Some(vec![new.related_member_id.clone()]),
                        related_member_ids: Some(vec![new.member_id.clone()]),
                        ..Default::default()
                    }),
                    None,
                    None,
                )
                .await?;
            if !reversed.is_empty() {
                return Err(RootlineError::DuplicateRelationship {
                    member_id: new.member_id,
                    related_member_id: new.related_member_id,
                });
            }
        }

        let mut edge = Relationship::new(
            new.member_id.clone(),
            new.related_member_id.clone(),
            new.kind,
            member.family_id,
        );
        edge.qualifier = new.qualifier;

        match self.store.create_relationship(edge).await {
            Ok(created) => {
                debug!(
                    relationship_id = %created.id,
                    kind = %created.kind,
                    "relationship created"
                );
                Ok(created)
            }
            Err(StorageError::AlreadyExists(_)) => Err(RootlineError::DuplicateRelationship {
                member_id: new.member_id,
                related_member_id: new.related_member_id,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a relationship edge by id
    pub async fn get_relationship(&self, relationship_id: &str) -> Result<Option<Relationship>> {
        Ok(self.store.get_relationship(relationship_id).await?)
    }

    /// Remove a relationship edge, cascading its attestations
    pub async fn remove_relationship(&self, relationship_id: &str) -> Result<()> {
        if self
            .store
            .get_relationship(relationship_id)
            .await?
            .is_none()
        {
            return Err(RootlineError::NotFound(format!(
                "Relationship {} not found",
                relationship_id
            )));
        }

        self.store
            .delete_attestations_for_target(AttestationTarget::Relationship, relationship_id)
            .await?;
        self.store.delete_relationship(relationship_id).await?;
        debug!(relationship_id, "relationship removed");
        Ok(())
    }

    /// All relationships of a member, as the opposite endpoints
    ///
    /// Includes the member's own edges plus spouse edges in either
    /// direction, one row per edge.
    pub async fn relationships_of(&self, member_id: &str) -> Result<Vec<RelationshipView>> {
        let own = self
            .store
            .list_relationships(
                Some(crate::storage::filters::RelationshipFilter {
                    member_ids: Some(vec![member_id.to_string()]),
                    ..Default::default()
                }),
                None,
                None,
            )
            .await?;

        let spousal = self
            .store
            .list_relationships(
                Some(helpers::spouse_edges_involving(&[member_id.to_string()])),
                None,
                None,
            )
            .await?;

        let mut edges = own;
        for edge in spousal {
            if !edges.iter().any(|existing| existing.id == edge.id) {
                edges.push(edge);
            }
        }

        let other_ids: Vec<String> = edges
            .iter()
            .filter_map(|edge| edge.other_endpoint(member_id))
            .map(str::to_string)
            .collect();
        let members = self.resolver.members_by_ids(&other_ids).await?;

        let mut views = Vec::with_capacity(edges.len());
        for edge in &edges {
            let Some(other_id) = edge.other_endpoint(member_id) else {
                continue;
            };
            let Some(other) = members.get(other_id) else {
                continue;
            };
            views.push(RelationshipView {
                relationship_id: edge.id.clone(),
                kind: edge.kind,
                qualifier: edge.qualifier.clone(),
                verified: edge.verified,
                member: PersonSummary::from(other),
            });
        }
        Ok(views)
    }

    // =========================================================================
    // Kinship queries (delegated to KinshipResolver)
    // =========================================================================

    /// Parents of a member
    pub async fn parents(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.parents(member_id).await?)
    }

    /// Children of a member
    pub async fn children(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.children(member_id).await?)
    }

    /// Spouses of a member
    pub async fn spouses(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.spouses(member_id).await?)
    }

    /// Siblings of a member
    pub async fn siblings(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.siblings(member_id).await?)
    }

    /// Grandparents of a member
    pub async fn grandparents(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.grandparents(member_id).await?)
    }

    /// Great-grandparents of a member
    pub async fn great_grandparents(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.great_grandparents(member_id).await?)
    }

    /// Grandchildren of a member
    pub async fn grandchildren(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.grandchildren(member_id).await?)
    }

    /// Great-grandchildren of a member
    pub async fn great_grandchildren(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.great_grandchildren(member_id).await?)
    }

    /// Uncles and aunts of a member
    pub async fn uncles_and_aunts(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.uncles_and_aunts(member_id).await?)
    }

    /// First cousins of a member
    pub async fn cousins(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.cousins(member_id).await?)
    }

    /// Second cousins of a member
    pub async fn second_cousins(&self, member_id: &str) -> Result<Vec<Relative>> {
        Ok(self.resolver.second_cousins(member_id).await?)
    }

    /// Ancestors of a member, bounded by the configured depth
    pub async fn ancestors(&self, member_id: &str) -> Result<AncestorLookup> {
        Ok(self.resolver.ancestors(member_id).await?)
    }

    /// Descendants of a member, bounded by the configured depth
    pub async fn descendants(&self, member_id: &str) -> Result<DescendantLookup> {
        Ok(self.resolver.descendants(member_id).await?)
    }

    // =========================================================================
    // Family tree (delegated to FamilyTreeBuilder)
    // =========================================================================

    /// The family's tree, rooted at its eldest member
    pub async fn family_tree(&self, family_id: &str) -> Result<FamilyTree> {
        Ok(self.tree_builder.build(family_id).await?)
    }

    // =========================================================================
    // Verification (delegated to VerificationLedger)
    // =========================================================================

    /// Record one user's attestation of a member
    pub async fn attest_member(
        &self,
        attestor_id: &str,
        member_id: &str,
    ) -> Result<VerificationStatus> {
        self.ledger.attest_member(attestor_id, member_id).await
    }

    /// Record one user's attestation of a relationship edge
    pub async fn attest_relationship(
        &self,
        attestor_id: &str,
        relationship_id: &str,
    ) -> Result<VerificationStatus> {
        self.ledger
            .attest_relationship(attestor_id, relationship_id)
            .await
    }

    /// Current verification state of a member
    pub async fn member_verification(&self, member_id: &str) -> Result<VerificationStatus> {
        self.ledger.member_status(member_id).await
    }

    /// Current verification state of a relationship edge
    pub async fn relationship_verification(
        &self,
        relationship_id: &str,
    ) -> Result<VerificationStatus> {
        self.ledger.relationship_status(relationship_id).await
    }

    /// Attestations recorded for a member, oldest first
    pub async fn member_attestations(
        &self,
        member_id: &str,
    ) -> Result<Vec<crate::storage::models::Attestation>> {
        self.ledger
            .attestations(AttestationTarget::Member, member_id)
            .await
    }

    /// Attestations recorded for a relationship edge, oldest first
    pub async fn relationship_attestations(
        &self,
        relationship_id: &str,
    ) -> Result<Vec<crate::storage::models::Attestation>> {
        self.ledger
            .attestations(AttestationTarget::Relationship, relationship_id)
            .await
    }
}
