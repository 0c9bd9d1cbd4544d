//! Relationship edge storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{quoted_id_list, record_key, SharedStorage};
use crate::storage::errors::StorageError;
use crate::storage::filters::RelationshipFilter;
use crate::storage::models::{Relationship, RelationshipKind};
use crate::storage::traits::RelationshipStore;

/// Internal representation of a Relationship record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct SurrealRelationship {
    id: RecordId,
    member_id: String,
    related_member_id: String,
    kind: RelationshipKind,
    qualifier: Option<String>,
    verified: bool,
    family_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating relationships (without generated fields)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateRelationship {
    member_id: String,
    related_member_id: String,
    kind: RelationshipKind,
    qualifier: Option<String>,
    verified: bool,
    family_id: String,
}

impl From<&Relationship> for CreateRelationship {
    fn from(relationship: &Relationship) -> Self {
        Self {
            member_id: relationship.member_id.clone(),
            related_member_id: relationship.related_member_id.clone(),
            kind: relationship.kind,
            qualifier: relationship.qualifier.clone(),
            verified: relationship.verified,
            family_id: relationship.family_id.clone(),
        }
    }
}

impl From<SurrealRelationship> for Relationship {
    fn from(record: SurrealRelationship) -> Self {
        Self {
            id: record_key(&record.id),
            member_id: record.member_id,
            related_member_id: record.related_member_id,
            kind: record.kind,
            qualifier: record.qualifier,
            verified: record.verified,
            family_id: record.family_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl<C> RelationshipStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new edge
    async fn create_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        // Pre-check the pair so the duplicate maps to a deterministic error;
        // the UNIQUE index remains the authoritative guard underneath.
        let pair_query = r#"
            SELECT * FROM relationship
            WHERE member_id = $member_id AND related_member_id = $related_member_id
            LIMIT 1
        "#;

        let mut response = self
            .client
            .query(pair_query)
            .bind(("member_id", relationship.member_id.clone()))
            .bind(("related_member_id", relationship.related_member_id.clone()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to check edge pair: {}", e)))?;

        let existing: Vec<SurrealRelationship> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract edge pair: {}", e)))?;

        if !existing.is_empty() {
            return Err(StorageError::AlreadyExists(format!(
                "A relationship between {} and {} already exists",
                relationship.member_id, relationship.related_member_id
            )));
        }

        let create_relationship = CreateRelationship::from(&relationship);

        let created: Option<SurrealRelationship> = self
            .client
            .create(("relationship", relationship.id.as_str()))
            .content(create_relationship)
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("already contains") {
                    StorageError::AlreadyExists(format!(
                        "A relationship between {} and {} already exists",
                        relationship.member_id, relationship.related_member_id
                    ))
                } else {
                    StorageError::Query(format!("Failed to create relationship: {}", message))
                }
            })?;

        created
            .map(Relationship::from)
            .ok_or_else(|| StorageError::Internal("No relationship created".to_string()))
    }

    /// Get an edge by its ID
    async fn get_relationship(&self, id: &str) -> Result<Option<Relationship>, StorageError> {
        let relationship: Option<SurrealRelationship> = self
            .client
            .select(("relationship", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get relationship: {}", e)))?;

        Ok(relationship.map(Relationship::from))
    }

    /// Delete an edge by its ID
    async fn delete_relationship(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealRelationship> = self
            .client
            .delete(("relationship", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete relationship: {}", e)))?;

        Ok(deleted.is_some())
    }

    /// Delete every edge touching the member, in either direction
    async fn delete_relationships_for_member(
        &self,
        member_id: &str,
    ) -> Result<Vec<Relationship>, StorageError> {
        let select_query = r#"
            SELECT * FROM relationship
            WHERE member_id = $member_id OR related_member_id = $member_id
        "#;

        let member_id_owned = member_id.to_string();
        let mut response = self
            .client
            .query(select_query)
            .bind(("member_id", member_id_owned.clone()))
            .await
            .map_err(|e| {
                StorageError::Query(format!("Failed to select member relationships: {}", e))
            })?;

        let doomed: Vec<SurrealRelationship> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract member relationships: {}", e))
        })?;

        let delete_query = r#"
            DELETE relationship
            WHERE member_id = $member_id OR related_member_id = $member_id
        "#;

        self.client
            .query(delete_query)
            .bind(("member_id", member_id_owned))
            .await
            .map_err(|e| {
                StorageError::Query(format!("Failed to delete member relationships: {}", e))
            })?;

        Ok(doomed.into_iter().map(Relationship::from).collect())
    }

    /// List edges with optional filtering
    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Relationship>, StorageError> {
        if filter.is_none() && limit.is_none() && offset.is_none() {
            let relationships: Vec<SurrealRelationship> =
                self.client.select("relationship").await.map_err(|e| {
                    StorageError::Query(format!("Failed to list relationships: {}", e))
                })?;

            return Ok(relationships.into_iter().map(Relationship::from).collect());
        }

        let mut query = "SELECT * FROM relationship".to_string();
        let mut conditions = Vec::new();

        if let Some(f) = &filter {
            if let Some(ids) = &f.ids
                && !ids.is_empty()
            {
                let id_list = ids
                    .iter()
                    .map(|id| format!("relationship:⟨{}⟩", id))
                    .collect::<Vec<_>>()
                    .join(", ");
                conditions.push(format!("id IN [{}]", id_list));
            }

            if let Some(kinds) = &f.kinds
                && !kinds.is_empty()
            {
                let kind_list = kinds
                    .iter()
                    .map(|kind| format!("'{}'", kind))
                    .collect::<Vec<_>>()
                    .join(", ");
                conditions.push(format!("kind IN [{}]", kind_list));
            }

            if let Some(member_ids) = &f.member_ids
                && !member_ids.is_empty()
            {
                conditions.push(format!("member_id IN [{}]", quoted_id_list(member_ids)));
            }

            if let Some(related_ids) = &f.related_member_ids
                && !related_ids.is_empty()
            {
                conditions.push(format!(
                    "related_member_id IN [{}]",
                    quoted_id_list(related_ids)
                ));
            }

            if let Some(involving) = &f.involving
                && !involving.is_empty()
            {
                let id_list = quoted_id_list(involving);
                conditions.push(format!(
                    "(member_id IN [{id_list}] OR related_member_id IN [{id_list}])"
                ));
            }

            if let Some(family_id) = &f.family_id {
                conditions.push(format!("family_id = '{}'", family_id));
            }

            if let Some(verified) = f.verified {
                conditions.push(format!("verified = {}", verified));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at ASC");

        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            query.push_str(&format!(" START {}", offset));
        }

        let mut result = self
            .client
            .query(&query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list relationships: {}", e)))?;

        let relationships: Vec<SurrealRelationship> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract relationships: {}", e)))?;

        Ok(relationships.into_iter().map(Relationship::from).collect())
    }

    /// Count edges with optional filtering
    async fn count_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<usize, StorageError> {
        let relationships = self.list_relationships(filter, None, None).await?;
        Ok(relationships.len())
    }

    /// Flip an edge's derived verified flag to true
    async fn set_relationship_verified(&self, id: &str) -> Result<(), StorageError> {
        let update_query = r#"
            UPDATE $record_id MERGE {
                verified: true,
                updated_at: time::now()
            }
        "#;

        let mut response = self
            .client
            .query(update_query)
            .bind(("record_id", RecordId::from(("relationship", id))))
            .await
            .map_err(|e| {
                StorageError::Query(format!("Failed to set relationship verified: {}", e))
            })?;

        let updated: Option<SurrealRelationship> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract updated relationship: {}", e))
        })?;

        match updated {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(format!(
                "Relationship with ID {} not found",
                id
            ))),
        }
    }
}
