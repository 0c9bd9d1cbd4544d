//! Attestation storage implementation
//!
//! The `(attestor_id, target_kind, target_id)` UNIQUE index is the
//! serialization point for concurrent attestations: whichever insert loses
//! the race surfaces as `AlreadyExists`, and the ledger's follow-up count
//! read always observes the committed rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{record_key, SharedStorage};
use crate::storage::errors::StorageError;
use crate::storage::filters::AttestationFilter;
use crate::storage::models::{Attestation, AttestationTarget};
use crate::storage::traits::AttestationStore;

/// Internal representation of an Attestation record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct SurrealAttestation {
    id: RecordId,
    attestor_id: String,
    target_kind: AttestationTarget,
    target_id: String,
    created_at: DateTime<Utc>,
}

/// Struct for creating attestations (without generated fields)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateAttestation {
    attestor_id: String,
    target_kind: AttestationTarget,
    target_id: String,
}

impl From<SurrealAttestation> for Attestation {
    fn from(record: SurrealAttestation) -> Self {
        Self {
            id: record_key(&record.id),
            attestor_id: record.attestor_id,
            target: record.target_kind,
            target_id: record.target_id,
            created_at: record.created_at,
        }
    }
}

#[async_trait]
impl<C> AttestationStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Record an attestation
    async fn insert_attestation(
        &self,
        attestation: Attestation,
    ) -> Result<Attestation, StorageError> {
        let existing_query = r#"
            SELECT * FROM attestation
            WHERE attestor_id = $attestor_id
              AND target_kind = $target_kind
              AND target_id = $target_id
            LIMIT 1
        "#;

        let mut response = self
            .client
            .query(existing_query)
            .bind(("attestor_id", attestation.attestor_id.clone()))
            .bind(("target_kind", attestation.target))
            .bind(("target_id", attestation.target_id.clone()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to check attestation: {}", e)))?;

        let existing: Vec<SurrealAttestation> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract attestation check: {}", e))
        })?;

        if !existing.is_empty() {
            return Err(StorageError::AlreadyExists(format!(
                "User {} has already attested {} {}",
                attestation.attestor_id, attestation.target, attestation.target_id
            )));
        }

        let create_attestation = CreateAttestation {
            attestor_id: attestation.attestor_id.clone(),
            target_kind: attestation.target,
            target_id: attestation.target_id.clone(),
        };

        let created: Option<SurrealAttestation> = self
            .client
            .create(("attestation", attestation.id.as_str()))
            .content(create_attestation)
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("already contains") {
                    StorageError::AlreadyExists(format!(
                        "User {} has already attested {} {}",
                        attestation.attestor_id, attestation.target, attestation.target_id
                    ))
                } else {
                    StorageError::Query(format!("Failed to create attestation: {}", message))
                }
            })?;

        created
            .map(Attestation::from)
            .ok_or_else(|| StorageError::Internal("No attestation created".to_string()))
    }

    /// Count distinct attestations for a target
    async fn count_attestations(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<usize, StorageError> {
        let query = r#"
            SELECT * FROM attestation
            WHERE target_kind = $target_kind AND target_id = $target_id
        "#;

        let mut response = self
            .client
            .query(query)
            .bind(("target_kind", target))
            .bind(("target_id", target_id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to count attestations: {}", e)))?;

        let attestations: Vec<SurrealAttestation> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract attestations: {}", e)))?;

        Ok(attestations.len())
    }

    /// List attestations with optional filtering
    async fn list_attestations(
        &self,
        filter: Option<AttestationFilter>,
    ) -> Result<Vec<Attestation>, StorageError> {
        let mut query = "SELECT * FROM attestation".to_string();
        let mut conditions = Vec::new();

        if let Some(f) = &filter {
            if let Some(attestor_id) = &f.attestor_id {
                conditions.push(format!("attestor_id = '{}'", attestor_id));
            }

            if let Some(target) = &f.target {
                conditions.push(format!("target_kind = '{}'", target));
            }

            if let Some(target_id) = &f.target_id {
                conditions.push(format!("target_id = '{}'", target_id));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at ASC");

        let mut result = self
            .client
            .query(&query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list attestations: {}", e)))?;

        let attestations: Vec<SurrealAttestation> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract attestations: {}", e)))?;

        Ok(attestations.into_iter().map(Attestation::from).collect())
    }

    /// Delete all attestations for a target
    async fn delete_attestations_for_target(
        &self,
        target: AttestationTarget,
        target_id: &str,
    ) -> Result<usize, StorageError> {
        let count = self.count_attestations(target, target_id).await?;

        let delete_query = r#"
            DELETE attestation
            WHERE target_kind = $target_kind AND target_id = $target_id
        "#;

        self.client
            .query(delete_query)
            .bind(("target_kind", target))
            .bind(("target_id", target_id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete attestations: {}", e)))?;

        Ok(count)
    }
}
