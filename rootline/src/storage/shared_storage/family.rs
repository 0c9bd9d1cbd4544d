//! Family storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{record_key, SharedStorage};
use crate::models::Family;
use crate::storage::errors::StorageError;
use crate::storage::traits::FamilyStore;

/// Internal representation of a Family record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct SurrealFamily {
    id: RecordId,
    family_name: String,
    description: Option<String>,
    origin: Option<String>,
    country: Option<String>,
    county: Option<String>,
    location: Option<String>,
    tribe: Option<String>,
    verifications: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating families (without generated fields)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateFamily {
    family_name: String,
    description: Option<String>,
    origin: Option<String>,
    country: Option<String>,
    county: Option<String>,
    location: Option<String>,
    tribe: Option<String>,
    verifications: u32,
}

impl From<&Family> for CreateFamily {
    fn from(family: &Family) -> Self {
        Self {
            family_name: family.family_name.clone(),
            description: family.description.clone(),
            origin: family.origin.clone(),
            country: family.country.clone(),
            county: family.county.clone(),
            location: family.location.clone(),
            tribe: family.tribe.clone(),
            verifications: family.verifications,
        }
    }
}

impl From<SurrealFamily> for Family {
    fn from(record: SurrealFamily) -> Self {
        Self {
            id: record_key(&record.id),
            family_name: record.family_name,
            description: record.description,
            origin: record.origin,
            country: record.country,
            county: record.county,
            location: record.location,
            tribe: record.tribe,
            verifications: record.verifications,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl<C> FamilyStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new family
    async fn create_family(&self, family: Family) -> Result<Family, StorageError> {
        let name_query = r#"
            SELECT * FROM family WHERE family_name = $family_name LIMIT 1
        "#;

        let mut response = self
            .client
            .query(name_query)
            .bind(("family_name", family.family_name.clone()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to check family name: {}", e)))?;

        let existing: Vec<SurrealFamily> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract family check: {}", e)))?;

        if !existing.is_empty() {
            return Err(StorageError::AlreadyExists(format!(
                "Family named '{}' already exists",
                family.family_name
            )));
        }

        let create_family = CreateFamily::from(&family);

        let created: Option<SurrealFamily> = self
            .client
            .create(("family", family.id.as_str()))
            .content(create_family)
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("already contains") {
                    StorageError::AlreadyExists(format!(
                        "Family named '{}' already exists",
                        family.family_name
                    ))
                } else {
                    StorageError::Query(format!("Failed to create family: {}", message))
                }
            })?;

        created
            .map(Family::from)
            .ok_or_else(|| StorageError::Internal("No family created".to_string()))
    }

    /// Get a family by its ID
    async fn get_family(&self, id: &str) -> Result<Option<Family>, StorageError> {
        let family: Option<SurrealFamily> = self
            .client
            .select(("family", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get family: {}", e)))?;

        Ok(family.map(Family::from))
    }

    /// Update an existing family
    async fn update_family(&self, family: Family) -> Result<Family, StorageError> {
        let update_query = r#"
            UPDATE $record_id MERGE {
                family_name: $family_name,
                description: $description,
                origin: $origin,
                country: $country,
                county: $county,
                location: $location,
                tribe: $tribe,
                verifications: $verifications,
                updated_at: time::now()
            }
        "#;

        let mut response = self
            .client
            .query(update_query)
            .bind(("record_id", RecordId::from(("family", family.id.as_str()))))
            .bind(("family_name", family.family_name.clone()))
            .bind(("description", family.description.clone()))
            .bind(("origin", family.origin.clone()))
            .bind(("country", family.country.clone()))
            .bind(("county", family.county.clone()))
            .bind(("location", family.location.clone()))
            .bind(("tribe", family.tribe.clone()))
            .bind(("verifications", family.verifications))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update family: {}", e)))?;

        let updated: Option<SurrealFamily> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract updated family: {}", e)))?;

        updated.map(Family::from).ok_or_else(|| {
            StorageError::NotFound(format!("Family with ID {} not found", family.id))
        })
    }

    /// Delete a family by its ID
    async fn delete_family(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealFamily> = self
            .client
            .delete(("family", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete family: {}", e)))?;

        Ok(deleted.is_some())
    }

    /// List all families
    async fn list_families(&self) -> Result<Vec<Family>, StorageError> {
        let mut result = self
            .client
            .query("SELECT * FROM family ORDER BY family_name ASC")
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list families: {}", e)))?;

        let families: Vec<SurrealFamily> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract families: {}", e)))?;

        Ok(families.into_iter().map(Family::from).collect())
    }
}
