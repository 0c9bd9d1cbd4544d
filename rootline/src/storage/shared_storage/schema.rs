//! Schema initialization and management for SharedStorage

use surrealdb::{Connection, Surreal};

use crate::storage::errors::StorageError;

/// Initialize the SharedStorage schema with tables and indexes for Rootline
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    // Family table: ownership boundary for everything else
    let family_table_query = r#"
        DEFINE TABLE family SCHEMALESS
        COMMENT "Stores families owning members and relationships";

        DEFINE FIELD id ON family TYPE record<family>;
        DEFINE FIELD family_name ON family TYPE string;
        DEFINE FIELD verifications ON family TYPE int DEFAULT 3;
        DEFINE FIELD created_at ON family TYPE datetime DEFAULT time::now();
        DEFINE FIELD updated_at ON family TYPE datetime DEFAULT time::now();

        DEFINE INDEX family_name_idx ON family FIELDS family_name UNIQUE;
    "#;

    // Member table
    let member_table_query = r#"
        DEFINE TABLE member SCHEMALESS
        COMMENT "Stores family members";

        DEFINE FIELD id ON member TYPE record<member>;
        DEFINE FIELD family_id ON member TYPE string;
        DEFINE FIELD first_name ON member TYPE string;
        DEFINE FIELD last_name ON member TYPE string;
        DEFINE FIELD gender ON member TYPE string DEFAULT "unspecified";
        DEFINE FIELD verified ON member TYPE bool DEFAULT false;
        DEFINE FIELD created_at ON member TYPE datetime DEFAULT time::now();
        DEFINE FIELD updated_at ON member TYPE datetime DEFAULT time::now();

        DEFINE INDEX member_family_idx ON member FIELDS family_id;
        DEFINE INDEX member_verified_idx ON member FIELDS verified;
    "#;

    // Relationship edge table. The composite UNIQUE index is the store-level
    // duplicate-edge guard.
    let relationship_table_query = r#"
        DEFINE TABLE relationship SCHEMALESS
        COMMENT "Stores typed relationship edges between members";

        DEFINE FIELD id ON relationship TYPE record<relationship>;
        DEFINE FIELD member_id ON relationship TYPE string;
        DEFINE FIELD related_member_id ON relationship TYPE string;
        DEFINE FIELD kind ON relationship TYPE string;
        DEFINE FIELD family_id ON relationship TYPE string;
        DEFINE FIELD verified ON relationship TYPE bool DEFAULT false;
        DEFINE FIELD created_at ON relationship TYPE datetime DEFAULT time::now();
        DEFINE FIELD updated_at ON relationship TYPE datetime DEFAULT time::now();

        DEFINE INDEX relationship_pair_idx ON relationship FIELDS member_id, related_member_id UNIQUE;
        DEFINE INDEX relationship_member_idx ON relationship FIELDS member_id;
        DEFINE INDEX relationship_related_idx ON relationship FIELDS related_member_id;
        DEFINE INDEX relationship_kind_idx ON relationship FIELDS kind;
        DEFINE INDEX relationship_family_idx ON relationship FIELDS family_id;
    "#;

    // Attestation table. The composite UNIQUE index enforces the
    // one-attestation-per-user-per-target invariant the verification ledger
    // relies on.
    let attestation_table_query = r#"
        DEFINE TABLE attestation SCHEMALESS
        COMMENT "Stores per-user attestations of members and relationships";

        DEFINE FIELD id ON attestation TYPE record<attestation>;
        DEFINE FIELD attestor_id ON attestation TYPE string;
        DEFINE FIELD target_kind ON attestation TYPE string;
        DEFINE FIELD target_id ON attestation TYPE string;
        DEFINE FIELD created_at ON attestation TYPE datetime DEFAULT time::now();

        DEFINE INDEX attestation_unique_idx ON attestation FIELDS attestor_id, target_kind, target_id UNIQUE;
        DEFINE INDEX attestation_target_idx ON attestation FIELDS target_kind, target_id;
    "#;

    execute_schema_query(client, family_table_query, "family table").await?;
    execute_schema_query(client, member_table_query, "member table").await?;
    execute_schema_query(client, relationship_table_query, "relationship table").await?;
    execute_schema_query(client, attestation_table_query, "attestation table").await?;

    tracing::info!("SharedStorage schema initialized successfully");
    Ok(())
}

/// Execute a schema query and handle errors
async fn execute_schema_query<C>(
    client: &Surreal<C>,
    query: &str,
    description: &str,
) -> Result<(), StorageError>
where
    C: Connection,
{
    client
        .query(query)
        .await
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?;

    tracing::debug!("Created {} successfully", description);
    Ok(())
}

/// Drop all Rootline tables (useful for testing)
pub async fn drop_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let drop_queries = vec![
        "REMOVE TABLE IF EXISTS attestation;",
        "REMOVE TABLE IF EXISTS relationship;",
        "REMOVE TABLE IF EXISTS member;",
        "REMOVE TABLE IF EXISTS family;",
    ];

    for query in drop_queries {
        client
            .query(query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to drop tables: {}", e)))?;
    }

    tracing::info!("SharedStorage schema dropped successfully");
    Ok(())
}
