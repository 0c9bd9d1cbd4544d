//! Integration tests for the SurrealDB SharedStorage implementation
//!
//! Exercises the store contract against the embedded in-memory engine:
//! CRUD for every table, id-set filters, and the uniqueness invariants the
//! manager and ledger rely on.

#![cfg(feature = "surrealdb-embedded")]

use rootline::models::{Family, Member};
use rootline::storage::filters::{helpers, RelationshipFilter};
use rootline::storage::models::{
    Attestation, AttestationTarget, Relationship, RelationshipKind,
};
use rootline::storage::shared_storage::{SharedStorage, SharedStorageConfig};
use rootline::storage::traits::{
    AttestationStore, BaseStore, FamilyStore, MemberStore, RelationshipStore,
};
use rootline::storage::StorageError;

type TestStorage = SharedStorage<surrealdb::engine::local::Db>;

async fn create_test_storage() -> Result<TestStorage, Box<dyn std::error::Error>> {
    let config = SharedStorageConfig {
        namespace: "test".to_string(),
        database: "rootline_test".to_string(),
    };

    let client = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(()).await?;
    let storage = SharedStorage::new(client, config).await?;
    Ok(storage)
}

fn sample_family(name: &str) -> Family {
    Family::builder(name).build()
}

fn sample_member(family_id: &str, first_name: &str) -> Member {
    Member::builder(family_id, first_name, "Surreal").build()
}

#[tokio::test]
async fn health_and_metadata() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let health = storage.health_check().await.expect("Health check failed");
    assert!(health, "Storage should be healthy");

    let metadata = storage
        .get_metadata()
        .await
        .expect("Failed to get metadata");
    assert_eq!(metadata["type"], "shared_storage");
    assert_eq!(metadata["database"], "rootline_test");
    assert_eq!(metadata["namespace"], "test");
}

#[tokio::test]
async fn member_crud_round_trip() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let family = storage
        .create_family(sample_family("CrudFamily"))
        .await
        .expect("Failed to create family");

    let member = sample_member(&family.id, "Ada");
    let created = storage
        .create_member(member.clone())
        .await
        .expect("Failed to create member");
    assert_eq!(created.id, member.id);
    assert_eq!(created.first_name, "Ada");
    assert!(!created.verified);

    let fetched = storage
        .get_member(&member.id)
        .await
        .expect("Failed to get member")
        .expect("Member should exist");
    assert_eq!(fetched.family_id, family.id);

    let mut updated = fetched.clone();
    updated.nick_name = Some("Countess".to_string());
    let updated = storage
        .update_member(updated)
        .await
        .expect("Failed to update member");
    assert_eq!(updated.nick_name.as_deref(), Some("Countess"));

    storage
        .set_member_verified(&member.id)
        .await
        .expect("Failed to set verified");
    let verified = storage
        .get_member(&member.id)
        .await
        .expect("Failed to get member")
        .expect("Member should exist");
    assert!(verified.verified);

    let removed = storage
        .delete_member(&member.id)
        .await
        .expect("Failed to delete member");
    assert!(removed);
    assert!(storage
        .get_member(&member.id)
        .await
        .expect("Failed to get member")
        .is_none());
}

#[tokio::test]
async fn member_filters_by_family_and_id_set() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let family_a = storage
        .create_family(sample_family("FilterA"))
        .await
        .expect("Failed to create family");
    let family_b = storage
        .create_family(sample_family("FilterB"))
        .await
        .expect("Failed to create family");

    let in_a = storage
        .create_member(sample_member(&family_a.id, "InA"))
        .await
        .expect("Failed to create member");
    let also_a = storage
        .create_member(sample_member(&family_a.id, "AlsoA"))
        .await
        .expect("Failed to create member");
    let in_b = storage
        .create_member(sample_member(&family_b.id, "InB"))
        .await
        .expect("Failed to create member");

    let family_members = storage
        .list_members(Some(helpers::members_of_family(&family_a.id)), None, None)
        .await
        .expect("Failed to list members");
    let ids: Vec<&str> = family_members.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&in_a.id.as_str()));
    assert!(ids.contains(&also_a.id.as_str()));
    assert!(!ids.contains(&in_b.id.as_str()));

    let by_ids = storage
        .list_members(
            Some(helpers::members_by_ids(&[in_a.id.clone(), in_b.id.clone()])),
            None,
            None,
        )
        .await
        .expect("Failed to list members by ids");
    assert_eq!(by_ids.len(), 2);
}

#[tokio::test]
async fn relationship_pair_uniqueness_is_enforced() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let family = storage
        .create_family(sample_family("Pairs"))
        .await
        .expect("Failed to create family");
    let child = storage
        .create_member(sample_member(&family.id, "Child"))
        .await
        .expect("Failed to create member");
    let parent = storage
        .create_member(sample_member(&family.id, "Parent"))
        .await
        .expect("Failed to create member");

    let edge = Relationship::new(&child.id, &parent.id, RelationshipKind::Father, &family.id);
    storage
        .create_relationship(edge)
        .await
        .expect("Failed to create relationship");

    let duplicate = Relationship::new(&child.id, &parent.id, RelationshipKind::Mother, &family.id);
    let result = storage.create_relationship(duplicate).await;
    assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
}

#[tokio::test]
async fn relationship_filters_cover_both_endpoints() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let family = storage
        .create_family(sample_family("Endpoints"))
        .await
        .expect("Failed to create family");
    let child = storage
        .create_member(sample_member(&family.id, "Child"))
        .await
        .expect("Failed to create member");
    let father = storage
        .create_member(sample_member(&family.id, "Father"))
        .await
        .expect("Failed to create member");
    let spouse = storage
        .create_member(sample_member(&family.id, "Spouse"))
        .await
        .expect("Failed to create member");

    storage
        .create_relationship(Relationship::new(
            &child.id,
            &father.id,
            RelationshipKind::Father,
            &family.id,
        ))
        .await
        .expect("Failed to create parental edge");
    storage
        .create_relationship(Relationship::new(
            &spouse.id,
            &father.id,
            RelationshipKind::Spouse,
            &family.id,
        ))
        .await
        .expect("Failed to create spouse edge");

    // Parent lookup: edges naming the child's parents
    let upward = storage
        .list_relationships(
            Some(helpers::parent_edges_of(&[child.id.clone()])),
            None,
            None,
        )
        .await
        .expect("Failed to list parent edges");
    assert_eq!(upward.len(), 1);
    assert_eq!(upward[0].related_member_id, father.id);

    // Child lookup: edges naming the father's children
    let downward = storage
        .list_relationships(
            Some(helpers::child_edges_of(&[father.id.clone()])),
            None,
            None,
        )
        .await
        .expect("Failed to list child edges");
    assert_eq!(downward.len(), 1);
    assert_eq!(downward[0].member_id, child.id);

    // Spouse lookup from either endpoint
    let spousal = storage
        .list_relationships(
            Some(helpers::spouse_edges_involving(&[father.id.clone()])),
            None,
            None,
        )
        .await
        .expect("Failed to list spouse edges");
    assert_eq!(spousal.len(), 1);
    assert_eq!(spousal[0].member_id, spouse.id);

    // Kind filter alone
    let parental_only = storage
        .list_relationships(
            Some(RelationshipFilter {
                kinds: Some(RelationshipKind::PARENTAL.to_vec()),
                ..Default::default()
            }),
            None,
            None,
        )
        .await
        .expect("Failed to list by kind");
    assert_eq!(parental_only.len(), 1);
}

#[tokio::test]
async fn delete_relationships_for_member_returns_removed_edges() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let family = storage
        .create_family(sample_family("EdgeSweep"))
        .await
        .expect("Failed to create family");
    let target = storage
        .create_member(sample_member(&family.id, "Target"))
        .await
        .expect("Failed to create member");
    let parent = storage
        .create_member(sample_member(&family.id, "Parent"))
        .await
        .expect("Failed to create member");
    let child = storage
        .create_member(sample_member(&family.id, "Child"))
        .await
        .expect("Failed to create member");

    storage
        .create_relationship(Relationship::new(
            &target.id,
            &parent.id,
            RelationshipKind::Mother,
            &family.id,
        ))
        .await
        .expect("Failed to create upward edge");
    storage
        .create_relationship(Relationship::new(
            &child.id,
            &target.id,
            RelationshipKind::Mother,
            &family.id,
        ))
        .await
        .expect("Failed to create downward edge");

    let removed = storage
        .delete_relationships_for_member(&target.id)
        .await
        .expect("Failed to sweep edges");
    assert_eq!(removed.len(), 2, "both directions are swept");

    let remaining = storage
        .count_relationships(None)
        .await
        .expect("Failed to count relationships");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn attestation_uniqueness_and_count() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    let family = storage
        .create_family(sample_family("Attest"))
        .await
        .expect("Failed to create family");
    let target = storage
        .create_member(sample_member(&family.id, "Target"))
        .await
        .expect("Failed to create member");

    storage
        .insert_attestation(Attestation::new(
            "user-1",
            AttestationTarget::Member,
            &target.id,
        ))
        .await
        .expect("Failed to insert attestation");
    storage
        .insert_attestation(Attestation::new(
            "user-2",
            AttestationTarget::Member,
            &target.id,
        ))
        .await
        .expect("Failed to insert attestation");

    let duplicate = storage
        .insert_attestation(Attestation::new(
            "user-1",
            AttestationTarget::Member,
            &target.id,
        ))
        .await;
    assert!(matches!(duplicate, Err(StorageError::AlreadyExists(_))));

    let count = storage
        .count_attestations(AttestationTarget::Member, &target.id)
        .await
        .expect("Failed to count attestations");
    assert_eq!(count, 2);

    let removed = storage
        .delete_attestations_for_target(AttestationTarget::Member, &target.id)
        .await
        .expect("Failed to delete attestations");
    assert_eq!(removed, 2);

    let count = storage
        .count_attestations(AttestationTarget::Member, &target.id)
        .await
        .expect("Failed to count attestations");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn rocksdb_engine_round_trips_on_disk() {
    use rootline::storage::shared_storage::create_embedded_shared_storage;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("graph");
    let config = SharedStorageConfig {
        namespace: "test".to_string(),
        database: "rootline_test".to_string(),
    };

    let storage = create_embedded_shared_storage(path.to_str().expect("utf8 path"), config)
        .await
        .expect("Failed to create RocksDB storage");

    let family = storage
        .create_family(sample_family("OnDisk"))
        .await
        .expect("Failed to create family");
    let fetched = storage
        .get_family(&family.id)
        .await
        .expect("Failed to get family")
        .expect("Family should exist");
    assert_eq!(fetched.family_name, "OnDisk");
}

#[tokio::test]
async fn family_names_are_unique() {
    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");

    storage
        .create_family(sample_family("TheOnlyOne"))
        .await
        .expect("Failed to create family");

    let duplicate = storage.create_family(sample_family("TheOnlyOne")).await;
    assert!(matches!(duplicate, Err(StorageError::AlreadyExists(_))));
}

#[tokio::test]
async fn manager_runs_against_shared_storage() {
    use rootline::config::ConfigBuilder;
    use rootline::core::{FamilyGraphManager, NewRelationship};
    use std::sync::Arc;

    let storage = create_test_storage()
        .await
        .expect("Failed to create test storage");
    let config = ConfigBuilder::development().build().expect("config builds");
    let graph = FamilyGraphManager::new(Arc::new(storage), config);

    let family = graph
        .create_family(sample_family("EndToEnd"))
        .await
        .expect("Failed to create family");
    let parent = graph
        .add_member(sample_member(&family.id, "Parent"))
        .await
        .expect("Failed to add member");
    let child = graph
        .add_member(sample_member(&family.id, "Child"))
        .await
        .expect("Failed to add member");

    graph
        .add_relationship(NewRelationship {
            member_id: child.id.clone(),
            related_member_id: parent.id.clone(),
            kind: RelationshipKind::Mother,
            qualifier: None,
        })
        .await
        .expect("Failed to add relationship");

    let parents = graph.parents(&child.id).await.expect("parents resolve");
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].id, parent.id);

    let children = graph.children(&parent.id).await.expect("children resolve");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, child.id);
}
