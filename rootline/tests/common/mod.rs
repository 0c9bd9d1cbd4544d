//! Shared fixtures for the integration test suites
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rootline::config::ConfigBuilder;
use rootline::core::{FamilyGraphManager, NewRelationship};
use rootline::models::{DateQualifier, Family, Member};
use rootline::storage::models::{Relationship, RelationshipKind};
use rootline::storage::{FamilyGraphStore, InMemoryStore};

/// A manager over a fresh in-process store, plus direct store access for
/// asserting on raw rows.
pub struct TestGraph {
    pub graph: FamilyGraphManager,
    pub store: Arc<InMemoryStore>,
}

/// Build a manager over a fresh in-memory store
pub fn test_graph() -> TestGraph {
    let config = ConfigBuilder::development().build().expect("config builds");
    let store = Arc::new(InMemoryStore::new());
    let dyn_store: Arc<dyn FamilyGraphStore> = store.clone();
    TestGraph {
        graph: FamilyGraphManager::new(dyn_store, config),
        store,
    }
}

/// Create a family with the given attestation threshold
pub async fn family(graph: &FamilyGraphManager, name: &str, verifications: u32) -> Family {
    graph
        .create_family(Family::builder(name).verifications(verifications).build())
        .await
        .expect("family creates")
}

/// Create a member with just a name
pub async fn member(graph: &FamilyGraphManager, family_id: &str, first_name: &str) -> Member {
    graph
        .add_member(Member::builder(family_id, first_name, "Test").build())
        .await
        .expect("member creates")
}

/// Create a member with a birth date
pub async fn member_born(
    graph: &FamilyGraphManager,
    family_id: &str,
    first_name: &str,
    birth: (i32, u32, u32),
) -> Member {
    let date = NaiveDate::from_ymd_opt(birth.0, birth.1, birth.2).expect("valid date");
    graph
        .add_member(
            Member::builder(family_id, first_name, "Test")
                .date_of_birth(date, DateQualifier::Exact)
                .build(),
        )
        .await
        .expect("member creates")
}

/// Record `parent` as the father/mother of `child`
pub async fn parent_edge(
    graph: &FamilyGraphManager,
    child: &Member,
    parent: &Member,
    kind: RelationshipKind,
) -> Relationship {
    graph
        .add_relationship(NewRelationship {
            member_id: child.id.clone(),
            related_member_id: parent.id.clone(),
            kind,
            qualifier: None,
        })
        .await
        .expect("parent edge creates")
}

/// Record a spouse edge between two members
pub async fn spouse_edge(graph: &FamilyGraphManager, a: &Member, b: &Member) -> Relationship {
    graph
        .add_relationship(NewRelationship {
            member_id: a.id.clone(),
            related_member_id: b.id.clone(),
            kind: RelationshipKind::Spouse,
            qualifier: None,
        })
        .await
        .expect("spouse edge creates")
}

/// Ids of a relative list, insertion order preserved
pub fn ids(relatives: &[rootline::kinship::Relative]) -> Vec<String> {
    relatives.iter().map(|r| r.id.clone()).collect()
}
