//! Integration tests for member/relationship/family lifecycle and cascades

mod common;

use common::*;
use rootline::core::NewRelationship;
use rootline::storage::filters::RelationshipFilter;
use rootline::storage::models::{AttestationTarget, RelationshipKind};
use rootline::storage::traits::{AttestationStore, RelationshipStore};
use rootline::RootlineError;

#[tokio::test]
async fn deleting_a_member_cascades_edges_and_attestations() {
    let t = test_graph();
    let fam = family(&t.graph, "Cascade", 3).await;

    let target = member(&t.graph, &fam.id, "Target").await;
    let parent = member(&t.graph, &fam.id, "Parent").await;
    let child = member(&t.graph, &fam.id, "Child").await;
    let spouse = member(&t.graph, &fam.id, "Spouse").await;

    // target in the middle of the graph: has a parent, a child, a spouse
    let parent_link = parent_edge(&t.graph, &target, &parent, RelationshipKind::Father).await;
    parent_edge(&t.graph, &child, &target, RelationshipKind::Father).await;
    spouse_edge(&t.graph, &target, &spouse).await;

    // attestations on the member and on one of the edges
    t.graph
        .attest_member("user-1", &target.id)
        .await
        .expect("attest member");
    t.graph
        .attest_relationship("user-1", &parent_link.id)
        .await
        .expect("attest edge");

    t.graph.remove_member(&target.id).await.expect("cascade delete");

    // Both edge directions are empty
    let as_member = t
        .store
        .list_relationships(
            Some(RelationshipFilter {
                member_ids: Some(vec![target.id.clone()]),
                ..Default::default()
            }),
            None,
            None,
        )
        .await
        .expect("list");
    let as_related = t
        .store
        .list_relationships(
            Some(RelationshipFilter {
                related_member_ids: Some(vec![target.id.clone()]),
                ..Default::default()
            }),
            None,
            None,
        )
        .await
        .expect("list");
    assert!(as_member.is_empty());
    assert!(as_related.is_empty());

    // Attestations on the member and on its edges are gone
    let member_attestations = t
        .store
        .count_attestations(AttestationTarget::Member, &target.id)
        .await
        .expect("count");
    assert_eq!(member_attestations, 0);

    let edge_attestations = t
        .store
        .count_attestations(AttestationTarget::Relationship, &parent_link.id)
        .await
        .expect("count");
    assert_eq!(edge_attestations, 0);

    // Untouched members survive
    assert!(t.graph.get_member(&parent.id).await.expect("ok").is_some());
    assert!(t.graph.get_member(&target.id).await.expect("ok").is_none());
}

#[tokio::test]
async fn duplicate_edges_are_rejected() {
    let t = test_graph();
    let fam = family(&t.graph, "DupEdges", 3).await;

    let child = member(&t.graph, &fam.id, "Child").await;
    let parent = member(&t.graph, &fam.id, "Parent").await;

    parent_edge(&t.graph, &child, &parent, RelationshipKind::Father).await;

    // Same ordered pair again, even with a different kind
    let repeat = t
        .graph
        .add_relationship(NewRelationship {
            member_id: child.id.clone(),
            related_member_id: parent.id.clone(),
            kind: RelationshipKind::Mother,
            qualifier: None,
        })
        .await;
    assert!(matches!(
        repeat,
        Err(RootlineError::DuplicateRelationship { .. })
    ));
}

#[tokio::test]
async fn spouse_edges_are_rejected_in_both_directions() {
    let t = test_graph();
    let fam = family(&t.graph, "DupSpouse", 3).await;

    let a = member(&t.graph, &fam.id, "A").await;
    let b = member(&t.graph, &fam.id, "B").await;

    spouse_edge(&t.graph, &a, &b).await;

    let reversed = t
        .graph
        .add_relationship(NewRelationship {
            member_id: b.id.clone(),
            related_member_id: a.id.clone(),
            kind: RelationshipKind::Spouse,
            qualifier: None,
        })
        .await;
    assert!(matches!(
        reversed,
        Err(RootlineError::DuplicateRelationship { .. })
    ));
}

#[tokio::test]
async fn self_edges_and_cross_family_edges_are_invalid() {
    let t = test_graph();
    let fam_a = family(&t.graph, "FamilyA", 3).await;
    let fam_b = family(&t.graph, "FamilyB", 3).await;

    let a = member(&t.graph, &fam_a.id, "A").await;
    let b = member(&t.graph, &fam_b.id, "B").await;

    let self_edge = t
        .graph
        .add_relationship(NewRelationship {
            member_id: a.id.clone(),
            related_member_id: a.id.clone(),
            kind: RelationshipKind::Spouse,
            qualifier: None,
        })
        .await;
    assert!(matches!(self_edge, Err(RootlineError::Validation(_))));

    let cross_family = t
        .graph
        .add_relationship(NewRelationship {
            member_id: a.id.clone(),
            related_member_id: b.id.clone(),
            kind: RelationshipKind::Spouse,
            qualifier: None,
        })
        .await;
    assert!(matches!(cross_family, Err(RootlineError::Validation(_))));
}

#[tokio::test]
async fn removing_an_edge_cascades_its_attestations() {
    let t = test_graph();
    let fam = family(&t.graph, "EdgeCascade", 3).await;

    let child = member(&t.graph, &fam.id, "Child").await;
    let parent = member(&t.graph, &fam.id, "Parent").await;
    let edge = parent_edge(&t.graph, &child, &parent, RelationshipKind::Mother).await;

    t.graph
        .attest_relationship("user-1", &edge.id)
        .await
        .expect("attest");

    t.graph.remove_relationship(&edge.id).await.expect("remove");

    assert!(t
        .graph
        .get_relationship(&edge.id)
        .await
        .expect("ok")
        .is_none());
    let count = t
        .store
        .count_attestations(AttestationTarget::Relationship, &edge.id)
        .await
        .expect("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn relationships_of_lists_both_directions_of_spouse_edges() {
    let t = test_graph();
    let fam = family(&t.graph, "Views", 3).await;

    let anchor = member(&t.graph, &fam.id, "Anchor").await;
    let parent = member(&t.graph, &fam.id, "Parent").await;
    let spouse = member(&t.graph, &fam.id, "Spouse").await;

    parent_edge(&t.graph, &anchor, &parent, RelationshipKind::Mother).await;
    // Spouse edge stored with the anchor on the far side
    spouse_edge(&t.graph, &spouse, &anchor).await;

    let views = t
        .graph
        .relationships_of(&anchor.id)
        .await
        .expect("views resolve");

    assert_eq!(views.len(), 2);
    let by_kind: Vec<(RelationshipKind, &str)> = views
        .iter()
        .map(|view| (view.kind, view.member.id.as_str()))
        .collect();
    assert!(by_kind.contains(&(RelationshipKind::Mother, parent.id.as_str())));
    assert!(by_kind.contains(&(RelationshipKind::Spouse, spouse.id.as_str())));
}

#[tokio::test]
async fn families_with_members_cannot_be_deleted() {
    let t = test_graph();
    let fam = family(&t.graph, "Guarded", 3).await;
    let resident = member(&t.graph, &fam.id, "Resident").await;

    let blocked = t.graph.delete_family(&fam.id).await;
    assert!(matches!(blocked, Err(RootlineError::FamilyNotEmpty { .. })));

    t.graph.remove_member(&resident.id).await.expect("remove member");
    t.graph.delete_family(&fam.id).await.expect("now deletable");
    assert!(t.graph.get_family(&fam.id).await.expect("ok").is_none());
}

#[tokio::test]
async fn duplicate_family_names_are_rejected() {
    let t = test_graph();
    family(&t.graph, "Unique", 3).await;

    let repeat = t
        .graph
        .create_family(rootline::models::Family::builder("Unique").build())
        .await;
    assert!(matches!(repeat, Err(RootlineError::Validation(_))));
}

#[tokio::test]
async fn adding_members_to_missing_families_is_not_found() {
    let t = test_graph();

    let orphan = t
        .graph
        .add_member(rootline::models::Member::builder("no-such-family", "A", "B").build())
        .await;
    assert!(matches!(orphan, Err(RootlineError::NotFound(_))));
}
