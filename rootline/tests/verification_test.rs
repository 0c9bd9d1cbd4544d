//! Integration tests for the verification ledger

mod common;

use common::*;
use rootline::storage::models::RelationshipKind;
use rootline::RootlineError;

#[tokio::test]
async fn member_is_promoted_at_the_family_threshold() {
    let t = test_graph();
    let fam = family(&t.graph, "Threshold", 3).await;
    let target = member(&t.graph, &fam.id, "Target").await;

    let first = t
        .graph
        .attest_member("user-1", &target.id)
        .await
        .expect("first attestation");
    assert_eq!(first.attestations, 1);
    assert_eq!(first.required, 3);
    assert!(!first.verified);

    let second = t
        .graph
        .attest_member("user-2", &target.id)
        .await
        .expect("second attestation");
    assert!(!second.verified);

    // Below the threshold the cached flag stays false
    let stored = t
        .graph
        .get_member(&target.id)
        .await
        .expect("lookup")
        .expect("member exists");
    assert!(!stored.verified);

    let third = t
        .graph
        .attest_member("user-3", &target.id)
        .await
        .expect("third attestation");
    assert_eq!(third.attestations, 3);
    assert!(third.verified);

    // The cached flag now agrees with the count rule
    let stored = t
        .graph
        .get_member(&target.id)
        .await
        .expect("lookup")
        .expect("member exists");
    assert!(stored.verified);
}

#[tokio::test]
async fn duplicate_attestation_is_rejected_and_changes_nothing() {
    let t = test_graph();
    let fam = family(&t.graph, "Duplicate", 3).await;
    let target = member(&t.graph, &fam.id, "Target").await;

    t.graph
        .attest_member("user-1", &target.id)
        .await
        .expect("first attestation");

    let repeat = t.graph.attest_member("user-1", &target.id).await;
    assert!(matches!(
        repeat,
        Err(RootlineError::DuplicateAttestation { .. })
    ));

    let status = t
        .graph
        .member_verification(&target.id)
        .await
        .expect("status");
    assert_eq!(status.attestations, 1, "the rejected attempt did not count");
    assert!(!status.verified);
}

#[tokio::test]
async fn relationship_edges_are_verified_the_same_way() {
    let t = test_graph();
    let fam = family(&t.graph, "EdgeVerify", 2).await;

    let child = member(&t.graph, &fam.id, "Child").await;
    let parent = member(&t.graph, &fam.id, "Parent").await;
    let edge = parent_edge(&t.graph, &child, &parent, RelationshipKind::Mother).await;

    let first = t
        .graph
        .attest_relationship("user-1", &edge.id)
        .await
        .expect("first attestation");
    assert!(!first.verified);

    let second = t
        .graph
        .attest_relationship("user-2", &edge.id)
        .await
        .expect("second attestation");
    assert!(second.verified, "threshold of two reached");

    let stored = t
        .graph
        .get_relationship(&edge.id)
        .await
        .expect("lookup")
        .expect("edge exists");
    assert!(stored.verified);

    // Duplicate attestor on the edge is rejected too
    let repeat = t.graph.attest_relationship("user-2", &edge.id).await;
    assert!(matches!(
        repeat,
        Err(RootlineError::DuplicateAttestation { .. })
    ));
}

#[tokio::test]
async fn attesting_a_missing_target_is_not_found() {
    let t = test_graph();
    family(&t.graph, "Missing", 3).await;

    let result = t.graph.attest_member("user-1", "no-such-member").await;
    assert!(matches!(result, Err(RootlineError::NotFound(_))));

    let result = t.graph.attest_relationship("user-1", "no-such-edge").await;
    assert!(matches!(result, Err(RootlineError::NotFound(_))));
}

#[tokio::test]
async fn attestation_listing_names_the_attestors() {
    let t = test_graph();
    let fam = family(&t.graph, "Listing", 3).await;
    let target = member(&t.graph, &fam.id, "Target").await;

    t.graph
        .attest_member("user-1", &target.id)
        .await
        .expect("attest");
    t.graph
        .attest_member("user-2", &target.id)
        .await
        .expect("attest");

    use rootline::storage::models::AttestationTarget;
    use rootline::storage::traits::AttestationStore;

    let attestations = t
        .store
        .list_attestations(Some(rootline::storage::filters::helpers::attestations_for(
            AttestationTarget::Member,
            &target.id,
        )))
        .await
        .expect("list attestations");

    let attestors: Vec<&str> = attestations
        .iter()
        .map(|a| a.attestor_id.as_str())
        .collect();
    assert_eq!(attestors, vec!["user-1", "user-2"]);
}

#[tokio::test]
async fn lower_threshold_families_verify_sooner() {
    let t = test_graph();
    let fam = family(&t.graph, "Quick", 1).await;
    let target = member(&t.graph, &fam.id, "Target").await;

    let status = t
        .graph
        .attest_member("user-1", &target.id)
        .await
        .expect("attest");
    assert!(status.verified, "a single attestation meets threshold one");
}
