//! Integration tests for the depth-bounded ancestor/descendant traversals

mod common;

use common::*;
use rootline::storage::models::RelationshipKind;

#[tokio::test]
async fn ancestors_of_three_generation_chain_has_two_levels() {
    let t = test_graph();
    let fam = family(&t.graph, "Chain", 3).await;

    let anchor = member(&t.graph, &fam.id, "Anchor").await;
    let parent = member(&t.graph, &fam.id, "Parent").await;
    let grandparent = member(&t.graph, &fam.id, "Grandparent").await;

    parent_edge(&t.graph, &anchor, &parent, RelationshipKind::Father).await;
    parent_edge(&t.graph, &parent, &grandparent, RelationshipKind::Father).await;

    let lookup = t.graph.ancestors(&anchor.id).await.expect("ancestors resolve");

    // Level one: the parent; level two: the grandparent; nothing deeper.
    assert_eq!(lookup.count, 2);
    assert!(!lookup.depth_limited);
    assert_eq!(lookup.ancestors.len(), 1);
    assert_eq!(lookup.ancestors[0].member.id, parent.id);
    assert_eq!(lookup.ancestors[0].parents.len(), 1);
    assert_eq!(lookup.ancestors[0].parents[0].member.id, grandparent.id);
    assert!(lookup.ancestors[0].parents[0].parents.is_empty());
}

#[tokio::test]
async fn ancestors_never_recurse_past_the_bound_on_cyclic_edges() {
    let t = test_graph();
    let fam = family(&t.graph, "Cycle", 3).await;

    let a = member(&t.graph, &fam.id, "A").await;
    let b = member(&t.graph, &fam.id, "B").await;

    // A cycle: each is the other's parent. Nothing rejects this at write
    // time, so the traversal bound has to contain it.
    parent_edge(&t.graph, &a, &b, RelationshipKind::Father).await;
    parent_edge(&t.graph, &b, &a, RelationshipKind::Father).await;

    let lookup = t
        .graph
        .resolver()
        .ancestors_with_depth(&a.id, 3)
        .await
        .expect("bounded traversal returns");

    assert_eq!(lookup.count, 3, "one node per level up to the bound");
    assert!(lookup.depth_limited, "the cycle still had edges to follow");

    // Depth is exactly the bound
    let mut depth = 0;
    let mut level = &lookup.ancestors;
    while !level.is_empty() {
        depth += 1;
        level = &level[0].parents;
    }
    assert_eq!(depth, 3);
}

#[tokio::test]
async fn ancestors_with_two_parent_lines_count_every_path() {
    let t = test_graph();
    let fam = family(&t.graph, "TwoLines", 3).await;

    let anchor = member(&t.graph, &fam.id, "Anchor").await;
    let father = member(&t.graph, &fam.id, "Father").await;
    let mother = member(&t.graph, &fam.id, "Mother").await;
    let paternal_grandmother = member(&t.graph, &fam.id, "PaternalGrandmother").await;

    parent_edge(&t.graph, &anchor, &father, RelationshipKind::Father).await;
    parent_edge(&t.graph, &anchor, &mother, RelationshipKind::Mother).await;
    parent_edge(&t.graph, &father, &paternal_grandmother, RelationshipKind::Mother).await;

    let lookup = t.graph.ancestors(&anchor.id).await.expect("ancestors resolve");

    assert_eq!(lookup.count, 3);
    assert_eq!(lookup.ancestors.len(), 2);

    let father_node = lookup
        .ancestors
        .iter()
        .find(|node| node.member.id == father.id)
        .expect("father line present");
    assert_eq!(father_node.parents.len(), 1);
    assert_eq!(father_node.parents[0].member.id, paternal_grandmother.id);
}

#[tokio::test]
async fn descendants_attach_all_spouses_per_node() {
    let t = test_graph();
    let fam = family(&t.graph, "Descendants", 3).await;

    let root = member(&t.graph, &fam.id, "Root").await;
    let child = member(&t.graph, &fam.id, "Child").await;
    let spouse_a = member(&t.graph, &fam.id, "SpouseA").await;
    let spouse_b = member(&t.graph, &fam.id, "SpouseB").await;
    let grandchild = member(&t.graph, &fam.id, "Grandchild").await;

    parent_edge(&t.graph, &child, &root, RelationshipKind::Mother).await;
    parent_edge(&t.graph, &grandchild, &child, RelationshipKind::Mother).await;
    spouse_edge(&t.graph, &child, &spouse_a).await;
    spouse_edge(&t.graph, &spouse_b, &child).await;

    let lookup = t
        .graph
        .descendants(&root.id)
        .await
        .expect("descendants resolve");

    assert_eq!(lookup.count, 2, "spouses are not counted as descendants");
    assert_eq!(lookup.descendants.len(), 1);

    let child_node = &lookup.descendants[0];
    assert_eq!(child_node.member.id, child.id);

    let spouse_ids: Vec<&str> = child_node.spouses.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(spouse_ids.len(), 2, "every spouse is attached, not just one");
    assert!(spouse_ids.contains(&spouse_a.id.as_str()));
    assert!(spouse_ids.contains(&spouse_b.id.as_str()));

    assert_eq!(child_node.children.len(), 1);
    assert_eq!(child_node.children[0].member.id, grandchild.id);
}

#[tokio::test]
async fn descendants_mark_depth_limited_when_the_bound_cuts() {
    let t = test_graph();
    let fam = family(&t.graph, "Bounded", 3).await;

    let root = member(&t.graph, &fam.id, "Root").await;
    let child = member(&t.graph, &fam.id, "Child").await;
    let grandchild = member(&t.graph, &fam.id, "Grandchild").await;

    parent_edge(&t.graph, &child, &root, RelationshipKind::Father).await;
    parent_edge(&t.graph, &grandchild, &child, RelationshipKind::Father).await;

    let lookup = t
        .graph
        .resolver()
        .descendants_with_depth(&root.id, 1)
        .await
        .expect("bounded traversal returns");

    assert_eq!(lookup.count, 1, "only the first generation fits the bound");
    assert!(lookup.depth_limited);
    assert!(lookup.descendants[0].children.is_empty());

    // The full walk reaches the grandchild and is not limited
    let full = t.graph.descendants(&root.id).await.expect("full traversal");
    assert_eq!(full.count, 2);
    assert!(!full.depth_limited);
}
