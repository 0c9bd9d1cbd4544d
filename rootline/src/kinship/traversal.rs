//! Depth-bounded recursive ancestor/descendant traversal
//!
//! Each recursion level expands the whole frontier with one edge query and
//! one member query. The depth bound is load-bearing: parent/child edges are
//! not validated acyclic at write time, so a cycle would otherwise recurse
//! forever. Hitting the bound with edges still ahead marks the result
//! `depth_limited` and returns the partial tree; a store failure at any
//! level aborts the whole traversal instead.

use std::collections::HashMap;

use super::resolver::KinshipResolver;
use super::types::{
    AncestorLookup, AncestorNode, DescendantLookup, DescendantNode, RelationLabel, Relative,
};
use crate::storage::errors::StorageError;
use crate::storage::filters::helpers;
use crate::storage::traits::RelationshipStore;

impl KinshipResolver {
    /// Ancestors of a member up to the configured depth bound
    pub async fn ancestors(&self, member_id: &str) -> Result<AncestorLookup, StorageError> {
        self.ancestors_with_depth(member_id, self.max_depth()).await
    }

    /// Ancestors of a member up to an explicit depth bound
    pub async fn ancestors_with_depth(
        &self,
        member_id: &str,
        max_depth: u8,
    ) -> Result<AncestorLookup, StorageError> {
        let mut depth_limited = false;
        let mut by_child = self
            .expand_ancestors(vec![member_id.to_string()], 1, max_depth, &mut depth_limited)
            .await?;

        let ancestors = by_child.remove(member_id).unwrap_or_default();
        let count = count_ancestors(&ancestors);
        Ok(AncestorLookup {
            ancestors,
            count,
            depth_limited,
        })
    }

    /// Descendants of a member up to the configured depth bound
    pub async fn descendants(&self, member_id: &str) -> Result<DescendantLookup, StorageError> {
        self.descendants_with_depth(member_id, self.max_depth())
            .await
    }

    /// Descendants of a member up to an explicit depth bound
    pub async fn descendants_with_depth(
        &self,
        member_id: &str,
        max_depth: u8,
    ) -> Result<DescendantLookup, StorageError> {
        let mut depth_limited = false;
        let mut by_parent = self
            .expand_descendants(vec![member_id.to_string()], 1, max_depth, &mut depth_limited)
            .await?;

        let descendants = by_parent.remove(member_id).unwrap_or_default();
        let count = count_descendants(&descendants);
        Ok(DescendantLookup {
            descendants,
            count,
            depth_limited,
        })
    }

    /// Expand one ancestor level for the whole frontier
    ///
    /// Returns each frontier id's parents as nodes, with the deeper levels
    /// already nested.
    async fn expand_ancestors(
        &self,
        frontier: Vec<String>,
        level: u8,
        max_depth: u8,
        depth_limited: &mut bool,
    ) -> Result<HashMap<String, Vec<AncestorNode>>, StorageError> {
        if frontier.is_empty() {
            return Ok(HashMap::new());
        }
        if level > max_depth {
            let remaining = self
                .store()
                .count_relationships(Some(helpers::parent_edges_of(&frontier)))
                .await?;
            if remaining > 0 {
                *depth_limited = true;
            }
            return Ok(HashMap::new());
        }

        let edges = self
            .store()
            .list_relationships(Some(helpers::parent_edges_of(&frontier)), None, None)
            .await?;
        if edges.is_empty() {
            return Ok(HashMap::new());
        }

        let mut parent_ids: Vec<String> = Vec::new();
        for edge in &edges {
            if !parent_ids.contains(&edge.related_member_id) {
                parent_ids.push(edge.related_member_id.clone());
            }
        }
        let members = self.members_by_ids(&parent_ids).await?;

        let deeper = Box::pin(self.expand_ancestors(
            parent_ids,
            level + 1,
            max_depth,
            depth_limited,
        ))
        .await?;

        let mut by_child: HashMap<String, Vec<AncestorNode>> = HashMap::new();
        for edge in &edges {
            let Some(member) = members.get(&edge.related_member_id) else {
                continue;
            };
            let mut relative =
                Relative::from_member(member, RelationLabel::for_parent_edge(edge.kind));
            relative.infer_gender_from(edge.kind);

            by_child
                .entry(edge.member_id.clone())
                .or_default()
                .push(AncestorNode {
                    member: relative,
                    parents: deeper
                        .get(&edge.related_member_id)
                        .cloned()
                        .unwrap_or_default(),
                });
        }
        Ok(by_child)
    }

    /// Expand one descendant level for the whole frontier
    async fn expand_descendants(
        &self,
        frontier: Vec<String>,
        level: u8,
        max_depth: u8,
        depth_limited: &mut bool,
    ) -> Result<HashMap<String, Vec<DescendantNode>>, StorageError> {
        if frontier.is_empty() {
            return Ok(HashMap::new());
        }
        if level > max_depth {
            let remaining = self
                .store()
                .count_relationships(Some(helpers::child_edges_of(&frontier)))
                .await?;
            if remaining > 0 {
                *depth_limited = true;
            }
            return Ok(HashMap::new());
        }

        let edges = self
            .store()
            .list_relationships(Some(helpers::child_edges_of(&frontier)), None, None)
            .await?;
        if edges.is_empty() {
            return Ok(HashMap::new());
        }

        let mut child_ids: Vec<String> = Vec::new();
        for edge in &edges {
            if !child_ids.contains(&edge.member_id) {
                child_ids.push(edge.member_id.clone());
            }
        }
        let members = self.members_by_ids(&child_ids).await?;
        let spouses = self.spouse_map(&child_ids).await?;

        let deeper = Box::pin(self.expand_descendants(
            child_ids,
            level + 1,
            max_depth,
            depth_limited,
        ))
        .await?;

        let mut by_parent: HashMap<String, Vec<DescendantNode>> = HashMap::new();
        for edge in &edges {
            let Some(member) = members.get(&edge.member_id) else {
                continue;
            };
            let relative = Relative::from_member(member, RelationLabel::Child);

            by_parent
                .entry(edge.related_member_id.clone())
                .or_default()
                .push(DescendantNode {
                    member: relative,
                    spouses: spouses.get(&edge.member_id).cloned().unwrap_or_default(),
                    children: deeper.get(&edge.member_id).cloned().unwrap_or_default(),
                });
        }
        Ok(by_parent)
    }
}

/// Count every node in an ancestor forest
fn count_ancestors(nodes: &[AncestorNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_ancestors(&node.parents))
        .sum()
}

/// Count every node in a descendant forest; spouses are not counted
fn count_descendants(nodes: &[DescendantNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_descendants(&node.children))
        .sum()
}
