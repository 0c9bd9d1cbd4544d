//! Rooted family tree assembly from resolver primitives

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kinship::KinshipResolver;
use crate::models::{Member, PersonSummary};
use crate::storage::errors::StorageError;
use crate::storage::filters::helpers;
use crate::storage::traits::{FamilyGraphStore, MemberStore, RelationshipStore};

/// One node of a family tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNode {
    /// The member at this node
    pub member: PersonSummary,

    /// All current spouses of the member
    pub spouses: Vec<PersonSummary>,

    /// The member's children, each nesting their own subtree
    pub children: Vec<TreeNode>,
}

/// A family's tree, rooted at its eldest member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilyTree {
    /// The eldest member of the family
    pub root: TreeNode,

    /// Total number of descendants below the root (spouses not counted)
    pub descendant_count: usize,
}

/// Assembles rooted family trees from resolver primitives
#[derive(Debug, Clone)]
pub struct FamilyTreeBuilder {
    store: Arc<dyn FamilyGraphStore>,
    resolver: KinshipResolver,
}

impl FamilyTreeBuilder {
    /// Create a builder over the given store
    pub fn new(store: Arc<dyn FamilyGraphStore>) -> Self {
        let resolver = KinshipResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Build the family tree rooted at the family's eldest member
    ///
    /// Root selection is a total order: earliest recorded birth date first,
    /// members without a birth date after all dated members, remaining ties
    /// broken by ascending member id. A family with no members is `NotFound`.
    pub async fn build(&self, family_id: &str) -> Result<FamilyTree, StorageError> {
        let members = self
            .store
            .list_members(Some(helpers::members_of_family(family_id)), None, None)
            .await?;

        if members.is_empty() {
            return Err(StorageError::NotFound(format!(
                "No members found in family {}",
                family_id
            )));
        }

        let root_member = members
            .iter()
            .min_by(|a, b| Self::eldest_order(a, b))
            .expect("non-empty member list always has a minimum");

        debug!(
            family_id,
            root_id = %root_member.id,
            "building family tree from eldest member"
        );

        let mut visited = HashSet::new();
        visited.insert(root_member.id.clone());

        let root_id = root_member.id.clone();
        let mut children_by_parent = self
            .expand_children(vec![root_id.clone()], &mut visited)
            .await?;

        let mut spouse_map = self.resolver.spouse_map(&[root_id.clone()]).await?;
        let root_spouses = spouse_map
            .remove(&root_id)
            .unwrap_or_default()
            .iter()
            .map(Self::summary_of_relative)
            .collect();

        let children = children_by_parent.remove(&root_id).unwrap_or_default();
        let descendant_count = count_nodes(&children);

        Ok(FamilyTree {
            root: TreeNode {
                member: PersonSummary::from(root_member),
                spouses: root_spouses,
                children,
            },
            descendant_count,
        })
    }

    /// Total order for root selection
    fn eldest_order(a: &Member, b: &Member) -> Ordering {
        match (a.date_of_birth, b.date_of_birth) {
            (Some(left), Some(right)) => left.cmp(&right).then_with(|| a.id.cmp(&b.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        }
    }

    /// Expand one generation for the whole frontier
    ///
    /// Children already placed elsewhere in the tree are skipped; the first
    /// edge to reach a member wins its placement. The visited set grows
    /// monotonically, so the walk terminates even on cyclic edge data.
    async fn expand_children(
        &self,
        frontier: Vec<String>,
        visited: &mut HashSet<String>,
    ) -> Result<HashMap<String, Vec<TreeNode>>, StorageError> {
        if frontier.is_empty() {
            return Ok(HashMap::new());
        }

        let edges = self
            .store
            .list_relationships(Some(helpers::child_edges_of(&frontier)), None, None)
            .await?;

        // (parent id, child id) in edge order; first placement wins.
        let mut placements: Vec<(String, String)> = Vec::new();
        let mut next: Vec<String> = Vec::new();
        for edge in &edges {
            if visited.contains(&edge.member_id) {
                continue;
            }
            visited.insert(edge.member_id.clone());
            placements.push((edge.related_member_id.clone(), edge.member_id.clone()));
            next.push(edge.member_id.clone());
        }

        if placements.is_empty() {
            return Ok(HashMap::new());
        }

        let members = self.resolver.members_by_ids(&next).await?;
        let spouse_map = self.resolver.spouse_map(&next).await?;

        let mut deeper = Box::pin(self.expand_children(next, visited)).await?;

        let mut by_parent: HashMap<String, Vec<TreeNode>> = HashMap::new();
        for (parent_id, child_id) in placements {
            let Some(member) = members.get(&child_id) else {
                continue;
            };

            let spouses = spouse_map
                .get(&child_id)
                .map(|spouses| spouses.iter().map(Self::summary_of_relative).collect())
                .unwrap_or_default();

            by_parent.entry(parent_id).or_default().push(TreeNode {
                member: PersonSummary::from(member),
                spouses,
                children: deeper.remove(&child_id).unwrap_or_default(),
            });
        }
        Ok(by_parent)
    }

    fn summary_of_relative(relative: &crate::kinship::Relative) -> PersonSummary {
        PersonSummary {
            id: relative.id.clone(),
            first_name: relative.first_name.clone(),
            middle_name: relative.middle_name.clone(),
            last_name: relative.last_name.clone(),
            nick_name: relative.nick_name.clone(),
            gender: relative.gender,
            date_of_birth: relative.date_of_birth,
            date_of_death: relative.date_of_death,
            member_image: relative.member_image.clone(),
            verified: relative.verified,
        }
    }
}

/// Count every node in a tree forest; spouses are not counted
fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_nodes(&node.children))
        .sum()
}
