//! Derived-relative computation over typed edges

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::types::{dedupe_by_id, RelationLabel, Relative};
use super::DEFAULT_MAX_DEPTH;
use crate::models::Member;
use crate::storage::errors::StorageError;
use crate::storage::filters::helpers;
use crate::storage::traits::{FamilyGraphStore, MemberStore, RelationshipStore};

/// Computes derived relatives from direct parent/spouse edges
///
/// All lookups are batched: one traversal level is one edge query plus one
/// member query, regardless of how many ids the level fans out to.
#[derive(Clone)]
pub struct KinshipResolver {
    store: Arc<dyn FamilyGraphStore>,
    max_depth: u8,
}

impl std::fmt::Debug for KinshipResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinshipResolver")
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl KinshipResolver {
    /// Create a resolver with the default traversal depth bound
    pub fn new(store: Arc<dyn FamilyGraphStore>) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the traversal depth bound
    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The configured traversal depth bound
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub(crate) fn store(&self) -> &Arc<dyn FamilyGraphStore> {
        &self.store
    }

    // =========================================================================
    // Primitive steps (shared by the composite operations below)
    // =========================================================================

    /// Fetch members for an id set, keyed by id
    pub(crate) async fn members_by_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Member>, StorageError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let members = self
            .store
            .list_members(Some(helpers::members_by_ids(ids)), None, None)
            .await?;
        Ok(members
            .into_iter()
            .map(|member| (member.id.clone(), member))
            .collect())
    }

    /// One step up: the parents of every id in the set
    ///
    /// Labels each relative father/mother from the edge kind and infers a
    /// missing gender the same way.
    async fn parents_step(&self, ids: &[String]) -> Result<Vec<Relative>, StorageError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let edges = self
            .store
            .list_relationships(Some(helpers::parent_edges_of(ids)), None, None)
            .await?;
        if edges.is_empty() {
            return Ok(vec![]);
        }

        let parent_ids: Vec<String> = edges
            .iter()
            .map(|edge| edge.related_member_id.clone())
            .collect();
        let members = self.members_by_ids(&parent_ids).await?;

        let mut relatives = Vec::with_capacity(edges.len());
        for edge in &edges {
            if let Some(member) = members.get(&edge.related_member_id) {
                let mut relative =
                    Relative::from_member(member, RelationLabel::for_parent_edge(edge.kind));
                relative.infer_gender_from(edge.kind);
                relatives.push(relative);
            }
        }
        Ok(relatives)
    }

    /// One step down: the children of every id in the set
    async fn children_step(&self, ids: &[String]) -> Result<Vec<Relative>, StorageError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let edges = self
            .store
            .list_relationships(Some(helpers::child_edges_of(ids)), None, None)
            .await?;
        if edges.is_empty() {
            return Ok(vec![]);
        }

        let child_ids: Vec<String> = edges.iter().map(|edge| edge.member_id.clone()).collect();
        let members = self.members_by_ids(&child_ids).await?;

        let mut relatives = Vec::with_capacity(edges.len());
        for edge in &edges {
            if let Some(member) = members.get(&edge.member_id) {
                relatives.push(Relative::from_member(member, RelationLabel::Child));
            }
        }
        Ok(relatives)
    }

    /// Spouses of every id in the set, keyed by the id they belong to
    pub(crate) async fn spouse_map(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<Relative>>, StorageError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let edges = self
            .store
            .list_relationships(Some(helpers::spouse_edges_involving(ids)), None, None)
            .await?;
        if edges.is_empty() {
            return Ok(HashMap::new());
        }

        let mut spouse_ids: Vec<String> = Vec::new();
        for edge in &edges {
            spouse_ids.push(edge.member_id.clone());
            spouse_ids.push(edge.related_member_id.clone());
        }
        let members = self.members_by_ids(&spouse_ids).await?;

        let anchor_ids: HashSet<&String> = ids.iter().collect();
        let mut map: HashMap<String, Vec<Relative>> = HashMap::new();
        for edge in &edges {
            for anchor in [&edge.member_id, &edge.related_member_id] {
                if !anchor_ids.contains(anchor) {
                    continue;
                }
                // other_endpoint is Some for both endpoints of a spouse edge
                if let Some(other) = edge.other_endpoint(anchor)
                    && let Some(member) = members.get(other)
                {
                    map.entry(anchor.clone())
                        .or_default()
                        .push(Relative::from_member(member, RelationLabel::Spouse));
                }
            }
        }

        for spouses in map.values_mut() {
            let deduped = dedupe_by_id(std::mem::take(spouses));
            *spouses = deduped;
        }
        Ok(map)
    }

    fn ids_of(relatives: &[Relative]) -> Vec<String> {
        relatives.iter().map(|r| r.id.clone()).collect()
    }

    fn id_set(relatives: &[Relative]) -> HashSet<String> {
        relatives.iter().map(|r| r.id.clone()).collect()
    }

    // =========================================================================
    // Direct relations
    // =========================================================================

    /// Parents of a member, labeled father/mother from the edge kind
    pub async fn parents(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let parents = self.parents_step(&[member_id.to_string()]).await?;
        Ok(dedupe_by_id(parents))
    }

    /// Children of a member
    pub async fn children(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let children = self.children_step(&[member_id.to_string()]).await?;
        Ok(dedupe_by_id(children))
    }

    /// Spouses of a member; several concurrent spouses are permitted
    pub async fn spouses(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let mut map = self.spouse_map(&[member_id.to_string()]).await?;
        Ok(map.remove(member_id).unwrap_or_default())
    }

    // =========================================================================
    // Two and three generations up/down
    // =========================================================================

    /// Grandparents: parents of parents
    pub async fn grandparents(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let parents = self.parents_step(&[member_id.to_string()]).await?;
        let grandparents = self.parents_step(&Self::ids_of(&parents)).await?;
        Ok(dedupe_by_id(
            grandparents
                .into_iter()
                .map(|r| r.relabeled(RelationLabel::Grandparent))
                .collect(),
        ))
    }

    /// Great-grandparents: one level above grandparents
    pub async fn great_grandparents(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let parents = self.parents_step(&[member_id.to_string()]).await?;
        let grandparents = self.parents_step(&Self::ids_of(&parents)).await?;
        let great_grandparents = self.parents_step(&Self::ids_of(&grandparents)).await?;
        Ok(dedupe_by_id(
            great_grandparents
                .into_iter()
                .map(|r| r.relabeled(RelationLabel::GreatGrandparent))
                .collect(),
        ))
    }

    /// Grandchildren: children of children
    pub async fn grandchildren(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let children = self.children_step(&[member_id.to_string()]).await?;
        let grandchildren = self.children_step(&Self::ids_of(&children)).await?;
        Ok(dedupe_by_id(
            grandchildren
                .into_iter()
                .map(|r| r.relabeled(RelationLabel::Grandchild))
                .collect(),
        ))
    }

    /// Great-grandchildren: one level below grandchildren
    pub async fn great_grandchildren(
        &self,
        member_id: &str,
    ) -> Result<Vec<Relative>, StorageError> {
        let children = self.children_step(&[member_id.to_string()]).await?;
        let grandchildren = self.children_step(&Self::ids_of(&children)).await?;
        let great_grandchildren = self.children_step(&Self::ids_of(&grandchildren)).await?;
        Ok(dedupe_by_id(
            great_grandchildren
                .into_iter()
                .map(|r| r.relabeled(RelationLabel::GreatGrandchild))
                .collect(),
        ))
    }

    // =========================================================================
    // Collateral relations
    // =========================================================================

    /// Siblings: children of the member's parents, minus the member
    ///
    /// A sibling reachable through both parents is reported once.
    pub async fn siblings(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let parents = self.parents_step(&[member_id.to_string()]).await?;
        if parents.is_empty() {
            return Ok(vec![]);
        }

        let candidates = self.children_step(&Self::ids_of(&parents)).await?;
        let siblings = candidates
            .into_iter()
            .filter(|candidate| candidate.id != member_id)
            .map(|r| r.relabeled(RelationLabel::Sibling))
            .collect();
        Ok(dedupe_by_id(siblings))
    }

    /// Uncles and aunts: children of the member's grandparents, minus the
    /// member's own parents
    pub async fn uncles_and_aunts(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let parents = self.parents_step(&[member_id.to_string()]).await?;
        let grandparents = self.parents_step(&Self::ids_of(&parents)).await?;
        if grandparents.is_empty() {
            return Ok(vec![]);
        }

        let parent_ids = Self::id_set(&parents);
        let candidates = self.children_step(&Self::ids_of(&grandparents)).await?;
        let uncles_and_aunts = candidates
            .into_iter()
            .filter(|candidate| candidate.id != member_id && !parent_ids.contains(&candidate.id))
            .map(|r| r.relabeled(RelationLabel::UncleOrAunt))
            .collect();
        Ok(dedupe_by_id(uncles_and_aunts))
    }

    /// First cousins: children of uncles and aunts
    ///
    /// Excludes the member, their siblings and their parents by id-set
    /// arithmetic on sets already computed along the way.
    pub async fn cousins(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let anchor = member_id.to_string();
        let parents = self.parents_step(&[anchor.clone()]).await?;
        if parents.is_empty() {
            return Ok(vec![]);
        }
        let parent_ids = Self::id_set(&parents);

        let grandparents = self.parents_step(&Self::ids_of(&parents)).await?;
        if grandparents.is_empty() {
            return Ok(vec![]);
        }

        let siblings = self.children_step(&Self::ids_of(&parents)).await?;
        let sibling_ids = Self::id_set(&siblings);

        let pibling_candidates = self.children_step(&Self::ids_of(&grandparents)).await?;
        let piblings: Vec<Relative> = pibling_candidates
            .into_iter()
            .filter(|candidate| candidate.id != anchor && !parent_ids.contains(&candidate.id))
            .collect();
        if piblings.is_empty() {
            return Ok(vec![]);
        }

        let candidates = self.children_step(&Self::ids_of(&piblings)).await?;
        debug!(
            member_id,
            candidates = candidates.len(),
            "resolved cousin candidates"
        );
        let cousins = candidates
            .into_iter()
            .filter(|candidate| {
                candidate.id != anchor
                    && !sibling_ids.contains(&candidate.id)
                    && !parent_ids.contains(&candidate.id)
            })
            .map(|r| r.relabeled(RelationLabel::Cousin))
            .collect();
        Ok(dedupe_by_id(cousins))
    }

    /// Second cousins: children of the parents' first cousins
    ///
    /// The parents' cousins are reached through the great-grandparents
    /// (children of great-grandparents minus grandparents, then their
    /// children); the member's own first cousins are excluded by id set,
    /// never by re-traversal.
    pub async fn second_cousins(&self, member_id: &str) -> Result<Vec<Relative>, StorageError> {
        let anchor = member_id.to_string();
        let parents = self.parents_step(&[anchor.clone()]).await?;
        if parents.is_empty() {
            return Ok(vec![]);
        }
        let parent_ids = Self::id_set(&parents);

        let grandparents = self.parents_step(&Self::ids_of(&parents)).await?;
        if grandparents.is_empty() {
            return Ok(vec![]);
        }
        let grandparent_ids = Self::id_set(&grandparents);

        let great_grandparents = self.parents_step(&Self::ids_of(&grandparents)).await?;
        if great_grandparents.is_empty() {
            return Ok(vec![]);
        }

        // Grand-uncles and grand-aunts: the grandparents' siblings.
        let grand_pibling_candidates = self
            .children_step(&Self::ids_of(&great_grandparents))
            .await?;
        let grand_piblings: Vec<Relative> = grand_pibling_candidates
            .into_iter()
            .filter(|candidate| !grandparent_ids.contains(&candidate.id))
            .collect();
        if grand_piblings.is_empty() {
            return Ok(vec![]);
        }

        // The parents' first cousins.
        let parents_cousins = self.children_step(&Self::ids_of(&grand_piblings)).await?;
        if parents_cousins.is_empty() {
            return Ok(vec![]);
        }

        // The member's own first cousins, for the exclusion set: children of
        // the member's uncles and aunts.
        let piblings: Vec<Relative> = self
            .children_step(&Self::ids_of(&grandparents))
            .await?
            .into_iter()
            .filter(|candidate| candidate.id != anchor && !parent_ids.contains(&candidate.id))
            .collect();
        let first_cousin_ids = Self::id_set(&self.children_step(&Self::ids_of(&piblings)).await?);

        let candidates = self.children_step(&Self::ids_of(&parents_cousins)).await?;
        let second_cousins = candidates
            .into_iter()
            .filter(|candidate| {
                candidate.id != anchor && !first_cousin_ids.contains(&candidate.id)
            })
            .map(|r| r.relabeled(RelationLabel::SecondCousin))
            .collect();
        Ok(dedupe_by_id(second_cousins))
    }
}
