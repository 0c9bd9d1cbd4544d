//! Member storage implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{record_key, SharedStorage};
use crate::models::{DateQualifier, Gender, Member, MemberRole};
use crate::storage::errors::StorageError;
use crate::storage::filters::MemberFilter;
use crate::storage::traits::MemberStore;

/// Internal representation of a Member record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct SurrealMember {
    id: RecordId,
    family_id: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    nick_name: Option<String>,
    gender: Gender,
    date_of_birth: Option<NaiveDate>,
    dob_qualifier: DateQualifier,
    date_of_death: Option<NaiveDate>,
    dod_qualifier: Option<DateQualifier>,
    email: Option<String>,
    phone_number: Option<String>,
    description: Option<String>,
    member_image: Option<String>,
    role: MemberRole,
    verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating members (without generated fields)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateMember {
    family_id: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    nick_name: Option<String>,
    gender: Gender,
    date_of_birth: Option<NaiveDate>,
    dob_qualifier: DateQualifier,
    date_of_death: Option<NaiveDate>,
    dod_qualifier: Option<DateQualifier>,
    email: Option<String>,
    phone_number: Option<String>,
    description: Option<String>,
    member_image: Option<String>,
    role: MemberRole,
    verified: bool,
}

impl From<&Member> for CreateMember {
    fn from(member: &Member) -> Self {
        Self {
            family_id: member.family_id.clone(),
            first_name: member.first_name.clone(),
            middle_name: member.middle_name.clone(),
            last_name: member.last_name.clone(),
            nick_name: member.nick_name.clone(),
            gender: member.gender,
            date_of_birth: member.date_of_birth,
            dob_qualifier: member.dob_qualifier,
            date_of_death: member.date_of_death,
            dod_qualifier: member.dod_qualifier,
            email: member.email.clone(),
            phone_number: member.phone_number.clone(),
            description: member.description.clone(),
            member_image: member.member_image.clone(),
            role: member.role,
            verified: member.verified,
        }
    }
}

impl From<SurrealMember> for Member {
    fn from(record: SurrealMember) -> Self {
        Self {
            id: record_key(&record.id),
            family_id: record.family_id,
            first_name: record.first_name,
            middle_name: record.middle_name,
            last_name: record.last_name,
            nick_name: record.nick_name,
            gender: record.gender,
            date_of_birth: record.date_of_birth,
            dob_qualifier: record.dob_qualifier,
            date_of_death: record.date_of_death,
            dod_qualifier: record.dod_qualifier,
            email: record.email,
            phone_number: record.phone_number,
            description: record.description,
            member_image: record.member_image,
            role: record.role,
            verified: record.verified,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl<C> MemberStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new member
    async fn create_member(&self, member: Member) -> Result<Member, StorageError> {
        if self.get_member(&member.id).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Member with ID {} already exists",
                member.id
            )));
        }

        let create_member = CreateMember::from(&member);

        let created: Option<SurrealMember> = self
            .client
            .create(("member", member.id.as_str()))
            .content(create_member)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to create member: {}", e)))?;

        created
            .map(Member::from)
            .ok_or_else(|| StorageError::Internal("No member created".to_string()))
    }

    /// Get a member by its ID
    async fn get_member(&self, id: &str) -> Result<Option<Member>, StorageError> {
        let member: Option<SurrealMember> = self
            .client
            .select(("member", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get member: {}", e)))?;

        Ok(member.map(Member::from))
    }

    /// Update an existing member
    async fn update_member(&self, member: Member) -> Result<Member, StorageError> {
        let update_query = r#"
            UPDATE $record_id MERGE {
                family_id: $family_id,
                first_name: $first_name,
                middle_name: $middle_name,
                last_name: $last_name,
                nick_name: $nick_name,
                gender: $gender,
                date_of_birth: $date_of_birth,
                dob_qualifier: $dob_qualifier,
                date_of_death: $date_of_death,
                dod_qualifier: $dod_qualifier,
                email: $email,
                phone_number: $phone_number,
                description: $description,
                member_image: $member_image,
                role: $role,
                verified: $verified,
                updated_at: time::now()
            }
        "#;

        let mut response = self
            .client
            .query(update_query)
            .bind(("record_id", RecordId::from(("member", member.id.as_str()))))
            .bind(("family_id", member.family_id.clone()))
            .bind(("first_name", member.first_name.clone()))
            .bind(("middle_name", member.middle_name.clone()))
            .bind(("last_name", member.last_name.clone()))
            .bind(("nick_name", member.nick_name.clone()))
            .bind(("gender", member.gender))
            .bind(("date_of_birth", member.date_of_birth))
            .bind(("dob_qualifier", member.dob_qualifier))
            .bind(("date_of_death", member.date_of_death))
            .bind(("dod_qualifier", member.dod_qualifier))
            .bind(("email", member.email.clone()))
            .bind(("phone_number", member.phone_number.clone()))
            .bind(("description", member.description.clone()))
            .bind(("member_image", member.member_image.clone()))
            .bind(("role", member.role))
            .bind(("verified", member.verified))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update member: {}", e)))?;

        let updated: Option<SurrealMember> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract updated member: {}", e)))?;

        updated.map(Member::from).ok_or_else(|| {
            StorageError::NotFound(format!("Member with ID {} not found", member.id))
        })
    }

    /// Delete a member by its ID
    async fn delete_member(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealMember> = self
            .client
            .delete(("member", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete member: {}", e)))?;

        Ok(deleted.is_some())
    }

    /// List members with optional filtering
    async fn list_members(
        &self,
        filter: Option<MemberFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Member>, StorageError> {
        if filter.is_none() && limit.is_none() && offset.is_none() {
            let members: Vec<SurrealMember> = self
                .client
                .select("member")
                .await
                .map_err(|e| StorageError::Query(format!("Failed to list members: {}", e)))?;

            return Ok(members.into_iter().map(Member::from).collect());
        }

        let mut query = "SELECT * FROM member".to_string();
        let mut conditions = Vec::new();

        if let Some(f) = &filter {
            if let Some(ids) = &f.ids
                && !ids.is_empty()
            {
                let id_list = ids
                    .iter()
                    .map(|id| format!("member:⟨{}⟩", id))
                    .collect::<Vec<_>>()
                    .join(", ");
                conditions.push(format!("id IN [{}]", id_list));
            }

            if let Some(family_id) = &f.family_id {
                conditions.push(format!("family_id = '{}'", family_id));
            }

            if let Some(needle) = &f.name_contains {
                let needle = needle.to_lowercase().replace('\'', "\\'");
                conditions.push(format!(
                    "(string::contains(string::lowercase(first_name), '{n}') \
                     OR string::contains(string::lowercase(last_name), '{n}') \
                     OR string::contains(string::lowercase(middle_name ?? ''), '{n}') \
                     OR string::contains(string::lowercase(nick_name ?? ''), '{n}'))",
                    n = needle
                ));
            }

            if let Some(gender) = &f.gender {
                conditions.push(format!("gender = '{}'", gender));
            }

            if let Some(verified) = f.verified {
                conditions.push(format!("verified = {}", verified));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at ASC");

        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            query.push_str(&format!(" START {}", offset));
        }

        let mut result = self
            .client
            .query(&query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list members: {}", e)))?;

        let members: Vec<SurrealMember> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract members: {}", e)))?;

        Ok(members.into_iter().map(Member::from).collect())
    }

    /// Count members with optional filtering
    async fn count_members(&self, filter: Option<MemberFilter>) -> Result<usize, StorageError> {
        let members = self.list_members(filter, None, None).await?;
        Ok(members.len())
    }

    /// Flip a member's derived verified flag to true
    async fn set_member_verified(&self, id: &str) -> Result<(), StorageError> {
        let update_query = r#"
            UPDATE $record_id MERGE {
                verified: true,
                updated_at: time::now()
            }
        "#;

        let mut response = self
            .client
            .query(update_query)
            .bind(("record_id", RecordId::from(("member", id))))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to set member verified: {}", e)))?;

        let updated: Option<SurrealMember> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract updated member: {}", e)))?;

        match updated {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(format!(
                "Member with ID {} not found",
                id
            ))),
        }
    }
}
