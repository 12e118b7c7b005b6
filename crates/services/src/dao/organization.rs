use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use laundromate_db::models::{
    Invitation, Organization, OrganizationMember, OrganizationStatus, Store, StoreAssignment,
};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};
use crate::invitation::store::{MembershipStore, OrganizationStore};

pub struct OrganizationDao {
    pub base: BaseDao<Organization>,
    pub members: BaseDao<OrganizationMember>,
    pub invitations: BaseDao<Invitation>,
    pub stores: BaseDao<Store>,
    pub store_assignments: BaseDao<StoreAssignment>,
}

/// Fields accepted when creating an organization.
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub billing_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub billing_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub status: Option<OrganizationStatus>,
}

impl OrganizationChanges {
    fn into_document(self) -> DaoResult<Document> {
        let mut set = Document::new();
        let text_fields = [
            ("name", self.name),
            ("billing_address", self.billing_address),
            ("city", self.city),
            ("state", self.state),
            ("postal_code", self.postal_code),
            ("country", self.country),
            ("contact_email", self.contact_email),
            ("contact_phone", self.contact_phone),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                set.insert(key, value);
            }
        }
        if let Some(status) = self.status {
            set.insert("status", bson::to_bson(&status)?);
        }
        Ok(set)
    }
}

impl OrganizationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Organization::COLLECTION),
            members: BaseDao::new(db, OrganizationMember::COLLECTION),
            invitations: BaseDao::new(db, Invitation::COLLECTION),
            stores: BaseDao::new(db, Store::COLLECTION),
            store_assignments: BaseDao::new(db, StoreAssignment::COLLECTION),
        }
    }

    pub async fn create(&self, new: NewOrganization) -> DaoResult<Organization> {
        let now = DateTime::now();
        let mut organization = Organization {
            id: None,
            name: new.name,
            billing_address: new.billing_address,
            city: new.city,
            state: new.state,
            postal_code: new.postal_code,
            country: new.country,
            contact_email: new.contact_email,
            contact_phone: new.contact_phone,
            status: OrganizationStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&organization).await?;
        organization.id = Some(id);
        Ok(organization)
    }

    pub async fn list(
        &self,
        status: Option<OrganizationStatus>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Organization>> {
        let mut filter = Document::new();
        if let Some(status) = status {
            filter.insert("status", bson::to_bson(&status)?);
        }
        self.base
            .find_paginated(filter, Some(doc! { "name": 1 }), params)
            .await
    }

    pub async fn update(&self, id: ObjectId, changes: OrganizationChanges) -> DaoResult<Organization> {
        let set = changes.into_document()?;
        if !set.is_empty() && !self.base.update_by_id(id, doc! { "$set": set }).await? {
            return Err(DaoError::NotFound);
        }
        self.base.find_by_id(id).await
    }

    /// Deletes the organization together with its memberships, invitations,
    /// stores and store assignments.
    pub async fn delete(&self, id: ObjectId) -> DaoResult<bool> {
        let deleted = self.base.hard_delete(doc! { "_id": id }).await?;
        if deleted == 0 {
            return Ok(false);
        }
        self.members
            .hard_delete(doc! { "organization_id": id })
            .await?;
        self.invitations
            .hard_delete(doc! { "organization_id": id })
            .await?;

        let store_ids: Vec<ObjectId> = self
            .stores
            .find_many(doc! { "organization_id": id }, None)
            .await?
            .into_iter()
            .filter_map(|s| s.id)
            .collect();
        if !store_ids.is_empty() {
            self.store_assignments
                .hard_delete(doc! { "store_id": { "$in": store_ids } })
                .await?;
            self.stores
                .hard_delete(doc! { "organization_id": id })
                .await?;
        }
        Ok(true)
    }

    pub async fn find_member(
        &self,
        user_id: ObjectId,
        organization_id: ObjectId,
    ) -> DaoResult<Option<OrganizationMember>> {
        self.members
            .find_one(doc! { "organization_id": organization_id, "user_id": user_id })
            .await
    }

    pub async fn add_member(&self, mut member: OrganizationMember) -> DaoResult<OrganizationMember> {
        let id = self.members.insert_one(&member).await?;
        member.id = Some(id);
        Ok(member)
    }
}

#[async_trait]
impl OrganizationStore for OrganizationDao {
    async fn find_by_id(&self, id: ObjectId) -> DaoResult<Option<Organization>> {
        self.base.find_one(doc! { "_id": id }).await
    }
}

#[async_trait]
impl MembershipStore for OrganizationDao {
    async fn find(
        &self,
        user_id: ObjectId,
        organization_id: ObjectId,
    ) -> DaoResult<Option<OrganizationMember>> {
        self.find_member(user_id, organization_id).await
    }

    async fn insert(&self, member: OrganizationMember) -> DaoResult<OrganizationMember> {
        self.add_member(member).await
    }

    async fn delete(&self, id: ObjectId) -> DaoResult<bool> {
        Ok(self.members.hard_delete(doc! { "_id": id }).await? > 0)
    }
}
