use bson::{DateTime, Document, doc, oid::ObjectId};
use laundromate_db::models::{Store, StoreAssignment, StoreRole, StoreStatus};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct StoreDao {
    pub base: BaseDao<Store>,
    pub assignments: BaseDao<StoreAssignment>,
}

#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub status: StoreStatus,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct StoreChanges {
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub status: Option<StoreStatus>,
}

impl StoreChanges {
    fn into_document(self) -> DaoResult<Document> {
        let mut set = Document::new();
        let text_fields = [
            ("name", self.name),
            ("street_address", self.street_address),
            ("city", self.city),
            ("state", self.state),
            ("postal_code", self.postal_code),
            ("country", self.country),
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

impl StoreDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Store::COLLECTION),
            assignments: BaseDao::new(db, StoreAssignment::COLLECTION),
        }
    }

    /// Store names are unique within an organization (`DuplicateKey` otherwise).
    pub async fn create(&self, organization_id: ObjectId, new: NewStore) -> DaoResult<Store> {
        let now = DateTime::now();
        let mut store = Store {
            id: None,
            organization_id,
            name: new.name,
            street_address: new.street_address,
            city: new.city,
            state: new.state,
            postal_code: new.postal_code,
            country: new.country,
            status: new.status,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&store).await?;
        store.id = Some(id);
        Ok(store)
    }

    pub async fn list_by_organization(
        &self,
        organization_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Store>> {
        self.base
            .find_paginated(
                doc! { "organization_id": organization_id },
                Some(doc! { "name": 1 }),
                params,
            )
            .await
    }

    pub async fn update(&self, id: ObjectId, changes: StoreChanges) -> DaoResult<Store> {
        let set = changes.into_document()?;
        if !set.is_empty() && !self.base.update_by_id(id, doc! { "$set": set }).await? {
            return Err(DaoError::NotFound);
        }
        self.base.find_by_id(id).await
    }

    /// Deletes the store and every user assignment to it.
    pub async fn delete(&self, id: ObjectId) -> DaoResult<bool> {
        if self.base.hard_delete(doc! { "_id": id }).await? == 0 {
            return Ok(false);
        }
        self.assignments
            .hard_delete(doc! { "store_id": id })
            .await?;
        Ok(true)
    }

    /// Fails with `DuplicateKey` when the user is already assigned to the store.
    pub async fn assign(
        &self,
        store_id: ObjectId,
        user_id: ObjectId,
        role: StoreRole,
    ) -> DaoResult<StoreAssignment> {
        let mut assignment = StoreAssignment {
            id: None,
            user_id,
            store_id,
            role,
            created_at: DateTime::now(),
        };
        let id = self.assignments.insert_one(&assignment).await?;
        assignment.id = Some(id);
        Ok(assignment)
    }

    pub async fn list_assignments(&self, store_id: ObjectId) -> DaoResult<Vec<StoreAssignment>> {
        self.assignments
            .find_many(doc! { "store_id": store_id }, Some(doc! { "created_at": 1 }))
            .await
    }

    pub async fn unassign(&self, store_id: ObjectId, user_id: ObjectId) -> DaoResult<bool> {
        Ok(self
            .assignments
            .hard_delete(doc! { "store_id": store_id, "user_id": user_id })
            .await?
            > 0)
    }
}
