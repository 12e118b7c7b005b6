use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Validation: {0}")]
    Validation(String),
}

pub type DaoResult<T> = Result<T, DaoError>;

impl DaoError {
    fn from_write(err: mongodb::error::Error) -> Self {
        if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
            ref write_error,
        )) = *err.kind
        {
            if write_error.code == DUPLICATE_KEY_CODE {
                return DaoError::DuplicateKey(write_error.message.clone());
            }
        }
        DaoError::Mongo(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> DaoResult<Vec<T>> {
        let cursor = match sort {
            Some(sort) => self.collection.find(filter).sort(sort).await?,
            None => self.collection.find(filter).await?,
        };
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_paginated(
        &self,
        filter: Document,
        sort: Option<Document>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<T>> {
        let page = params.page.max(1);
        let per_page = params.per_page.clamp(1, 100);
        let total = self.collection.count_documents(filter.clone()).await?;

        let items: Vec<T> = self
            .collection
            .find(filter)
            .sort(sort.unwrap_or_else(|| doc! { "created_at": -1 }))
            .skip((page - 1) * per_page)
            .limit(per_page as i64)
            .await?
            .try_collect()
            .await?;

        Ok(PaginatedResult {
            items,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }

    /// Inserts `doc`, reporting unique-index violations as `DuplicateKey`.
    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self
            .collection
            .insert_one(doc)
            .await
            .map_err(DaoError::from_write)?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DaoError::Validation("inserted_id is not an ObjectId".to_string()))?;
        debug!(?id, "Inserted document");
        Ok(id)
    }

    /// Applies `update` to the first document matching `filter`, stamping
    /// `updated_at`. Returns whether a document matched, so callers can use the
    /// filter as a precondition.
    pub async fn update_one(&self, filter: Document, mut update: Document) -> DaoResult<bool> {
        match update.get_document_mut("$set") {
            Ok(set) => {
                set.insert("updated_at", bson::DateTime::now());
            }
            Err(_) => {
                update.insert("$set", doc! { "updated_at": bson::DateTime::now() });
            }
        }

        let result = self
            .collection
            .update_one(filter, update)
            .await
            .map_err(DaoError::from_write)?;
        Ok(result.matched_count > 0)
    }

    pub async fn update_by_id(&self, id: ObjectId, update: Document) -> DaoResult<bool> {
        self.update_one(doc! { "_id": id }, update).await
    }

    pub async fn hard_delete(&self, filter: Document) -> DaoResult<u64> {
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
