use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use laundromate_db::models::User;
use mongodb::Database;

use super::base::{BaseDao, DaoResult};
use crate::invitation::store::UserStore;

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(&self, mut user: User) -> DaoResult<User> {
        let id = self.base.insert_one(&user).await?;
        user.id = Some(id);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<User>> {
        self.base.find_one(doc! { "email": email }).await
    }

    pub async fn find_by_phone(&self, phone: &str) -> DaoResult<Option<User>> {
        self.base.find_one(doc! { "phone": phone }).await
    }
}

#[async_trait]
impl UserStore for UserDao {
    async fn find_by_email(&self, email: &str) -> DaoResult<Option<User>> {
        UserDao::find_by_email(self, email).await
    }

    async fn insert(&self, user: User) -> DaoResult<User> {
        self.create(user).await
    }

    async fn set_password_if_absent(&self, id: ObjectId, password_hash: &str) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "password_hash": { "$exists": false } },
                doc! { "$set": { "password_hash": password_hash } },
            )
            .await
    }

    async fn clear_password(&self, id: ObjectId, password_hash: &str) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "password_hash": password_hash },
                doc! { "$unset": { "password_hash": "" } },
            )
            .await
    }

    async fn delete(&self, id: ObjectId) -> DaoResult<bool> {
        Ok(self.base.hard_delete(doc! { "_id": id }).await? > 0)
    }
}
