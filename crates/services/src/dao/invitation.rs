use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use laundromate_db::models::{Invitation, InvitationStatus};
use mongodb::Database;

use super::base::{BaseDao, DaoResult};
use crate::invitation::store::InvitationStore;

pub struct InvitationDao {
    pub base: BaseDao<Invitation>,
}

impl InvitationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Invitation::COLLECTION),
        }
    }

    /// Moves a PENDING invitation to `status`; the status filter makes the
    /// write a no-op once any other transition has happened.
    async fn transition(&self, id: ObjectId, status: InvitationStatus) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "status": InvitationStatus::Pending.as_str() },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await
    }
}

#[async_trait]
impl InvitationStore for InvitationDao {
    async fn insert(&self, mut invitation: Invitation) -> DaoResult<Invitation> {
        let id = self.base.insert_one(&invitation).await?;
        invitation.id = Some(id);
        Ok(invitation)
    }

    async fn find_by_token(&self, token: &str) -> DaoResult<Option<Invitation>> {
        self.base.find_one(doc! { "token": token }).await
    }

    async fn find_pending(
        &self,
        email: &str,
        organization_id: ObjectId,
    ) -> DaoResult<Option<Invitation>> {
        self.base
            .find_one(doc! {
                "email": email,
                "organization_id": organization_id,
                "status": InvitationStatus::Pending.as_str(),
            })
            .await
    }

    async fn find_by_id_in_organization(
        &self,
        organization_id: ObjectId,
        id: ObjectId,
    ) -> DaoResult<Option<Invitation>> {
        self.base
            .find_one(doc! { "_id": id, "organization_id": organization_id })
            .await
    }

    async fn list_for_organization(&self, organization_id: ObjectId) -> DaoResult<Vec<Invitation>> {
        self.base
            .find_many(
                doc! { "organization_id": organization_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    async fn mark_expired(&self, id: ObjectId) -> DaoResult<bool> {
        self.transition(id, InvitationStatus::Expired).await
    }

    async fn mark_accepted(&self, id: ObjectId, accepted_at: DateTime) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! {
                    "_id": id,
                    "status": InvitationStatus::Pending.as_str(),
                    "expires_at": { "$gte": accepted_at },
                },
                doc! {
                    "$set": {
                        "status": InvitationStatus::Accepted.as_str(),
                        "accepted_at": accepted_at,
                    }
                },
            )
            .await
    }

    async fn release(&self, id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "status": InvitationStatus::Accepted.as_str() },
                doc! {
                    "$set": {
                        "status": InvitationStatus::Pending.as_str(),
                        "accepted_at": bson::Bson::Null,
                    }
                },
            )
            .await
    }

    async fn mark_revoked(&self, id: ObjectId) -> DaoResult<bool> {
        self.transition(id, InvitationStatus::Revoked).await
    }
}
