//! Storage seams of the invitation lifecycle.
//!
//! The service only ever talks to these traits. MongoDB DAOs implement them
//! in production; unit tests run against an in-process implementation.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};
use laundromate_db::models::{Invitation, Organization, OrganizationMember, User};

use crate::dao::base::DaoResult;

#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Persists a new invitation. A second PENDING invitation for the same
    /// (email, organization) or a reused token fails with `DuplicateKey`.
    async fn insert(&self, invitation: Invitation) -> DaoResult<Invitation>;

    async fn find_by_token(&self, token: &str) -> DaoResult<Option<Invitation>>;

    async fn find_pending(
        &self,
        email: &str,
        organization_id: ObjectId,
    ) -> DaoResult<Option<Invitation>>;

    async fn find_by_id_in_organization(
        &self,
        organization_id: ObjectId,
        id: ObjectId,
    ) -> DaoResult<Option<Invitation>>;

    /// Newest first.
    async fn list_for_organization(&self, organization_id: ObjectId) -> DaoResult<Vec<Invitation>>;

    /// PENDING -> EXPIRED. Returns false when the invitation was no longer pending.
    async fn mark_expired(&self, id: ObjectId) -> DaoResult<bool>;

    /// PENDING -> ACCEPTED as a compare-and-swap that also requires
    /// `expires_at >= accepted_at`. Exactly one concurrent caller observes `true`.
    async fn mark_accepted(&self, id: ObjectId, accepted_at: DateTime) -> DaoResult<bool>;

    /// ACCEPTED -> PENDING, clearing `accepted_at`. Undoes a claim whose
    /// provisioning failed.
    async fn release(&self, id: ObjectId) -> DaoResult<bool>;

    /// PENDING -> REVOKED. Returns false when the invitation was no longer pending.
    async fn mark_revoked(&self, id: ObjectId) -> DaoResult<bool>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find(
        &self,
        user_id: ObjectId,
        organization_id: ObjectId,
    ) -> DaoResult<Option<OrganizationMember>>;

    /// Fails with `DuplicateKey` when the (user, organization) pair already exists.
    async fn insert(&self, member: OrganizationMember) -> DaoResult<OrganizationMember>;

    async fn delete(&self, id: ObjectId) -> DaoResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> DaoResult<Option<User>>;

    /// Fails with `DuplicateKey` when the email or phone is already taken.
    async fn insert(&self, user: User) -> DaoResult<User>;

    /// Stores `password_hash` only if the account has none yet.
    async fn set_password_if_absent(&self, id: ObjectId, password_hash: &str) -> DaoResult<bool>;

    /// Removes the password only while it is still `password_hash`.
    async fn clear_password(&self, id: ObjectId, password_hash: &str) -> DaoResult<bool>;

    async fn delete(&self, id: ObjectId) -> DaoResult<bool>;
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> DaoResult<Option<Organization>>;
}

/// The collaborators an [`InvitationService`](super::InvitationService) is built from.
#[derive(Clone)]
pub struct InvitationStores {
    pub invitations: Arc<dyn InvitationStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub users: Arc<dyn UserStore>,
    pub organizations: Arc<dyn OrganizationStore>,
}
