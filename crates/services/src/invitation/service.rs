use std::sync::Arc;

use bson::{DateTime, oid::ObjectId};
use chrono::{Duration, Utc};
use laundromate_config::InvitationSettings;
use laundromate_db::models::{
    Invitation, InvitationStatus, OrganizationMember, OrganizationRole, User,
};
use serde::Serialize;
use tracing::{info, warn};

use super::error::{InvalidReason, InvitationError};
use super::store::{
    InvitationStore, InvitationStores, MembershipStore, OrganizationStore, UserStore,
};
use super::token::{generate_token, placeholder_phone, validate_token_format};
use crate::auth::AuthService;
use crate::dao::base::DaoError;

const PLACEHOLDER_PHONE_ATTEMPTS: usize = 3;

/// Outcome of checking a token without consuming it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvitationValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_role: Option<OrganizationRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InvitationValidation {
    fn valid(invitation: &Invitation, organization_name: Option<String>) -> Self {
        Self {
            valid: true,
            email: Some(invitation.email.clone()),
            organization_id: Some(invitation.organization_id.to_hex()),
            organization_name,
            organization_role: Some(invitation.organization_role),
            reason: None,
        }
    }

    fn invalid(reason: InvalidReason) -> Self {
        Self {
            valid: false,
            email: None,
            organization_id: None,
            organization_name: None,
            organization_role: None,
            reason: Some(reason.message().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AcceptedInvitation {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

/// Writes made while provisioning an accepted invitation, so they can be undone.
#[derive(Debug, Default)]
struct Provisioned {
    created_user: Option<ObjectId>,
    password_set: Option<ObjectId>,
    membership: Option<ObjectId>,
}

/// Create / validate / accept / revoke for organization invitations.
///
/// Validity has one definition, [`InvitationService::is_valid`]; validate and
/// accept both derive their failure reason from it. A PENDING invitation found
/// past its expiry is moved to EXPIRED on the spot.
pub struct InvitationService {
    invitations: Arc<dyn InvitationStore>,
    memberships: Arc<dyn MembershipStore>,
    users: Arc<dyn UserStore>,
    organizations: Arc<dyn OrganizationStore>,
    auth: Arc<AuthService>,
    settings: InvitationSettings,
}

impl InvitationService {
    pub fn new(stores: InvitationStores, auth: Arc<AuthService>, settings: InvitationSettings) -> Self {
        Self {
            invitations: stores.invitations,
            memberships: stores.memberships,
            users: stores.users,
            organizations: stores.organizations,
            auth,
            settings,
        }
    }

    pub fn expiration_days(&self) -> i64 {
        self.settings.expiration_days
    }

    pub fn calculate_expiration(&self) -> DateTime {
        DateTime::from_chrono(Utc::now() + Duration::days(self.settings.expiration_days))
    }

    pub fn is_valid(&self, invitation: &Invitation) -> bool {
        is_valid_at(invitation, DateTime::now())
    }

    pub async fn create_invitation(
        &self,
        email: &str,
        organization_id: ObjectId,
        organization_role: OrganizationRole,
        invited_by: ObjectId,
    ) -> Result<Invitation, InvitationError> {
        if let Some(existing) = self.invitations.find_pending(email, organization_id).await? {
            // A stale pending invitation only blocks until someone notices it expired.
            if classify(&existing, DateTime::now()) != Some(InvalidReason::Expired) {
                return Err(InvitationError::DuplicateInvitation {
                    email: email.to_string(),
                });
            }
            self.expire(&existing).await;
        }

        let now = DateTime::now();
        let invitation = Invitation {
            id: None,
            token: generate_token(),
            email: email.to_string(),
            organization_id,
            organization_role,
            invited_by,
            status: InvitationStatus::Pending,
            expires_at: self.calculate_expiration(),
            accepted_at: None,
            created_at: now,
            updated_at: now,
        };

        let invitation = match self.invitations.insert(invitation).await {
            Ok(invitation) => invitation,
            Err(DaoError::DuplicateKey(_)) => {
                return Err(InvitationError::DuplicateInvitation {
                    email: email.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            invitation_id = ?invitation.id,
            organization_id = %organization_id,
            role = invitation.organization_role.as_str(),
            "Invitation created"
        );
        Ok(invitation)
    }

    pub async fn validate_invitation(
        &self,
        token: &str,
    ) -> Result<InvitationValidation, InvitationError> {
        let invitation = self.lookup(token).await?;

        if let Some(reason) = self.invalid_reason(&invitation).await {
            return Ok(InvitationValidation::invalid(reason));
        }

        let organization_name = self
            .organizations
            .find_by_id(invitation.organization_id)
            .await?
            .map(|o| o.name);

        Ok(InvitationValidation::valid(&invitation, organization_name))
    }

    /// Consumes the invitation and provisions the invitee.
    ///
    /// The invitation is claimed first with a conditional PENDING -> ACCEPTED
    /// write, so of several concurrent calls with the same token only one
    /// provisions anything. If provisioning then fails, whatever this call
    /// wrote is undone and the invitation goes back to PENDING.
    pub async fn accept_invitation(
        &self,
        token: &str,
        password: &str,
    ) -> Result<AcceptedInvitation, InvitationError> {
        let invitation = self.lookup(token).await?;

        if let Some(reason) = self.invalid_reason(&invitation).await {
            return Err(InvitationError::InvalidState(reason));
        }
        let invitation_id = invitation.id.ok_or(DaoError::NotFound)?;
        let password_hash = self.auth.hash_password(password)?;

        if !self
            .invitations
            .mark_accepted(invitation_id, DateTime::now())
            .await?
        {
            let reason = match self.invitations.find_by_token(token).await? {
                Some(current) => self.invalid_reason(&current).await,
                None => None,
            };
            return Err(InvitationError::InvalidState(
                reason.unwrap_or(InvalidReason::AlreadyAccepted),
            ));
        }

        let mut undo = Provisioned::default();
        match self.provision(&invitation, &password_hash, &mut undo).await {
            Ok(accepted) => {
                info!(
                    invitation_id = %invitation_id,
                    user_id = ?accepted.user.id,
                    organization_id = %invitation.organization_id,
                    "Invitation accepted"
                );
                Ok(accepted)
            }
            Err(e) => {
                warn!(
                    invitation_id = %invitation_id,
                    error = %e,
                    "Invitation acceptance failed, rolling back"
                );
                self.roll_back(invitation_id, &password_hash, undo).await;
                Err(e)
            }
        }
    }

    pub async fn revoke_invitation(
        &self,
        organization_id: ObjectId,
        invitation_id: ObjectId,
    ) -> Result<Invitation, InvitationError> {
        let mut invitation = self
            .invitations
            .find_by_id_in_organization(organization_id, invitation_id)
            .await?
            .ok_or(InvitationError::NotFound)?;

        if let Some(reason) = terminal_reason(invitation.status) {
            return Err(InvitationError::InvalidState(reason));
        }
        if !self.invitations.mark_revoked(invitation_id).await? {
            return Err(InvitationError::InvalidState(InvalidReason::NotValid));
        }

        info!(invitation_id = %invitation_id, "Invitation revoked");
        invitation.status = InvitationStatus::Revoked;
        Ok(invitation)
    }

    pub async fn list_invitations(
        &self,
        organization_id: ObjectId,
    ) -> Result<Vec<Invitation>, InvitationError> {
        Ok(self.invitations.list_for_organization(organization_id).await?)
    }

    async fn lookup(&self, token: &str) -> Result<Invitation, InvitationError> {
        validate_token_format(token)?;
        self.invitations
            .find_by_token(token)
            .await?
            .ok_or(InvitationError::NotFound)
    }

    async fn invalid_reason(&self, invitation: &Invitation) -> Option<InvalidReason> {
        let reason = classify(invitation, DateTime::now())?;
        if reason == InvalidReason::Expired && invitation.status == InvitationStatus::Pending {
            self.expire(invitation).await;
        }
        Some(reason)
    }

    /// Lazy expiration. Never fails the caller; a failed write is retried by
    /// the next read that notices the expiry.
    async fn expire(&self, invitation: &Invitation) {
        let Some(id) = invitation.id else {
            return;
        };
        match self.invitations.mark_expired(id).await {
            Ok(true) => info!(invitation_id = %id, "Invitation marked expired"),
            Ok(false) => {}
            Err(e) => warn!(invitation_id = %id, error = %e, "Failed to mark invitation expired"),
        }
    }

    async fn provision(
        &self,
        invitation: &Invitation,
        password_hash: &str,
        undo: &mut Provisioned,
    ) -> Result<AcceptedInvitation, InvitationError> {
        let user = self
            .find_or_create_user(&invitation.email, password_hash, undo)
            .await?;
        let user_id = user.id.ok_or(DaoError::NotFound)?;
        self.ensure_membership(invitation, user_id, undo).await?;

        let access_token = self
            .auth
            .generate_access_token(user_id, user.email.as_deref())?;

        Ok(AcceptedInvitation {
            access_token,
            token_type: "bearer",
            user,
        })
    }

    /// Best effort: failures are logged and the remaining steps still run.
    async fn roll_back(&self, invitation_id: ObjectId, password_hash: &str, undo: Provisioned) {
        if let Some(id) = undo.membership {
            if let Err(e) = self.memberships.delete(id).await {
                warn!(member_id = %id, error = %e, "Failed to remove membership");
            }
        }
        if let Some(id) = undo.created_user {
            if let Err(e) = self.users.delete(id).await {
                warn!(user_id = %id, error = %e, "Failed to remove user");
            }
        } else if let Some(id) = undo.password_set {
            if let Err(e) = self.users.clear_password(id, password_hash).await {
                warn!(user_id = %id, error = %e, "Failed to clear password");
            }
        }
        match self.invitations.release(invitation_id).await {
            Ok(true) => info!(invitation_id = %invitation_id, "Invitation released"),
            Ok(false) => {}
            Err(e) => {
                warn!(invitation_id = %invitation_id, error = %e, "Failed to release invitation")
            }
        }
    }

    async fn find_or_create_user(
        &self,
        email: &str,
        password_hash: &str,
        undo: &mut Provisioned,
    ) -> Result<User, InvitationError> {
        if let Some(user) = self.users.find_by_email(email).await? {
            return self.adopt_existing_user(user, password_hash, undo).await;
        }

        for _ in 0..PLACEHOLDER_PHONE_ATTEMPTS {
            let candidate = User::invited(
                email.to_string(),
                placeholder_phone(),
                Some(password_hash.to_string()),
            );
            match self.users.insert(candidate).await {
                Ok(user) => {
                    info!(user_id = ?user.id, "Created user from invitation");
                    undo.created_user = user.id;
                    return Ok(user);
                }
                // Either a concurrent accept registered the email first or the
                // placeholder phone collided.
                Err(DaoError::DuplicateKey(_)) => {
                    if let Some(user) = self.users.find_by_email(email).await? {
                        return self.adopt_existing_user(user, password_hash, undo).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DaoError::DuplicateKey(format!(
            "no free placeholder phone after {PLACEHOLDER_PHONE_ATTEMPTS} attempts"
        ))
        .into())
    }

    /// An existing credential is never replaced by an invitation.
    async fn adopt_existing_user(
        &self,
        mut user: User,
        password_hash: &str,
        undo: &mut Provisioned,
    ) -> Result<User, InvitationError> {
        if user.password_hash.is_none() {
            if let Some(id) = user.id {
                if self.users.set_password_if_absent(id, password_hash).await? {
                    user.password_hash = Some(password_hash.to_string());
                    undo.password_set = Some(id);
                }
            }
        }
        Ok(user)
    }

    async fn ensure_membership(
        &self,
        invitation: &Invitation,
        user_id: ObjectId,
        undo: &mut Provisioned,
    ) -> Result<(), InvitationError> {
        if self
            .memberships
            .find(user_id, invitation.organization_id)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let now = DateTime::now();
        let member = OrganizationMember {
            id: None,
            organization_id: invitation.organization_id,
            user_id,
            role: invitation.organization_role,
            invited_by: Some(invitation.invited_by),
            created_at: now,
            updated_at: now,
        };

        match self.memberships.insert(member).await {
            Ok(member) => {
                undo.membership = member.id;
                Ok(())
            }
            Err(DaoError::DuplicateKey(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_valid_at(invitation: &Invitation, now: DateTime) -> bool {
    invitation.status == InvitationStatus::Pending && invitation.expires_at >= now
}

/// `None` when the invitation is valid at `now`.
fn classify(invitation: &Invitation, now: DateTime) -> Option<InvalidReason> {
    if is_valid_at(invitation, now) {
        return None;
    }
    Some(match invitation.status {
        InvitationStatus::Accepted => InvalidReason::AlreadyAccepted,
        InvitationStatus::Revoked => InvalidReason::Revoked,
        _ if invitation.expires_at < now => InvalidReason::Expired,
        _ => InvalidReason::NotValid,
    })
}

fn terminal_reason(status: InvitationStatus) -> Option<InvalidReason> {
    match status {
        InvitationStatus::Pending => None,
        InvitationStatus::Accepted => Some(InvalidReason::AlreadyAccepted),
        InvitationStatus::Revoked => Some(InvalidReason::Revoked),
        InvitationStatus::Expired => Some(InvalidReason::Expired),
    }
}
