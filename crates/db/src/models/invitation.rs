use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::organization_member::OrganizationRole;

/// A time-boxed, single-use offer for `email` to join an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub token: String,
    pub email: String,
    pub organization_id: ObjectId,
    #[serde(default)]
    pub organization_role: OrganizationRole,
    pub invited_by: ObjectId,
    #[serde(default)]
    pub status: InvitationStatus,
    pub expires_at: DateTime,
    pub accepted_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// PENDING is the only non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
            InvitationStatus::Revoked => "revoked",
        }
    }
}

impl Invitation {
    pub const COLLECTION: &'static str = "invitations";
}
