use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Links a user to an organization. Unique per (organization_id, user_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    pub user_id: ObjectId,
    #[serde(default)]
    pub role: OrganizationRole,
    pub invited_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    #[default]
    Owner,
    Employee,
    Admin,
}

impl OrganizationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationRole::Owner => "owner",
            OrganizationRole::Employee => "employee",
            OrganizationRole::Admin => "admin",
        }
    }
}

impl OrganizationMember {
    pub const COLLECTION: &'static str = "organization_members";
}
