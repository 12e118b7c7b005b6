use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Parent company owning stores; the tenant boundary for memberships and invitations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub billing_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub status: OrganizationStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl Organization {
    pub const COLLECTION: &'static str = "organizations";
}
