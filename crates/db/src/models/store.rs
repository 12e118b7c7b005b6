use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A physical laundromat location owned by an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    #[serde(default)]
    pub status: StoreStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    #[default]
    Active,
    Inactive,
}

impl Store {
    pub const COLLECTION: &'static str = "stores";
}
