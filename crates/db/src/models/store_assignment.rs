use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Grants a user access to one store. Unique per (user, store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAssignment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub store_id: ObjectId,
    #[serde(default)]
    pub role: StoreRole,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreRole {
    #[default]
    Owner,
    Operator,
}

impl StoreAssignment {
    pub const COLLECTION: &'static str = "user_stores";
}
