use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    // Left out of the document when absent so the sparse unique index ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_super_admin: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl User {
    pub const COLLECTION: &'static str = "users";

    /// Account created on first OTP login; only the phone is known.
    pub fn with_phone(phone: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            email: None,
            phone,
            first_name: None,
            last_name: None,
            password_hash: None,
            is_active: true,
            is_admin: false,
            is_super_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Account created from an accepted invitation.
    pub fn invited(email: String, phone: String, password_hash: Option<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            email: Some(email),
            phone,
            first_name: None,
            last_name: None,
            password_hash,
            is_active: true,
            is_admin: false,
            is_super_admin: false,
            created_at: now,
            updated_at: now,
        }
    }
}
