use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One-time login code sent to a phone number. Requesting a new code retires
/// every unused one for the same phone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub phone: String,
    pub code: String,
    pub expires_at: DateTime,
    #[serde(default)]
    pub is_used: bool,
    pub created_at: DateTime,
}

impl VerificationCode {
    pub const COLLECTION: &'static str = "verification_codes";
}
