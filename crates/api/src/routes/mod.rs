use bson::oid::ObjectId;

use crate::error::ApiError;

pub mod auth;
pub mod invitation;
pub mod organization;
pub mod store;

/// RFC 3339 rendering used for every timestamp in responses.
pub(crate) fn timestamp(dt: bson::DateTime) -> String {
    dt.to_chrono().to_rfc3339()
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what}")))
}
