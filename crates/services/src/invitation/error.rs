use std::fmt;

use thiserror::Error;

use crate::auth::AuthError;
use crate::dao::base::DaoError;

/// Why a stored invitation cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    AlreadyAccepted,
    Revoked,
    Expired,
    NotValid,
}

impl InvalidReason {
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::AlreadyAccepted => "This invitation has already been accepted",
            InvalidReason::Revoked => "This invitation has been revoked",
            InvalidReason::Expired => "This invitation has expired",
            InvalidReason::NotValid => "This invitation is not valid",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("Invalid invitation token format")]
    InvalidFormat,
    #[error("Invitation not found")]
    NotFound,
    #[error("An invitation has already been sent to {email} for this organization")]
    DuplicateInvitation { email: String },
    #[error("{0}")]
    InvalidState(InvalidReason),
    #[error(transparent)]
    Store(#[from] DaoError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
