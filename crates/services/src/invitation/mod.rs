pub mod error;
pub mod service;
pub mod store;
pub mod token;

pub use error::{InvalidReason, InvitationError};
pub use service::{AcceptedInvitation, InvitationService, InvitationValidation};
pub use store::{InvitationStore, InvitationStores, MembershipStore, OrganizationStore, UserStore};
pub use token::{generate_token, validate_token_format};
