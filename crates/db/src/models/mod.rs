pub mod invitation;
pub mod organization;
pub mod organization_member;
pub mod store;
pub mod store_assignment;
pub mod user;
pub mod verification_code;

pub use invitation::{Invitation, InvitationStatus};
pub use organization::{Organization, OrganizationStatus};
pub use organization_member::{OrganizationMember, OrganizationRole};
pub use store::{Store, StoreStatus};
pub use store_assignment::{StoreAssignment, StoreRole};
pub use user::User;
pub use verification_code::VerificationCode;
