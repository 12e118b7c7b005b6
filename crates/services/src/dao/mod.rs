pub mod base;
pub mod invitation;
pub mod organization;
pub mod store;
pub mod user;

pub use base::BaseDao;
pub use invitation::InvitationDao;
pub use organization::{NewOrganization, OrganizationChanges, OrganizationDao};
pub use store::{NewStore, StoreChanges, StoreDao};
pub use user::UserDao;
