pub mod auth;
pub mod dao;
pub mod email;
pub mod invitation;
pub mod otp;

pub use auth::AuthService;
pub use dao::base::{DaoError, DaoResult, PaginatedResult, PaginationParams};
pub use dao::{BaseDao, InvitationDao, OrganizationDao, StoreDao, UserDao};
pub use email::{EmailError, EmailNotifier, InvitationEmail, SendGridNotifier};
pub use invitation::{InvitationError, InvitationService, InvitationStores};
pub use otp::{OtpError, OtpService};
