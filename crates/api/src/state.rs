use mongodb::Database;
use laundromate_config::Settings;
use laundromate_services::{
    AuthService, EmailNotifier, InvitationService, InvitationStores, OtpService, SendGridNotifier,
    dao::{
        invitation::InvitationDao, organization::OrganizationDao, store::StoreDao, user::UserDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub organizations: Arc<OrganizationDao>,
    pub stores: Arc<StoreDao>,
    pub invitations: Arc<InvitationService>,
    pub email: Arc<dyn EmailNotifier>,
    pub otp: Arc<OtpService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let email: Arc<dyn EmailNotifier> = Arc::new(SendGridNotifier::new(&settings.email));
        Self::with_email(db, settings, email)
    }

    /// Same as [`AppState::new`] with a caller-chosen email notifier.
    pub fn with_email(db: Database, settings: Settings, email: Arc<dyn EmailNotifier>) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let organizations = Arc::new(OrganizationDao::new(&db));
        let stores = Arc::new(StoreDao::new(&db));
        let invitation_dao = Arc::new(InvitationDao::new(&db));
        let otp = Arc::new(OtpService::new(&db, users.clone(), settings.otp.clone()));

        let invitations = Arc::new(InvitationService::new(
            InvitationStores {
                invitations: invitation_dao,
                memberships: organizations.clone(),
                users: users.clone(),
                organizations: organizations.clone(),
            },
            auth.clone(),
            settings.invitation.clone(),
        ));

        Self {
            db,
            settings,
            auth,
            users,
            organizations,
            stores,
            invitations,
            email,
            otp,
        }
    }
}
