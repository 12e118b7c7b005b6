use std::sync::Arc;

use bson::{DateTime, doc};
use chrono::{Duration, Utc};
use laundromate_config::OtpSettings;
use laundromate_db::models::{User, VerificationCode};
use mongodb::Database;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::dao::base::{BaseDao, DaoError};
use crate::dao::user::UserDao;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Invalid or expired OTP")]
    InvalidCode,
    #[error(transparent)]
    Store(#[from] DaoError),
}

/// Phone login with one-time codes. The first successful verification for a
/// phone creates its account.
pub struct OtpService {
    codes: BaseDao<VerificationCode>,
    users: Arc<UserDao>,
    settings: OtpSettings,
}

impl OtpService {
    pub fn new(db: &Database, users: Arc<UserDao>, settings: OtpSettings) -> Self {
        Self {
            codes: BaseDao::new(db, VerificationCode::COLLECTION),
            users,
            settings,
        }
    }

    /// Issues a fresh code and retires every unused code for `phone`.
    ///
    /// There is no SMS gateway yet; the code only shows up in debug logs.
    pub async fn request_code(&self, phone: &str) -> Result<String, OtpError> {
        self.codes
            .collection()
            .update_many(
                doc! { "phone": phone, "is_used": false },
                doc! { "$set": { "is_used": true } },
            )
            .await
            .map_err(DaoError::from)?;

        let now = Utc::now();
        let code = generate_code(self.settings.code_length);
        let entry = VerificationCode {
            id: None,
            phone: phone.to_string(),
            code: code.clone(),
            expires_at: DateTime::from_chrono(now + Duration::minutes(self.settings.code_ttl_minutes)),
            is_used: false,
            created_at: DateTime::from_chrono(now),
        };
        self.codes.insert_one(&entry).await?;

        info!(phone, "OTP issued");
        debug!(phone, code = %code, "OTP code");
        Ok(code)
    }

    /// Consumes a matching, unused, unexpired code and returns the phone's user.
    pub async fn verify_code(&self, phone: &str, code: &str) -> Result<User, OtpError> {
        // The conditional update is the single-use guarantee.
        let consumed = self
            .codes
            .collection()
            .update_one(
                doc! {
                    "phone": phone,
                    "code": code,
                    "is_used": false,
                    "expires_at": { "$gt": DateTime::now() },
                },
                doc! { "$set": { "is_used": true } },
            )
            .await
            .map_err(DaoError::from)?;
        if consumed.matched_count == 0 {
            return Err(OtpError::InvalidCode);
        }

        if let Some(user) = self.users.find_by_phone(phone).await? {
            return Ok(user);
        }
        match self.users.create(User::with_phone(phone.to_string())).await {
            Ok(user) => {
                info!(user_id = ?user.id, "Created user from OTP login");
                Ok(user)
            }
            // Another verification for the same phone created it first.
            Err(DaoError::DuplicateKey(_)) => self
                .users
                .find_by_phone(phone)
                .await?
                .ok_or(OtpError::Store(DaoError::NotFound)),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
