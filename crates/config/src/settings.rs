use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub invitation: InvitationSettings,
    pub email: EmailSettings,
    pub otp: OtpSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvitationSettings {
    /// Days between creation and `expires_at`.
    pub expiration_days: i64,
}

impl Default for InvitationSettings {
    fn default() -> Self {
        Self { expiration_days: 7 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OtpSettings {
    pub code_length: usize,
    pub code_ttl_minutes: i64,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl_minutes: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub sendgrid_api_key: Option<String>,
    pub from_email: String,
    /// Base URL of the web app; accept links point at `{frontend_url}/auth/accept-invitation`.
    pub frontend_url: String,
    pub api_base_url: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("LAUNDROMATE"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "laundromate")?
            .set_default("jwt.secret", "change-me")?
            .set_default("jwt.access_token_ttl_secs", 86400)?
            .set_default("jwt.issuer", "laundromate")?
            .set_default("invitation.expiration_days", 7)?
            .set_default("email.sendgrid_api_key", None::<String>)?
            .set_default("email.from_email", "no-reply@laundromate.app")?
            .set_default("email.frontend_url", "http://localhost:3000")?
            .set_default("email.api_base_url", "https://api.sendgrid.com")?
            .set_default("otp.code_length", 6)?
            .set_default("otp.code_ttl_minutes", 10)?
            .build()?;

        config.try_deserialize()
    }
}
