pub mod template;

use async_trait::async_trait;
use laundromate_config::EmailSettings;
use serde_json::json;
use tracing::info;

pub use template::{InvitationEmailContent, InvitationTemplateRenderer};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SendGrid API key is not configured")]
    NotConfigured,
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("SendGrid API returned status code {0}")]
    Rejected(u16),
}

/// Everything needed to tell an invitee where to accept.
#[derive(Debug, Clone)]
pub struct InvitationEmail {
    pub to_email: String,
    pub store_name: String,
    pub organization_name: String,
    pub invitation_token: String,
    pub expiration_days: i64,
}

#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send_invitation_email(&self, email: InvitationEmail) -> Result<bool, EmailError>;
}

// ---- SendGrid ------------------------------------------------------------

pub struct SendGridNotifier {
    settings: EmailSettings,
    renderer: InvitationTemplateRenderer,
    client: reqwest::Client,
}

impl SendGridNotifier {
    pub fn new(settings: &EmailSettings) -> Self {
        Self {
            settings: settings.clone(),
            renderer: InvitationTemplateRenderer,
            client: reqwest::Client::new(),
        }
    }

    pub fn invitation_url(&self, token: &str) -> String {
        format!(
            "{}/auth/accept-invitation?token={}",
            self.settings.frontend_url.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait]
impl EmailNotifier for SendGridNotifier {
    async fn send_invitation_email(&self, email: InvitationEmail) -> Result<bool, EmailError> {
        let api_key = self
            .settings
            .sendgrid_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(EmailError::NotConfigured)?;

        let content = self.renderer.render(
            &email.store_name,
            &email.organization_name,
            &self.invitation_url(&email.invitation_token),
            email.expiration_days,
        );

        let body = json!({
            "personalizations": [{ "to": [{ "email": email.to_email }] }],
            "from": { "email": self.settings.from_email },
            "subject": content.subject,
            "content": [
                { "type": "text/plain", "value": content.text },
                { "type": "text/html", "value": content.html },
            ],
        });

        let resp = self
            .client
            .post(format!(
                "{}/v3/mail/send",
                self.settings.api_base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status == 200 || status == 202 {
            info!(status, "Invitation email handed to SendGrid");
            Ok(true)
        } else {
            Err(EmailError::Rejected(status))
        }
    }
}
