use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use laundromate_services::{EmailError, EmailNotifier, InvitationEmail};
use parking_lot::Mutex;

/// Captures outgoing invitation emails instead of calling SendGrid.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<InvitationEmail>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<InvitationEmail> {
        self.sent.lock().clone()
    }

    /// Every following send fails as if the provider were unreachable.
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmailNotifier for RecordingNotifier {
    async fn send_invitation_email(&self, email: InvitationEmail) -> Result<bool, EmailError> {
        self.sent.lock().push(email);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::Rejected(503));
        }
        Ok(true)
    }
}
