use bson::{DateTime, oid::ObjectId};
use laundromate_db::models::{Invitation, InvitationStatus, User, VerificationCode};
use laundromate_services::AuthService;
use serde_json::Value;

use super::test_app::TestApp;

pub const ADMIN_PASSWORD: &str = "Admin123!";

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
}

pub struct SeededOrganization {
    pub id: String,
    pub name: String,
}

impl TestApp {
    /// Insert a user straight into MongoDB; there is no public sign-up.
    pub async fn insert_user(&self, email: &str, password: Option<&str>, super_admin: bool) -> User {
        let auth = AuthService::new(self.settings.jwt.clone());
        let now = DateTime::now();
        let mut user = User {
            id: None,
            email: Some(email.to_string()),
            phone: format!("+1{}", &ObjectId::new().to_hex()[14..]),
            first_name: None,
            last_name: None,
            password_hash: password.map(|p| auth.hash_password(p).unwrap()),
            is_active: true,
            is_admin: super_admin,
            is_super_admin: super_admin,
            created_at: now,
            updated_at: now,
        };

        let result = self
            .db
            .collection::<User>(User::COLLECTION)
            .insert_one(&user)
            .await
            .expect("Failed to insert user");
        user.id = result.inserted_id.as_object_id();
        user
    }

    /// Login a user and return their auth info.
    pub async fn login_user(&self, email: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed");

        assert!(
            resp.status().is_success(),
            "Login failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp.json().await.expect("Failed to parse login response");

        SeededUser {
            id: json["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            access_token: json["access_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn seed_super_admin(&self) -> SeededUser {
        self.insert_user("admin@laundromate.test", Some(ADMIN_PASSWORD), true)
            .await;
        self.login_user("admin@laundromate.test", ADMIN_PASSWORD).await
    }

    /// Create an authenticated request with the given token.
    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub async fn create_organization(&self, token: &str, name: &str) -> SeededOrganization {
        let resp = self
            .auth_post("/api/organization", token)
            .json(&serde_json::json!({
                "name": name,
                "billing_address": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "postal_code": "62701",
                "country": "us",
                "contact_email": "billing@example.com",
            }))
            .send()
            .await
            .expect("Create organization failed");

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        assert_eq!(status.as_u16(), 201, "Create organization failed: {}", body);

        let json: Value = serde_json::from_str(&body).unwrap();
        SeededOrganization {
            id: json["id"].as_str().unwrap().to_string(),
            name: name.to_string(),
        }
    }

    /// Invite `email` and return the created invitation JSON.
    pub async fn invite(&self, token: &str, organization_id: &str, email: &str, role: &str) -> Value {
        let resp = self
            .auth_post(
                &format!("/api/organization/{}/invite-member", organization_id),
                token,
            )
            .json(&serde_json::json!({
                "email": email,
                "organization_role": role,
            }))
            .send()
            .await
            .expect("Invite request failed");

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        assert_eq!(status.as_u16(), 201, "Invite failed: {}", body);
        serde_json::from_str(&body).unwrap()
    }

    pub async fn invitation_status(&self, token: &str) -> InvitationStatus {
        self.db
            .collection::<Invitation>(Invitation::COLLECTION)
            .find_one(bson::doc! { "token": token })
            .await
            .unwrap()
            .expect("invitation not found")
            .status
    }

    /// Push an invitation's expiry into the past.
    pub async fn backdate_invitation(&self, token: &str) {
        let past = DateTime::from_millis(DateTime::now().timestamp_millis() - 60_000);
        self.db
            .collection::<Invitation>(Invitation::COLLECTION)
            .update_one(
                bson::doc! { "token": token },
                bson::doc! { "$set": { "expires_at": past } },
            )
            .await
            .unwrap();
    }

    pub async fn create_store(&self, token: &str, organization_id: &str, name: &str) -> Value {
        let resp = self
            .auth_post(&format!("/api/organization/{}/stores", organization_id), token)
            .json(&serde_json::json!({
                "name": name,
                "street_address": "42 Bubble Ave",
                "city": "Springfield",
                "state": "IL",
                "postal_code": "62704",
                "country": "us",
            }))
            .send()
            .await
            .expect("Create store failed");

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        assert_eq!(status.as_u16(), 201, "Create store failed: {}", body);
        serde_json::from_str(&body).unwrap()
    }

    /// Ask for an OTP and read the issued code back from MongoDB.
    pub async fn request_otp(&self, phone: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/auth/otp/request"))
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await
            .expect("OTP request failed");
        assert_eq!(resp.status().as_u16(), 200);

        self.db
            .collection::<VerificationCode>(VerificationCode::COLLECTION)
            .find_one(bson::doc! { "phone": phone, "is_used": false })
            .await
            .unwrap()
            .expect("no unused code issued")
            .code
    }
}
