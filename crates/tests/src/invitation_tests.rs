use laundromate_db::models::{InvitationStatus, OrganizationMember, User};
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

async fn validate(app: &TestApp, token: &str) -> reqwest::Response {
    app.client
        .post(app.url("/api/invitation/validate"))
        .json(&serde_json::json!({ "token": token }))
        .send()
        .await
        .unwrap()
}

async fn accept(app: &TestApp, token: &str, password: &str) -> reqwest::Response {
    app.client
        .post(app.url("/api/invitation/accept"))
        .json(&serde_json::json!({ "token": token, "password": password }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn invite_validate_accept_end_to_end() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;

    let invitation = app
        .invite(&admin.access_token, &org.id, "alice@example.com", "owner")
        .await;
    assert_eq!(invitation["status"], "pending");
    assert_eq!(invitation["organization_role"], "owner");
    assert_eq!(invitation["invited_by"], admin.id.as_str());
    assert!(invitation["accepted_at"].is_null());
    let token = invitation["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 43);

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "alice@example.com");
    assert_eq!(sent[0].organization_name, "Suds Inc");
    assert_eq!(sent[0].invitation_token, token);
    assert_eq!(sent[0].expiration_days, 7);

    let resp = validate(&app, &token).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["organization_id"], org.id.as_str());
    assert_eq!(json["organization_name"], "Suds Inc");
    assert_eq!(json["organization_role"], "owner");

    let resp = accept(&app, &token, "Password123!").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["email"], "alice@example.com");
    let access_token = json["access_token"].as_str().unwrap().to_string();

    // The bearer token works and the chosen password logs in.
    let resp = app.auth_get("/api/auth/me", &access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let alice = app.login_user("alice@example.com", "Password123!").await;
    assert_eq!(alice.id, json["user"]["id"].as_str().unwrap());

    let members: Vec<OrganizationMember> = {
        use futures::TryStreamExt;
        app.db
            .collection::<OrganizationMember>(OrganizationMember::COLLECTION)
            .find(bson::doc! {})
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap()
    };
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id.to_hex(), alice.id);
    assert_eq!(members[0].organization_id.to_hex(), org.id);
    assert_eq!(app.invitation_status(&token).await, InvitationStatus::Accepted);

    let resp = accept(&app, &token, "Password123!").await;
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "This invitation has already been accepted");

    let resp = validate(&app, &token).await;
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["reason"], "This invitation has already been accepted");
    assert!(json.get("email").is_none());
}

#[tokio::test]
async fn duplicate_pending_invitation_conflicts() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;
    app.invite(&admin.access_token, &org.id, "bob@example.com", "employee")
        .await;

    let resp = app
        .auth_post(
            &format!("/api/organization/{}/invite-member", org.id),
            &admin.access_token,
        )
        .json(&serde_json::json!({
            "email": "bob@example.com",
            "organization_role": "admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "conflict");
}

#[tokio::test]
async fn concurrent_invites_create_one_pending_invitation() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;

    let path = format!("/api/organization/{}/invite-member", org.id);
    let requests = (0..5).map(|_| {
        app.auth_post(&path, &admin.access_token)
            .json(&serde_json::json!({
                "email": "race@example.com",
                "organization_role": "employee",
            }))
            .send()
    });
    let statuses: Vec<u16> = futures::future::join_all(requests)
        .await
        .into_iter()
        .map(|r| r.unwrap().status().as_u16())
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == 409).count(), 4);
}

#[tokio::test]
async fn email_failure_does_not_fail_invite() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;
    app.emails.fail_sends(true);

    let invitation = app
        .invite(&admin.access_token, &org.id, "carol@example.com", "employee")
        .await;

    assert_eq!(app.emails.sent().len(), 1);
    let token = invitation["token"].as_str().unwrap();
    let json: Value = validate(&app, token).await.json().await.unwrap();
    assert_eq!(json["valid"], true);
}

#[tokio::test]
async fn invite_to_unknown_organization_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;

    let resp = app
        .auth_post(
            &format!("/api/organization/{}/invite-member", bson::oid::ObjectId::new()),
            &admin.access_token,
        )
        .json(&serde_json::json!({ "email": "x@example.com", "organization_role": "owner" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    assert!(app.emails.sent().is_empty());
}

#[tokio::test]
async fn malformed_and_unknown_tokens() {
    let app = TestApp::spawn().await;

    let resp = validate(&app, "not a token").await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = accept(&app, "tooshort", "Password123!").await;
    assert_eq!(resp.status().as_u16(), 400);

    let unknown = "A".repeat(43);
    let resp = validate(&app, &unknown).await;
    assert_eq!(resp.status().as_u16(), 404);
    let resp = accept(&app, &unknown, "Password123!").await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn expired_invitation_is_marked_and_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;
    let invitation = app
        .invite(&admin.access_token, &org.id, "dave@example.com", "employee")
        .await;
    let token = invitation["token"].as_str().unwrap();
    app.backdate_invitation(token).await;

    let json: Value = validate(&app, token).await.json().await.unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["reason"], "This invitation has expired");
    assert_eq!(app.invitation_status(token).await, InvitationStatus::Expired);

    let resp = accept(&app, token, "Password123!").await;
    assert_eq!(resp.status().as_u16(), 400);

    // The expired invitation no longer blocks a fresh one.
    app.invite(&admin.access_token, &org.id, "dave@example.com", "employee")
        .await;
}

#[tokio::test]
async fn revoked_invitation_cannot_be_accepted() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;
    let invitation = app
        .invite(&admin.access_token, &org.id, "erin@example.com", "admin")
        .await;
    let token = invitation["token"].as_str().unwrap();
    let invitation_id = invitation["id"].as_str().unwrap();

    let resp = app
        .auth_delete(
            &format!("/api/organization/{}/invitation/{}", org.id, invitation_id),
            &admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "revoked");

    let resp = accept(&app, token, "Password123!").await;
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "This invitation has been revoked");

    let resp = app
        .auth_get(
            &format!("/api/organization/{}/invitation", org.id),
            &admin.access_token,
        )
        .send()
        .await
        .unwrap();
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["status"], "revoked");
}

#[tokio::test]
async fn existing_user_keeps_account_and_password() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;
    let existing = app
        .insert_user("frank@example.com", Some("Original123"), false)
        .await;

    let invitation = app
        .invite(&admin.access_token, &org.id, "frank@example.com", "employee")
        .await;
    let resp = accept(&app, invitation["token"].as_str().unwrap(), "Different123").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user"]["id"], existing.id.unwrap().to_hex().as_str());

    let users = app
        .db
        .collection::<User>(User::COLLECTION)
        .count_documents(bson::doc! { "email": "frank@example.com" })
        .await
        .unwrap();
    assert_eq!(users, 1);
    app.login_user("frank@example.com", "Original123").await;
}

#[tokio::test]
async fn short_password_is_rejected_before_acceptance() {
    let app = TestApp::spawn().await;
    let admin = app.seed_super_admin().await;
    let org = app.create_organization(&admin.access_token, "Suds Inc").await;
    let invitation = app
        .invite(&admin.access_token, &org.id, "gina@example.com", "owner")
        .await;
    let token = invitation["token"].as_str().unwrap();

    let resp = accept(&app, token, "short").await;
    assert_eq!(resp.status().as_u16(), 422);
    assert_eq!(app.invitation_status(token).await, InvitationStatus::Pending);
}
