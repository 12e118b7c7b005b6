use crate::fixtures::{seed::ADMIN_PASSWORD, test_app::TestApp};
use serde_json::Value;

#[tokio::test]
async fn login_returns_bearer_token_and_user() {
    let app = TestApp::spawn().await;
    app.insert_user("admin@laundromate.test", Some(ADMIN_PASSWORD), true)
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "admin@laundromate.test",
            "password": ADMIN_PASSWORD,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["email"], "admin@laundromate.test");
    assert_eq!(json["user"]["is_super_admin"], true);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.insert_user("admin@laundromate.test", Some(ADMIN_PASSWORD), true)
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "admin@laundromate.test",
            "password": "wrong-password",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/api/auth/me")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let admin = app.seed_super_admin().await;
    let resp = app
        .auth_get("/api/auth/me", &admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["id"], admin.id.as_str());
    assert_eq!(json["email"], admin.email.as_str());
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let app = TestApp::spawn().await;
    app.insert_user("nopass@example.com", None, false).await;
    app.insert_user("staff@example.com", Some("Staff1234"), false)
        .await;

    for (email, password) in [
        ("nopass@example.com", "whatever1"),
        ("nobody@example.com", "whatever1"),
        ("staff@example.com", "wrong-password"),
    ] {
        let resp = app
            .client
            .post(app.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 401, "{email}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["message"], "Invalid credentials", "{email}");
    }
}
