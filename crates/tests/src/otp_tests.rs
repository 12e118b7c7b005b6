use laundromate_db::models::{User, VerificationCode};
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

async fn verify(app: &TestApp, phone: &str, code: &str) -> reqwest::Response {
    app.client
        .post(app.url("/api/auth/otp/verify"))
        .json(&serde_json::json!({ "phone": phone, "code": code }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn otp_login_creates_the_user_once() {
    let app = TestApp::spawn().await;
    let phone = "+15551230001";

    let code = app.request_otp(phone).await;
    assert_eq!(code.len(), 6);

    let resp = verify(&app, phone, &code).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["phone"], phone);
    assert!(json["user"]["email"].is_null());
    let user_id = json["user"]["id"].as_str().unwrap().to_string();

    let token = json["access_token"].as_str().unwrap();
    let me: Value = app
        .auth_get("/api/auth/me", token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["id"], user_id.as_str());

    // A second login reuses the account.
    let code = app.request_otp(phone).await;
    let json: Value = verify(&app, phone, &code).await.json().await.unwrap();
    assert_eq!(json["user"]["id"], user_id.as_str());

    let users = app
        .db
        .collection::<User>(User::COLLECTION)
        .count_documents(bson::doc! { "phone": phone })
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn otp_code_is_single_use() {
    let app = TestApp::spawn().await;
    let phone = "+15551230002";
    let code = app.request_otp(phone).await;

    assert_eq!(verify(&app, phone, &code).await.status().as_u16(), 200);

    let resp = verify(&app, phone, &code).await;
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid or expired OTP");
}

#[tokio::test]
async fn new_request_retires_the_previous_code() {
    let app = TestApp::spawn().await;
    let phone = "+15551230003";

    let first = app.request_otp(phone).await;
    let second = app.request_otp(phone).await;

    let unused = app
        .db
        .collection::<VerificationCode>(VerificationCode::COLLECTION)
        .count_documents(bson::doc! { "phone": phone, "is_used": false })
        .await
        .unwrap();
    assert_eq!(unused, 1);

    if first != second {
        assert_eq!(verify(&app, phone, &first).await.status().as_u16(), 400);
    }
    assert_eq!(verify(&app, phone, &second).await.status().as_u16(), 200);
}

#[tokio::test]
async fn expired_or_wrong_code_is_rejected() {
    let app = TestApp::spawn().await;
    let phone = "+15551230004";
    let code = app.request_otp(phone).await;

    let wrong = if code == "000000" { "111111" } else { "000000" };
    assert_eq!(verify(&app, phone, wrong).await.status().as_u16(), 400);
    assert_eq!(verify(&app, "+15559999999", &code).await.status().as_u16(), 400);

    let past = bson::DateTime::from_millis(bson::DateTime::now().timestamp_millis() - 60_000);
    app.db
        .collection::<VerificationCode>(VerificationCode::COLLECTION)
        .update_one(
            bson::doc! { "phone": phone, "code": code.as_str() },
            bson::doc! { "$set": { "expires_at": past } },
        )
        .await
        .unwrap();
    assert_eq!(verify(&app, phone, &code).await.status().as_u16(), 400);
}
