use axum::{Json, extract::State};
use laundromate_db::models::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OtpRequest {
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OtpVerify {
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 12))]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_super_admin: bool,
}

impl UserResponse {
    pub fn from_user(user: User) -> Result<Self, ApiError> {
        let id = user
            .id
            .ok_or_else(|| ApiError::Internal("User without id".to_string()))?;
        Ok(Self {
            id: id.to_hex(),
            email: user.email,
            phone: user.phone,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            is_super_admin: user.is_super_admin,
        })
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    body.validate()?;
    // One response for every failure, including accounts without a password.
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .users
        .find_by_email(&body.email)
        .await?
        .ok_or_else(invalid)?;

    let password_hash = user.password_hash.as_deref().ok_or_else(invalid)?;
    if !state.auth.verify_password(&body.password, password_hash)? || !user.is_active {
        return Err(invalid());
    }

    issue_token(&state, user).map(Json)
}

/// Sends a login code to `phone`. The account is created on verification.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<OtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    body.validate()?;
    state.otp.request_code(body.phone.trim()).await?;
    Ok(Json(serde_json::json!({ "message": "OTP sent successfully" })))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<OtpVerify>,
) -> Result<Json<AuthResponse>, ApiError> {
    body.validate()?;
    let user = state
        .otp
        .verify_code(body.phone.trim(), body.code.trim())
        .await?;
    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is disabled".to_string()));
    }
    issue_token(&state, user).map(Json)
}

fn issue_token(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("User without id".to_string()))?;
    let access_token = state
        .auth
        .generate_access_token(user_id, user.email.as_deref())?;

    Ok(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.auth.access_token_ttl_secs(),
        user: UserResponse::from_user(user)?,
    })
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.base.find_by_id(auth.user_id).await?;
    Ok(Json(UserResponse::from_user(user)?))
}
