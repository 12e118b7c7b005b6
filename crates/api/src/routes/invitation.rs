use axum::{Json, extract::State};
use laundromate_services::invitation::InvitationValidation;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::auth::UserResponse;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ValidateInvitationRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AcceptInvitationRequest {
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateInvitationRequest>,
) -> Result<Json<InvitationValidation>, ApiError> {
    let result = state.invitations.validate_invitation(&body.token).await?;
    Ok(Json(result))
}

pub async fn accept(
    State(state): State<AppState>,
    Json(body): Json<AcceptInvitationRequest>,
) -> Result<Json<AcceptInvitationResponse>, ApiError> {
    body.validate()?;

    let accepted = state
        .invitations
        .accept_invitation(&body.token, &body.password)
        .await?;

    Ok(Json(AcceptInvitationResponse {
        access_token: accepted.access_token,
        token_type: accepted.token_type.to_string(),
        user: UserResponse::from_user(accepted.user)?,
    }))
}
