use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use bson::oid::ObjectId;
use laundromate_db::models::User;
use laundromate_services::auth::Claims;

use crate::{error::ApiError, state::AppState};

/// Extracts the authenticated user from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

        let claims = state.auth.verify_access_token(token)?;

        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(AuthUser { user_id, claims })
    }
}

/// An authenticated, active super-admin.
#[derive(Debug, Clone)]
pub struct SuperAdmin {
    pub user: User,
}

impl SuperAdmin {
    pub fn id(&self) -> Option<ObjectId> {
        self.user.id
    }
}

impl FromRequestParts<AppState> for SuperAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let user = state
            .users
            .base
            .find_one(bson::doc! { "_id": auth.user_id })
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

        if !user.is_active || !user.is_super_admin {
            return Err(ApiError::Forbidden("Super admin access required".to_string()));
        }
        Ok(SuperAdmin { user })
    }
}
