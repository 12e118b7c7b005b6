use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use laundromate_db::models::{
    Invitation, InvitationStatus, Organization, OrganizationRole, OrganizationStatus,
};
use laundromate_services::{
    EmailNotifier, InvitationEmail,
    dao::{
        base::{PaginatedResult, PaginationParams},
        organization::{NewOrganization, OrganizationChanges},
    },
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use super::{parse_id, timestamp};
use crate::{error::ApiError, extractors::auth::SuperAdmin, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub billing_address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub postal_code: String,
    #[validate(length(equal = 2))]
    pub country: String,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub billing_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[validate(length(equal = 2))]
    pub country: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub status: Option<OrganizationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrganizationStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct InviteMemberRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub organization_role: OrganizationRole,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub billing_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub status: OrganizationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl OrganizationResponse {
    fn from_organization(o: Organization) -> Result<Self, ApiError> {
        let id = o
            .id
            .ok_or_else(|| ApiError::Internal("Organization without id".to_string()))?;
        Ok(Self {
            id: id.to_hex(),
            name: o.name,
            billing_address: o.billing_address,
            city: o.city,
            state: o.state,
            postal_code: o.postal_code,
            country: o.country,
            contact_email: o.contact_email,
            contact_phone: o.contact_phone,
            status: o.status,
            created_at: timestamp(o.created_at),
            updated_at: timestamp(o.updated_at),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub token: String,
    pub email: String,
    pub organization_id: String,
    pub organization_role: OrganizationRole,
    pub invited_by: String,
    pub status: InvitationStatus,
    pub expires_at: String,
    pub accepted_at: Option<String>,
    pub created_at: String,
}

impl InvitationResponse {
    fn from_invitation(i: Invitation) -> Result<Self, ApiError> {
        let id = i
            .id
            .ok_or_else(|| ApiError::Internal("Invitation without id".to_string()))?;
        Ok(Self {
            id: id.to_hex(),
            token: i.token,
            email: i.email,
            organization_id: i.organization_id.to_hex(),
            organization_role: i.organization_role,
            invited_by: i.invited_by.to_hex(),
            status: i.status,
            expires_at: timestamp(i.expires_at),
            accepted_at: i.accepted_at.map(timestamp),
            created_at: timestamp(i.created_at),
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResult<OrganizationResponse>>, ApiError> {
    let page = state
        .organizations
        .list(query.status, &query.pagination())
        .await?;

    let items = page
        .items
        .into_iter()
        .map(OrganizationResponse::from_organization)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PaginatedResult {
        items,
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(organization_id): Path<String>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    let oid = parse_id(&organization_id, "organization_id")?;
    let organization = state.organizations.base.find_by_id(oid).await?;
    Ok(Json(OrganizationResponse::from_organization(organization)?))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Json(body): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<OrganizationResponse>), ApiError> {
    body.validate()?;

    let organization = state
        .organizations
        .create(NewOrganization {
            name: body.name,
            billing_address: body.billing_address,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
            country: body.country.to_uppercase(),
            contact_email: body.contact_email,
            contact_phone: body.contact_phone,
        })
        .await?;

    info!(organization_id = ?organization.id, "Organization created");
    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse::from_organization(organization)?),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(organization_id): Path<String>,
    Json(body): Json<UpdateOrganizationRequest>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    body.validate()?;
    let oid = parse_id(&organization_id, "organization_id")?;

    let organization = state
        .organizations
        .update(
            oid,
            OrganizationChanges {
                name: body.name,
                billing_address: body.billing_address,
                city: body.city,
                state: body.state,
                postal_code: body.postal_code,
                country: body.country.map(|c| c.to_uppercase()),
                contact_email: body.contact_email,
                contact_phone: body.contact_phone,
                status: body.status,
            },
        )
        .await?;

    Ok(Json(OrganizationResponse::from_organization(organization)?))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(organization_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_id(&organization_id, "organization_id")?;
    if !state.organizations.delete(oid).await? {
        return Err(ApiError::NotFound("Organization not found".to_string()));
    }
    info!(organization_id = %oid, "Organization deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn invite_member(
    State(state): State<AppState>,
    admin: SuperAdmin,
    Path(organization_id): Path<String>,
    Json(body): Json<InviteMemberRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), ApiError> {
    body.validate()?;
    let oid = parse_id(&organization_id, "organization_id")?;
    let invited_by = admin
        .id()
        .ok_or_else(|| ApiError::Internal("User without id".to_string()))?;

    let organization = state
        .organizations
        .base
        .find_one(bson::doc! { "_id": oid })
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    let invitation = state
        .invitations
        .create_invitation(&body.email, oid, body.organization_role, invited_by)
        .await?;

    // Delivery is best effort; the invitation already exists.
    let email = InvitationEmail {
        to_email: invitation.email.clone(),
        store_name: organization.name.clone(),
        organization_name: organization.name,
        invitation_token: invitation.token.clone(),
        expiration_days: state.invitations.expiration_days(),
    };
    if let Err(e) = state.email.send_invitation_email(email).await {
        warn!(invitation_id = ?invitation.id, error = %e, "Failed to send invitation email");
    }

    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse::from_invitation(invitation)?),
    ))
}

pub async fn list_invitations(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(organization_id): Path<String>,
) -> Result<Json<Vec<InvitationResponse>>, ApiError> {
    let oid = parse_id(&organization_id, "organization_id")?;
    let invitations = state.invitations.list_invitations(oid).await?;

    let response = invitations
        .into_iter()
        .map(InvitationResponse::from_invitation)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(response))
}

pub async fn revoke_invitation(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path((organization_id, invitation_id)): Path<(String, String)>,
) -> Result<Json<InvitationResponse>, ApiError> {
    let oid = parse_id(&organization_id, "organization_id")?;
    let iid = parse_id(&invitation_id, "invitation_id")?;

    let invitation = state.invitations.revoke_invitation(oid, iid).await?;
    Ok(Json(InvitationResponse::from_invitation(invitation)?))
}
