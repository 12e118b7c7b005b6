use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use laundromate_db::models::{Store, StoreAssignment, StoreRole, StoreStatus};
use laundromate_services::dao::{
    base::{DaoError, PaginatedResult, PaginationParams},
    store::{NewStore, StoreChanges},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::{parse_id, timestamp};
use crate::{error::ApiError, extractors::auth::SuperAdmin, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoreRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub street_address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
    #[validate(length(equal = 2))]
    pub country: String,
    #[serde(default)]
    pub status: StoreStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStoreRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[validate(length(equal = 2))]
    pub country: Option<String>,
    pub status: Option<StoreStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StoreListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignUserRequest {
    pub user_id: String,
    #[serde(default)]
    pub role: StoreRole,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub status: StoreStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl StoreResponse {
    fn from_store(s: Store) -> Result<Self, ApiError> {
        let id = s
            .id
            .ok_or_else(|| ApiError::Internal("Store without id".to_string()))?;
        Ok(Self {
            id: id.to_hex(),
            organization_id: s.organization_id.to_hex(),
            name: s.name,
            street_address: s.street_address,
            city: s.city,
            state: s.state,
            postal_code: s.postal_code,
            country: s.country,
            status: s.status,
            created_at: timestamp(s.created_at),
            updated_at: timestamp(s.updated_at),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StoreAssignmentResponse {
    pub id: String,
    pub user_id: String,
    pub store_id: String,
    pub role: StoreRole,
    pub created_at: String,
}

impl StoreAssignmentResponse {
    fn from_assignment(a: StoreAssignment) -> Result<Self, ApiError> {
        let id = a
            .id
            .ok_or_else(|| ApiError::Internal("Store assignment without id".to_string()))?;
        Ok(Self {
            id: id.to_hex(),
            user_id: a.user_id.to_hex(),
            store_id: a.store_id.to_hex(),
            role: a.role,
            created_at: timestamp(a.created_at),
        })
    }
}

fn store_not_found(err: DaoError) -> ApiError {
    match err {
        DaoError::NotFound => ApiError::NotFound("Store not found".to_string()),
        other => other.into(),
    }
}

pub async fn list_by_organization(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(organization_id): Path<String>,
    Query(query): Query<StoreListQuery>,
) -> Result<Json<PaginatedResult<StoreResponse>>, ApiError> {
    let oid = parse_id(&organization_id, "organization_id")?;
    state
        .organizations
        .base
        .find_one(bson::doc! { "_id": oid })
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    let defaults = PaginationParams::default();
    let params = PaginationParams {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let page = state.stores.list_by_organization(oid, &params).await?;

    let items = page
        .items
        .into_iter()
        .map(StoreResponse::from_store)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PaginatedResult {
        items,
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(organization_id): Path<String>,
    Json(body): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    body.validate()?;
    let oid = parse_id(&organization_id, "organization_id")?;
    state
        .organizations
        .base
        .find_one(bson::doc! { "_id": oid })
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    let store = state
        .stores
        .create(
            oid,
            NewStore {
                name: body.name,
                street_address: body.street_address,
                city: body.city,
                state: body.state,
                postal_code: body.postal_code,
                country: body.country.to_uppercase(),
                status: body.status,
            },
        )
        .await
        .map_err(|e| match e {
            DaoError::DuplicateKey(_) => {
                ApiError::Conflict("A store with this name already exists".to_string())
            }
            other => other.into(),
        })?;

    info!(store_id = ?store.id, organization_id = %oid, "Store created");
    Ok((StatusCode::CREATED, Json(StoreResponse::from_store(store)?)))
}

pub async fn get(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(store_id): Path<String>,
) -> Result<Json<StoreResponse>, ApiError> {
    let sid = parse_id(&store_id, "store_id")?;
    let store = state.stores.base.find_by_id(sid).await.map_err(store_not_found)?;
    Ok(Json(StoreResponse::from_store(store)?))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(store_id): Path<String>,
    Json(body): Json<UpdateStoreRequest>,
) -> Result<Json<StoreResponse>, ApiError> {
    body.validate()?;
    let sid = parse_id(&store_id, "store_id")?;

    let store = state
        .stores
        .update(
            sid,
            StoreChanges {
                name: body.name,
                street_address: body.street_address,
                city: body.city,
                state: body.state,
                postal_code: body.postal_code,
                country: body.country.map(|c| c.to_uppercase()),
                status: body.status,
            },
        )
        .await
        .map_err(store_not_found)?;

    Ok(Json(StoreResponse::from_store(store)?))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(store_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sid = parse_id(&store_id, "store_id")?;
    if !state.stores.delete(sid).await? {
        return Err(ApiError::NotFound("Store not found".to_string()));
    }
    info!(store_id = %sid, "Store deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<StoreAssignmentResponse>>, ApiError> {
    let sid = parse_id(&store_id, "store_id")?;
    let assignments = state.stores.list_assignments(sid).await?;

    let response = assignments
        .into_iter()
        .map(StoreAssignmentResponse::from_assignment)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(response))
}

pub async fn assign_user(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path(store_id): Path<String>,
    Json(body): Json<AssignUserRequest>,
) -> Result<(StatusCode, Json<StoreAssignmentResponse>), ApiError> {
    let sid = parse_id(&store_id, "store_id")?;
    let uid = parse_id(&body.user_id, "user_id")?;

    state.stores.base.find_by_id(sid).await.map_err(store_not_found)?;
    state
        .users
        .base
        .find_one(bson::doc! { "_id": uid })
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let assignment = state
        .stores
        .assign(sid, uid, body.role)
        .await
        .map_err(|e| match e {
            DaoError::DuplicateKey(_) => {
                ApiError::Conflict("User is already assigned to this store".to_string())
            }
            other => other.into(),
        })?;

    info!(store_id = %sid, user_id = %uid, role = ?assignment.role, "User assigned to store");
    Ok((
        StatusCode::CREATED,
        Json(StoreAssignmentResponse::from_assignment(assignment)?),
    ))
}

pub async fn unassign_user(
    State(state): State<AppState>,
    _admin: SuperAdmin,
    Path((store_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let sid = parse_id(&store_id, "store_id")?;
    let uid = parse_id(&user_id, "user_id")?;
    if !state.stores.unassign(sid, uid).await? {
        return Err(ApiError::NotFound("Store assignment not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
