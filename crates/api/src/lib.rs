pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    // Auth routes
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/otp/request", post(routes::auth::request_otp))
        .route("/otp/verify", post(routes::auth::verify_otp))
        .route("/me", get(routes::auth::me));

    // Organization routes (super admin)
    let organization_routes = Router::new()
        .route(
            "/",
            get(routes::organization::list).post(routes::organization::create),
        )
        .route(
            "/{organization_id}",
            get(routes::organization::get)
                .put(routes::organization::update)
                .delete(routes::organization::delete),
        )
        .route(
            "/{organization_id}/invite-member",
            post(routes::organization::invite_member),
        )
        .route(
            "/{organization_id}/invitation",
            get(routes::organization::list_invitations),
        )
        .route(
            "/{organization_id}/invitation/{invitation_id}",
            delete(routes::organization::revoke_invitation),
        )
        .route(
            "/{organization_id}/stores",
            get(routes::store::list_by_organization).post(routes::store::create),
        );

    // Store routes (super admin)
    let store_routes = Router::new()
        .route(
            "/{store_id}",
            get(routes::store::get)
                .put(routes::store::update)
                .delete(routes::store::delete),
        )
        .route(
            "/{store_id}/users",
            get(routes::store::list_users).post(routes::store::assign_user),
        )
        .route(
            "/{store_id}/users/{user_id}",
            delete(routes::store::unassign_user),
        );

    // Public invitation routes (the token is the credential)
    let invitation_routes = Router::new()
        .route("/validate", post(routes::invitation::validate))
        .route("/accept", post(routes::invitation::accept));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/organization", organization_routes)
        .nest("/store", store_routes)
        .nest("/invitation", invitation_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
