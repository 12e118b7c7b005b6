use laundromate_api::{build_router, state::AppState};
use laundromate_config::Settings;
use laundromate_db::{connect, indexes::ensure_indexes};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "laundromate_api=debug,laundromate_services=debug,laundromate_db=debug,tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    info!("Starting LaundroMate API on {}:{}", settings.app.host, settings.app.port);
    info!(
        expiration_days = settings.invitation.expiration_days,
        email_configured = settings.email.sendgrid_api_key.is_some(),
        "Invitation config"
    );

    let db = connect(&settings.database).await?;
    ensure_indexes(&db).await?;

    let app = build_router(AppState::new(db, settings.clone()));

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
