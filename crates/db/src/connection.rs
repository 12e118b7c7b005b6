use laundromate_config::DatabaseSettings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

/// Opens a pooled client and pings the server before handing out the database.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&settings.url).await?;
    options.app_name = Some("laundromate".to_string());
    options.max_pool_size = settings.max_pool_size.or(options.max_pool_size);
    options.min_pool_size = settings.min_pool_size.or(options.min_pool_size);

    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(bson::doc! { "ping": 1 })
        .await?;

    info!(db = %settings.name, "Connected to MongoDB");

    Ok(client.database(&settings.name))
}
