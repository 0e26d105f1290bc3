//! Sinais API server.

use advisory::AdvisoryGateway;
use database::{help_resource, person, Database};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sinais_server::{app, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Sinais API server");

    // Connect to database
    let db = Database::connect_with_pool_size(&config.database_url, config.database_pool_size).await?;
    db.migrate().await?;

    {
        let mut conn = db.acquire().await?;
        let persons = person::count_persons(&mut conn).await?;
        let resources = help_resource::list_resources(&mut conn).await?.len();
        info!(persons, resources, "Database ready");
    }

    // External providers
    let advisory = AdvisoryGateway::from_env()?;

    // Build application
    let state = AppState::new(db, advisory);
    let app = app(state);

    // Start server
    info!(addr = %config.addr, "Sinais API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
