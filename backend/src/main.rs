//! Sugarcane Yield Predictor - Backend Server
//!
//! Loads the taluka weather table and the model artifacts, then serves the
//! farmer form and the JSON API.

use std::net::SocketAddr;

use sugarcane_yield_backend::{
    artifacts::{self, ArtifactPaths},
    create_app, weather_table, AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "yield_server=debug,sugarcane_yield_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Sugarcane Yield Predictor");
    tracing::info!("Environment: {}", config.environment);

    // Both loads are fatal; the form is never served without them
    let weather = weather_table::load(&config.secrets.path)?;

    let paths = ArtifactPaths::from_config(&config.artifacts)?;
    let bundle = artifacts::load(&paths)?;

    // Create application state
    let state = AppState::new(config.clone(), bundle, weather);

    for column in state.prediction_service().unseen_choices() {
        tracing::warn!("Model schema has no column {}; that choice will be ignored", column);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Build application
    let app = create_app(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
