use anyhow::Result;

use trip_planner_backend::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        llm_model = %settings.llm_model,
        "Starting trip planner backend"
    );

    let server_addr = settings.server_addr.clone();

    // Create application state
    let state = app::AppState::from_settings(settings)?;

    // Check the provider without blocking startup
    tokio::spawn({
        let state = state.clone();
        async move {
            match state.llm_client.health_check().await {
                Ok(()) => tracing::info!("LLM provider is reachable"),
                Err(e) => tracing::warn!(error = %e, "LLM provider health check failed - will retry on first request"),
            }
        }
    });

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&server_addr).await?;
    tracing::info!("Listening on {}", server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
