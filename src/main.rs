use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_planner::adapters::health_handler::HealthHandler;
use trip_planner::adapters::tool_handler::BuiltinToolHandler;
use trip_planner::agents::llm::create_provider;
use trip_planner::cli::Cli;
use trip_planner::config::Settings;
use trip_planner::planner::CrewRuntime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before anything reads the environment
    let env_loaded = dotenvy::from_path(&cli.env_file);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_planner=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = env_loaded {
        warn!("No env file loaded from {}: {}", cli.env_file.display(), e);
    }

    // Load configuration (CLI > env vars > config file)
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Trip Planner Crew API on {}:{}", host, port);
    info!(
        model = %settings.llm.model,
        max_attempts = settings.crew.max_attempts,
        min_result_chars = settings.crew.min_result_chars,
        "Crew configured"
    );

    let llm = create_provider(&settings.llm)?;
    let tools = Arc::new(BuiltinToolHandler::from_settings(&settings.search)?);
    let runtime = Arc::new(CrewRuntime::new(&settings, llm, tools)?);
    let health_handler = Arc::new(HealthHandler::new(Arc::new(settings)));

    // Create application using the library function
    let app = trip_planner::create_app(runtime, health_handler);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
