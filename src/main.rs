//! FoundersLens HTTP server
//!
//! Starts an Axum web server that turns startup ideas into structured reports.

use clap::Parser;
use founderslens::{
    analysis::AnalysisJob,
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    models::GeminiBackend,
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { output }) => write_template(output.as_deref()),
        Some(Command::Analyze {
            idea,
            industry,
            extra_context,
        }) => {
            let state = build_state(&cli.config)?;
            let job = AnalysisJob::new(idea, industry, extra_context);
            let envelope = state.orchestrator().run(&job, None).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Some(Command::Serve) | None => serve(&cli.config).await,
    }
}

fn write_template(output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let template = generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(path, template)?;
            eprintln!("Configuration template written to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}

/// Load configuration, initialize logging and resolve the default credential
///
/// Fails hard when the credential is missing: the server never starts without one.
fn build_state(config_path: &str) -> Result<AppState, Box<dyn std::error::Error>> {
    let config = Arc::new(Config::from_file(config_path)?);

    telemetry::init(&config.observability.log_level);

    let credential = config.resolve_credential()?;
    tracing::info!(
        api_key = %credential.redacted(),
        primary = %config.models.primary,
        fallback = %config.models.fallback,
        "Default API key loaded"
    );

    let backend = GeminiBackend::new(
        &config.models.base_url,
        config.server.request_timeout_seconds,
        config.models.search_grounding,
    )?;

    Ok(AppState::new(config, Arc::new(backend), credential)?)
}

async fn serve(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config_path)?;

    let server = &state.config().server;
    let ip = server.host.parse::<std::net::IpAddr>().map_err(|e| {
        format!("server.host '{}' is not a valid IP address: {}", server.host, e)
    })?;
    let addr = SocketAddr::from((ip, server.port));

    tracing::info!("Starting FoundersLens server on {}", addr);
    tracing::info!("Liveness check available at http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, handlers::router(state)).await?;

    Ok(())
}
