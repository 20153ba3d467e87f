use anyhow::{Context, Result};
use clap::Parser;
use std::net::Ipv4Addr;
use std::sync::Arc;
use student_api::{
    api::{self, AppState},
    config, logging,
    store::StudentStore,
    summary::OllamaSummaryClient,
};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "student-api", about = "In-memory student records over HTTP")]
struct Cli {
    /// Port to listen on (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing(&config);
    tracing::debug!(
        server_port = config.server_port,
        ollama_url = %config.ollama_url,
        summary_model = %config.summary_model,
        id_strategy = ?config.id_strategy,
        log_file = ?config.log_file,
        "Loaded configuration"
    );

    let store = Arc::new(StudentStore::new(config.id_strategy));
    let summaries = OllamaSummaryClient::new(&config.ollama_url, &config.summary_model)
        .context("failed to build summary client")?;
    let app = api::create_router(AppState::new(store, Arc::new(summaries)));

    let port = cli.port.unwrap_or(config.server_port);
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!(
        ollama_url = %config.ollama_url,
        model = %config.summary_model,
        id_strategy = ?config.id_strategy,
        "Listening on http://0.0.0.0:{}",
        port
    );
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
