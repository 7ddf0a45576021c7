//! busproxy - bus stop search proxy
//!
//! Accepts WGS84 point+radius or bounding box queries, forwards them to the
//! geoportail feature search in LUREF, and returns the stops in WGS84.

use anyhow::Context;
use busproxy_api_client::{ClientConfig, SearchClient};
use busproxy_core::config::Config;
use busproxy_server::{router, Proxy};
use busproxy_telemetry::TelemetryConfig;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Bus stop proxy for the geoportail feature search
#[derive(Parser, Debug)]
#[command(name = "busproxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: busproxy.toml, .busproxy.toml, .config/busproxy.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    /// Loads the configuration file, then lets flags override it.
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(host) = &self.host {
            config.schema.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.schema.server.port = port;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    busproxy_telemetry::init_with_config(TelemetryConfig {
        log_level: cli.log_level.clone(),
        json: cli.json_logs,
        ..TelemetryConfig::default()
    })?;

    let config = cli.load_config()?;
    if let Some(path) = &config.path {
        info!(path = %path, "Loaded configuration");
    }

    let client = SearchClient::with_config(ClientConfig::from(&config.schema.upstream))
        .context("Failed to build upstream client")?;
    let proxy = Proxy::new(client, config.schema.defaults.clone())
        .context("Failed to initialise reprojection")?;
    let app = router(Arc::new(proxy));

    let server = &config.schema.server;
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", server.host, server.port))?;
    let addr = listener.local_addr()?;

    info!(
        addr = %addr,
        upstream = %config.schema.upstream.search_url,
        timeout_secs = config.schema.upstream.timeout_secs,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
