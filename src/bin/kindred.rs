//! Server binary for kindred.

use clap::Parser;
use kindred::{BotConfig, ChatServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Kindred: emotion-aware support chatbot backend.
#[derive(Parser)]
#[command(name = "kindred", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = BotConfig::discover(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = init_tracing(&config);

    info!("kindred v{} starting", env!("CARGO_PKG_VERSION"));

    let pipeline = Arc::new(kindred::startup::build_pipeline(&config));
    let server = ChatServer::start(pipeline, &config.server, &config.web).await?;

    println!("Listening on http://{}. Press Ctrl+C to stop.", server.addr());

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl+C, shutting down...");
    server.shutdown().await?;

    Ok(())
}

/// Stderr logging plus an optional daily log file.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
fn init_tracing(config: &BotConfig) -> Option<WorkerGuard> {
    // Suppress noisy dependency logs by default; RUST_LOG overrides.
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("kindred=info,tower_http=info"))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    match &config.logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "kindred.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}
