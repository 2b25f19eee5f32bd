//! stemview - web front end for an audio analysis backend
//!
//! `serve` runs the browser UI; `analyze` uploads one file from the command
//! line and writes a standalone HTML report.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stemview_common::config::{self, TomlConfig};
use stemview_common::events::EventBus;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stemview_ui::client::{AudioUpload, HttpAnalysisClient};
use stemview_ui::controller::{UploadController, UploadOutcome};
use stemview_ui::AppState;

/// Command-line arguments for stemview
#[derive(Parser, Debug)]
#[command(name = "stemview")]
#[command(about = "Upload audio to the analysis backend and view instruments and stems")]
#[command(version)]
struct Args {
    /// Config file (default: $STEMVIEW_CONFIG, then <config dir>/stemview/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web UI
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "STEMVIEW_PORT")]
        port: Option<u16>,

        /// Analysis backend origin, e.g. http://127.0.0.1:8000
        #[arg(long)]
        backend_url: Option<String>,
    },
    /// Analyze one file and write an HTML report
    Analyze {
        /// Audio file to upload
        file: PathBuf,

        /// Report path (default: <file stem>.stemview.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Analysis backend origin, e.g. http://127.0.0.1:8000
        #[arg(long)]
        backend_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref());
    let toml_config = config::load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("stemview={0},stemview_ui={0},tower_http=info", toml_config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "stemview v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file location; using defaults"),
    }

    match args.command {
        Command::Serve { port, backend_url } => serve(&toml_config, port, backend_url).await,
        Command::Analyze {
            file,
            output,
            backend_url,
        } => analyze(&toml_config, &file, output, backend_url).await,
    }
}

fn build_controller(toml_config: &TomlConfig, backend_url: Option<String>) -> Result<UploadController> {
    let backend_url = config::resolve_backend_url(backend_url.as_deref(), toml_config)
        .context("Invalid backend URL")?;

    let client = HttpAnalysisClient::new(backend_url, toml_config.request_timeout())
        .context("Failed to build HTTP client")?;

    Ok(UploadController::new(
        Arc::new(client),
        EventBus::new(100),
        toml_config.progress,
    ))
}

async fn serve(toml_config: &TomlConfig, port: Option<u16>, backend_url: Option<String>) -> Result<()> {
    let controller = Arc::new(build_controller(toml_config, backend_url)?);
    let app = stemview_ui::build_router(AppState::new(controller));

    let port = port.unwrap_or(toml_config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn default_report_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    file.with_file_name(format!("{}.stemview.html", stem))
}

async fn analyze(
    toml_config: &TomlConfig,
    file: &Path,
    output: Option<PathBuf>,
    backend_url: Option<String>,
) -> Result<()> {
    let controller = build_controller(toml_config, backend_url)?;
    let upload = AudioUpload::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let outcome = controller.submit(Some(upload)).await?;

    let output = output.unwrap_or_else(|| default_report_path(file));
    let source_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let report = controller.render_report(&source_name).await;
    tokio::fs::write(&output, report)
        .await
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    match outcome {
        UploadOutcome::Completed { summary, stem_count, .. } => {
            println!(
                "✅ Audio type: {}, Confidence: {}, Stems: {}",
                summary.audio_type,
                summary.confidence_text(),
                stem_count
            );
            println!("Report written to {}", output.display());
            Ok(())
        }
        UploadOutcome::Failed { error, .. } => {
            println!("❌ Error: {}", error);
            println!("Report written to {}", output.display());
            Err(anyhow::anyhow!("Analysis failed: {}", error))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
