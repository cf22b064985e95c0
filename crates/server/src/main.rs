//! WebSocket server hosting battle rooms.
mod config;
mod connection;
mod gemini;
mod protocol;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use battle_runtime::RoomManager;
use config::ServerConfig;
use gemini::GeminiClient;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    setup_logging(config.log_dir.as_deref())?;

    let mut builder = RoomManager::builder().config(config.runtime.clone());
    match config.gemini.clone() {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "Model-backed decisions enabled");
            builder = builder.reasoning_client(Arc::new(GeminiClient::new(gemini)));
        }
        None => tracing::info!("GEMINI_API_KEY not set, automated sides use the heuristic"),
    }
    let manager = builder.build();

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Battle server listening on ws://{}", config.bind_addr);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        tracing::warn!(%err, "Accept failed");
                        continue;
                    }
                };
                let manager = manager.clone();
                tokio::spawn(async move {
                    if let Err(err) = connection::serve(stream, peer, manager).await {
                        tracing::warn!(target: "server::connection", %peer, "{err:#}");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                break;
            }
        }
    }

    manager.shutdown().await;
    Ok(())
}

/// Setup logging to stderr, and to `server.log` when a directory is configured
fn setup_logging(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "server.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            // Leak the guard to keep file writer alive
            std::mem::forget(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/server.log", dir.display());
    }
    Ok(())
}
