//! AI Widget Endpoint - serves the chat API for embedded widgets.

use ai_widget_endpoint::{serve, EchoResponder, ServerConfig, DEFAULT_BIND_ADDRESS, DEFAULT_PORT};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ai-widget-endpoint")]
#[command(about = "Chat endpoint for the AI widget")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(short, long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig {
        bind_address: cli.bind,
        port: cli.port,
    };

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;

    tracing::info!("API service running on {}", listener.local_addr()?);
    tracing::info!("Chat endpoint: POST http://localhost:{}/api/chat", config.port);

    serve(listener, Arc::new(EchoResponder), async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down");
    })
    .await?;

    Ok(())
}
