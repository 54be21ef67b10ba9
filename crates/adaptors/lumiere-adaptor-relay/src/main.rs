//! Relay service binary

use anyhow::Context;
use clap::Parser;
use lumiere_adaptor_relay::{router, RelayState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumiere-relay", about = "Lumiere chat relay service")]
struct Args {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0:8787")]
    listen: String,

    /// Upstream chat-completions endpoint
    #[arg(long, default_value = "https://api.openai.com/v1/chat/completions")]
    upstream: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    lumiere_core::load_env().ok();

    let args = Args::parse();
    let api_key = lumiere_core::get_required_env("OPENAI_API_KEY")
        .context("the relay holds the upstream credential")?;

    let state = Arc::new(RelayState::new(args.upstream, api_key));
    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    info!("Relay listening on {}", args.listen);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
