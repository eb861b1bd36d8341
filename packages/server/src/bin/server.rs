use anyhow::Context;
use bento_server::{router, AppState, Seed};
use bento_sync::MemoryBackend;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bento-server")]
#[command(about = "Serve Bento pages and the block API", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3030)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// JSON file with `pages` and `blocks` to preload
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let backend = Arc::new(MemoryBackend::new());
    if let Some(path) = &args.seed {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {:?}", path))?;
        let seed: Seed = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file {:?}", path))?;
        tracing::info!(pages = seed.pages.len(), blocks = seed.blocks.len(), "seed loaded");
        seed.load_into(&backend);
    }

    let app = router(Arc::new(AppState::new(backend)));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("HTTP listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
