//! Wiki client - Main Entry Point
//!
//! Starts the shared HTTP client and issues a GET for every path given on the
//! command line, printing one status line per request.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wiki_client::{AppConfig, bootstrap};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wiki-client v{}", env!("CARGO_PKG_VERSION"));

    let app = bootstrap(&config).await?;

    let mut failures = 0usize;
    for path in std::env::args().skip(1) {
        match app.client.get(&path).await {
            Ok(response) => println!("{} {} {path}", response.status, response.status_text),
            Err(error) => {
                failures += 1;
                eprintln!("{path}: {error}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} request(s) failed");
    }
    Ok(())
}
