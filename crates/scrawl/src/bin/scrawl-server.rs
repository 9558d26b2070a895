use std::time::Duration;

use scrawl::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_SWEEP_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), ScrawlError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind = std::env::var("SCRAWL_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let sweep_secs = match std::env::var("SCRAWL_SWEEP_SECS") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "SCRAWL_SWEEP_SECS is not a number, using default");
            DEFAULT_SWEEP_SECS
        }),
        Err(_) => DEFAULT_SWEEP_SECS,
    };

    let server = ScrawlServer::builder()
        .bind(&bind)
        .sweep_interval(Duration::from_secs(sweep_secs))
        .build()
        .await?;
    if let Ok(addr) = server.local_addr() {
        tracing::info!(%addr, "listening");
    }

    server.run().await
}
