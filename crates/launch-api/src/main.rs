//! Binary entrypoint for the launch API server.
use launch_api::{run, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // LAUNCH_CONFIG points at an optional YAML file; env vars override it
    let settings = Settings::load()?;
    run(settings).await?;
    Ok(())
}
