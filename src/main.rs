use coursereg::{Registry, config, net};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cfg = config::Config::from_env()?;
    tracing::info!(
        catalog = %cfg.catalog_path.display(),
        registrations = %cfg.registrations_path.display(),
        "using data files"
    );

    let registry = Arc::new(Registry::new(cfg));

    // Only returns when the listener cannot be bound
    net::serve(registry).await?;

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, prelude::*};

    color_eyre::install().map_err(|e| anyhow::anyhow!("{e}"))?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info,coursereg=debug"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_error::ErrorLayer::default())
        .init();

    Ok(())
}
