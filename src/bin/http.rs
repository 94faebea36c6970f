#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing::info;
    use tracing_subscriber::EnvFilter;
    use vridge_schedule::{ServiceConfig, http_api};

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = ServiceConfig::from_env()?;
    info!(
        addr = %config.http_addr,
        planning = config.durations.planning,
        shooting = config.durations.shooting,
        editing = config.durations.editing,
        invite_ttl_secs = config.invite_ttl.as_secs(),
        "starting vridge-schedule HTTP API"
    );

    let state = http_api::AppState::new(&config)?;
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
