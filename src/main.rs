use anyhow::Result;
use jobscout::{start_web_server, JobSearch, ScrapeConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("ROCKET_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let mut config = ScrapeConfig::default();
    if let Ok(base_url) = std::env::var("JOBS_SOURCE_URL") {
        config = config.with_base_url(&base_url);
    }

    info!("Starting job search API server");
    info!("Listing source: {}", config.base_url);
    info!("Port: {}", port);

    let search = JobSearch::new(config)?;
    start_web_server(search, port).await
}
