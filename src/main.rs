use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use icon_match::{catalog::Catalog, config::Config, matching::IconMatcher, web::WebServer};

#[derive(Parser)]
#[command(name = "icon-match")]
#[command(version)]
#[command(about = "Find the most visually similar catalog icons for a PNG or SVG image")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Catalog file (overrides config file)
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = format!("icon_match={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Icon Match Service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog.path = catalog;
    }

    let catalog = Catalog::load(&config.catalog).await?;
    if catalog.is_empty() {
        tracing::warn!("Icon catalog is empty, every search will return no matches");
    }

    info!(
        "Matching at {}x{} px, threshold {}, limits png={} svg={}, top {}",
        config.matching.raster_size,
        config.matching.raster_size,
        config.matching.threshold,
        config.matching.png_filter_limit,
        config.matching.svg_filter_limit,
        config.matching.slice_limit
    );
    let matcher = IconMatcher::new(Arc::new(catalog), config.matching.clone());

    let web_server = WebServer::new(&config.web, matcher)?;
    info!("Starting web server on {}", web_server.addr());
    web_server.serve().await?;

    info!("Icon Match Service stopped");
    Ok(())
}
