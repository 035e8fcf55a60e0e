use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lineage_api::{AppState, Server};
use lineage_engine::{InMemoryAdjacencyStore, TaxonomyRegistry};

#[derive(Parser)]
#[command(name = "lineage-api", about = "Taxonomy-driven lineage traversal HTTP service")]
struct Cli {
    /// Path to the YAML config file (bind address, taxonomy/seed paths).
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "lineage_api=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = lineage_api::ApiConfig::load(&cli.config)?;

    let taxonomy_yaml = std::fs::read_to_string(&config.taxonomy_path)
        .map_err(|e| anyhow::anyhow!("reading taxonomy file {}: {e}", config.taxonomy_path.display()))?;
    let registry = TaxonomyRegistry::from_yaml_str(&taxonomy_yaml)?;

    let seed_yaml = std::fs::read_to_string(&config.seed_path)
        .map_err(|e| anyhow::anyhow!("reading seed file {}: {e}", config.seed_path.display()))?;
    let adapter = InMemoryAdjacencyStore::from_yaml_str(&seed_yaml)?;

    let addr = SocketAddr::from_str(&config.bind_addr)
        .map_err(|e| anyhow::anyhow!("invalid bind_addr '{}': {e}", config.bind_addr))?;

    let state = AppState::new(registry, adapter);
    Server::new(addr, state).run().await
}
