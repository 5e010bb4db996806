//! hosttech-ddns - keep Hosttech DNS records pointed at your public IP.

use clap::Parser;
use hosttech_ddns::config::{Config, FileConfig, Overrides};
use hosttech_ddns::daemon;
use hosttech_ddns::detector::IpDetector;
use hosttech_ddns::events::TracingSink;
use hosttech_ddns::providers::HosttechClient;
use hosttech_ddns::reconcile::Reconciler;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hosttech-ddns")]
#[command(about = "Update DNS entries on Hosttech nameservers")]
#[command(version)]
struct Cli {
    /// API token for authentication
    #[arg(short, long, env = "TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Domain(s) to update, repeatable or comma-separated
    #[arg(short, long = "domain", env = "DOMAINS", value_delimiter = ',')]
    domains: Vec<String>,

    /// Update interval in minutes [default: 5]
    #[arg(short, long, env = "INTERVAL")]
    interval: Option<u64>,

    /// Run a single update and exit
    #[arg(long, env = "NO_INTERVAL")]
    no_interval: bool,

    /// Path to an optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hosttech API base URL
    #[arg(long, env = "HOSTTECH_API_URL")]
    api_url: Option<String>,
}

fn get_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path);
    }

    // Default locations
    let candidates = [
        FileConfig::default_path().ok(),
        Some(PathBuf::from("/etc/hosttech-ddns/config.toml")),
        Some(PathBuf::from("config.toml")),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|candidate| candidate.exists())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Variables from .env are visible to clap's env fallbacks
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let file = match get_config_path(cli.config) {
        Some(path) => FileConfig::load_from(&path)?,
        None => FileConfig::default(),
    };
    let config = Config::resolve(
        file,
        Overrides {
            token: cli.token,
            domains: cli.domains,
            interval_minutes: cli.interval,
            single_run: cli.no_interval,
            api_base_url: cli.api_url,
        },
    )?;

    tracing::info!(
        "Starting DDNS updater v{} for domains: {}",
        env!("CARGO_PKG_VERSION"),
        config.domains.join(", ")
    );
    if !config.single_run {
        tracing::info!("Update interval: {} minutes", config.interval_minutes);
    }

    let reconciler = Reconciler::new(
        Box::new(HosttechClient::with_base_url(
            config.token.clone(),
            config.api_base_url.clone(),
        )),
        Box::new(IpDetector::with_services(
            config.ipv4_services.clone(),
            config.ipv6_services.clone(),
        )),
        Arc::new(TracingSink),
        config.domains.clone(),
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Could not listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    daemon::run(&reconciler, config.interval(), config.single_run, shutdown).await;

    Ok(())
}
