use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, StorageKind};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;

mod shutdown;
mod storage;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const INGRESS_MODULE: &str = "api_ingress";

/// Anime catalogue server - CRUD over anime records behind Basic auth
#[derive(Parser)]
#[command(name = "anime-server")]
#[command(about = "Anime catalogue server - CRUD over anime records behind Basic auth")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep anime records in memory instead of SQLite
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Anime server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Builds the ingress from `modules.api_ingress`, with animes' rules and docs.
fn build_ingress(config: &AppConfig) -> Result<ApiIngress> {
    let ingress_cfg: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;
    let ingress = ApiIngress::from_config(ingress_cfg)?
        .with_access_rules(animes::access_rules())
        .with_openapi(animes::openapi())
        .with_timeout(Duration::from_secs(config.server.timeout_sec));
    Ok(ingress)
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let raw = format!("{}:{}", config.server.host, config.server.port);
    raw.parse()
        .with_context(|| format!("invalid server address '{raw}'"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let addr = bind_addr(&config)?;
    let ingress = build_ingress(&config)?;

    let repo = storage::open_repository(&config.storage, &config.home_dir()).await?;
    let service = Arc::new(animes::Service::new(repo));

    let routes = animes::register_routes(Router::new(), service);
    let router = ingress.build_router(routes)?;

    let cancel = shutdown::cancel_on_signal();
    ingress.serve(router, addr, cancel).await?;

    tracing::info!("Anime server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config)?;
    let ingress = build_ingress(&config)?;
    if config.storage.kind == StorageKind::Sqlite {
        config
            .storage
            .resolved_url(&config.home_dir(), false)
            .context("invalid storage.url")?;
    }

    tracing::info!(
        users = ingress.config().users.len(),
        "Configuration is valid"
    );
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
