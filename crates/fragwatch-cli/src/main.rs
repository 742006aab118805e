use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fragwatch_telemetry::TelemetryService;

#[derive(Debug, Parser)]
#[command(name = "fragwatch")]
#[command(about = "Region server telemetry: scraped listings fused with player ratings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List in-region servers from the browser scrape (cache-checked).
    Servers,
    /// Show one server's scraped record by address.
    Server { address: String },
    /// Fetch the rating-enhanced player list for a server address.
    Players { address: String },
    /// Fetch the merged basic+enhanced view for a server address.
    Merged { address: String },
    /// Show combined cache occupancy.
    CacheStats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = fragwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let service = TelemetryService::from_config(&config)?;

    let outcome = tokio::select! {
        result = run(cli.command, &service) => result,
        () = shutdown_signal() => {
            tracing::info!("received shutdown signal");
            Ok(())
        }
    };

    // Always release the browser process, interrupted or not.
    service.close_browser_session().await;
    outcome
}

async fn run(command: Commands, service: &TelemetryService) -> anyhow::Result<()> {
    match command {
        Commands::Servers => print_json(&service.fetch_region_servers().await?),
        Commands::Server { address } => print_json(&service.get_server_details(&address).await?),
        Commands::Players { address } => {
            print_json(&service.fetch_enhanced_players(&address).await?)
        }
        Commands::Merged { address } => {
            let basic = service.get_server_details(&address).await?;
            print_json(&service.get_enhanced_server_data(&address, basic.as_ref()).await)
        }
        Commands::CacheStats => print_json(&service.cache_stats()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
