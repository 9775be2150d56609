use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use therabot_lib::{
    closest_connection, list_connections, Config, ConnectionCache, ConnectionRefresher, EsiClient,
    RefreshSchedule, RouteDecision, RoutePlanner, ScoutClient, ShipClass, SsoClient,
    StaticSystemIds, TokenCache, TokenRefresher, WormholeConnection,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "TheraBot wormhole directory utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and list every current Thera connection.
    Connections,
    /// Find the closest connection to a system and report the jump count.
    Closest {
        /// System name to search for.
        #[arg(long)]
        system: String,
    },
    /// Suggest the best route between two systems via Thera.
    Route {
        /// The starting system.
        #[arg(long = "from")]
        from: String,
        /// The destination system.
        #[arg(long = "to")]
        to: String,
        /// Ship class used to filter passable holes (e.g. battleship, freighter).
        #[arg(long)]
        ship: Option<String>,
        /// JSON file mapping system names to numeric ids for the gate comparison.
        #[arg(long)]
        system_ids: Option<PathBuf>,
    },
    /// Run the background refresh schedule until interrupted.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = Config::from_env().context("failed to read configuration")?;

    match cli.command {
        Command::Connections => handle_connections(&config).await,
        Command::Closest { system } => handle_closest(&config, &system).await,
        Command::Route {
            from,
            to,
            ship,
            system_ids,
        } => handle_route(&config, &from, &to, ship.as_deref(), system_ids.as_deref()).await,
        Command::Watch => handle_watch(&config).await,
    }
}

async fn handle_connections(config: &Config) -> Result<()> {
    let scout = ScoutClient::with_api_url(config.scout_api_url.clone())?;
    let cache = ConnectionCache::new();
    ConnectionRefresher::new(scout, cache.clone()).run_once().await;

    let listings = list_connections(&cache)
        .await
        .context("failed to list Thera connections")?;

    println!("Thera connections ({}):", listings.len());
    for listing in listings {
        let system = &listing.connection.destination_solar_system;
        println!(
            "{} ({:.2}) {}",
            system.name, system.security, system.region.name
        );
        println!("  Size: {}", listing.size);
        println!("  EOL Status: {}", listing.connection.wormhole_eol);
        println!("  Mass Status: {}", listing.connection.wormhole_mass);
        println!("  Out Sig: {}", listing.connection.signature_id);
        println!(
            "  In Sig: {}",
            listing.connection.wormhole_destination_signature_id
        );
        match listing.hours_remaining {
            Some(hours) => println!("  Est. Life: ~{hours} hours remain"),
            None => println!("  Est. Life: unknown"),
        }
    }
    Ok(())
}

async fn handle_closest(config: &Config, system: &str) -> Result<()> {
    let scout = ScoutClient::with_api_url(config.scout_api_url.clone())?;
    let connection = closest_connection(&scout, system)
        .await
        .with_context(|| format!("failed to find a connection near {system}"))?;

    println!(
        "Closest connection to {system}: {} jumps",
        connection.jumps
    );
    print_connection(&connection);
    Ok(())
}

async fn handle_route(
    config: &Config,
    from: &str,
    to: &str,
    ship: Option<&str>,
    system_ids: Option<&Path>,
) -> Result<()> {
    let ship_class = ship.and_then(ShipClass::parse);
    if let (Some(raw), None) = (ship, ship_class) {
        tracing::debug!(ship = raw, "unrecognized ship class; no restriction applied");
    }

    let scout = ScoutClient::with_api_url(config.scout_api_url.clone())?;
    let esi = EsiClient::with_base_url(config.esi_base_url.clone())?;
    let ids = load_system_ids(system_ids)?;

    let tokens = TokenCache::new();
    if let Some(credentials) = config.sso_credentials.clone() {
        let sso = SsoClient::with_token_url(config.sso_token_url.clone(), credentials)?;
        TokenRefresher::new(sso, tokens.clone()).run_once().await;
    }

    let planner = RoutePlanner::new(scout, esi, tokens, Arc::new(ids));
    let decision = planner
        .plan(from, to, ship_class)
        .await
        .with_context(|| format!("failed to plan a route from {from} to {to}"))?;

    match decision {
        RouteDecision::Shortcut {
            source_leg,
            destination_leg,
            wormhole_jumps,
            gate_jumps,
        } => {
            println!("Take Thera: {wormhole_jumps} jumps total");
            match gate_jumps {
                Some(gate) => println!("Gate route: {gate} jumps"),
                None => println!("Gate route: not compared (token or system ids unavailable)"),
            }
            println!("Entry near {from}:");
            print_connection(&source_leg);
            println!("Exit near {to}:");
            print_connection(&destination_leg);
        }
        RouteDecision::GateFaster {
            wormhole_jumps,
            gate_jumps,
        } => {
            println!(
                "Gate route is faster ({gate_jumps} vs {wormhole_jumps} jumps); no shortcut suggested"
            );
        }
        RouteDecision::Equal { jumps } => {
            println!("Equal distance ({jumps} jumps); no shortcut suggested");
        }
    }
    Ok(())
}

async fn handle_watch(config: &Config) -> Result<()> {
    let scout = ScoutClient::with_api_url(config.scout_api_url.clone())?;
    let connections = ConnectionCache::new();
    let tokens = TokenCache::new();

    let mut schedule = RefreshSchedule::new().with_task(RefreshSchedule::connection_task(
        ConnectionRefresher::new(scout, connections.clone()),
        config.connection_refresh,
    ));
    if let Some(credentials) = config.sso_credentials.clone() {
        let sso = SsoClient::with_token_url(config.sso_token_url.clone(), credentials)?;
        schedule = schedule.with_task(RefreshSchedule::token_task(
            TokenRefresher::new(sso, tokens.clone()),
            config.token_refresh,
        ));
    } else {
        tracing::info!("no sso credentials configured; token refresh disabled");
    }

    schedule.on_ready();
    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for interrupt")?;
    schedule.on_disconnected();

    println!(
        "Stopped after {} directory refreshes and {} token refreshes",
        connections.fetch_count().await,
        tokens.fetch_count().await
    );
    Ok(())
}

fn load_system_ids(path: Option<&Path>) -> Result<StaticSystemIds> {
    let Some(path) = path else {
        return Ok(StaticSystemIds::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read system id map {}", path.display()))?;
    let entries: HashMap<String, u64> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse system id map {}", path.display()))?;
    Ok(StaticSystemIds::new(entries))
}

fn print_connection(connection: &WormholeConnection) {
    let system = &connection.destination_solar_system;
    println!(
        "  {} ({:.2}) {}",
        system.name, system.security, system.region.name
    );
    println!("  Size: {}", connection.size());
    println!("  Out Sig: {}", connection.signature_id);
    println!("  In Sig: {}", connection.wormhole_destination_signature_id);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
