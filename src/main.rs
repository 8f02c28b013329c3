use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gridscout::adapters::{EspnClient, SleeperClient};
use gridscout::agent::{LlmClient, LlmConfig, PlayerAdvisor};
use gridscout::aggregator::Aggregator;
use gridscout::api::{create_router, AppState};
use gridscout::config::AppConfig;
use gridscout::error::Result;

#[derive(Parser)]
#[command(name = "gridscout", about = "NFL player identity resolution and analysis", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Override the configured listen port
        #[arg(long, env = "GRIDSCOUT_PORT")]
        port: Option<u16>,
    },
    /// Look up a player across providers and print the merged record
    Player {
        /// Player name, full or partial
        name: String,
    },
    /// Look up a player and run a start/sit analysis
    Analyze {
        /// Player name, full or partial
        name: String,
    },
    /// Print the roster for an ESPN team id
    Roster {
        /// ESPN team id, e.g. 12 for the Chiefs
        team_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Player { name }) => {
            init_logging_simple();
            run_player_mode(&name).await?;
        }
        Some(Commands::Analyze { name }) => {
            init_logging_simple();
            run_analyze_mode(&name).await?;
        }
        Some(Commands::Roster { team_id }) => {
            init_logging_simple();
            run_roster_mode(&team_id).await?;
        }
        Some(Commands::Serve { port }) => {
            init_logging();
            run_server(port).await?;
        }
        None => {
            init_logging();
            run_server(None).await?;
        }
    }

    Ok(())
}

struct Clients {
    config: AppConfig,
    espn: Arc<EspnClient>,
    sleeper: Arc<SleeperClient>,
}

fn build_clients() -> Result<Clients> {
    let config = AppConfig::load()?;
    let espn = Arc::new(EspnClient::new(&config.providers)?);
    let sleeper = Arc::new(SleeperClient::new(&config.providers)?);
    Ok(Clients {
        config,
        espn,
        sleeper,
    })
}

fn build_advisor(config: &AppConfig) -> Result<Option<Arc<PlayerAdvisor>>> {
    let llm_config = LlmConfig::from_env(&config.advisor);
    if !llm_config.is_configured() {
        return Ok(None);
    }
    let llm = LlmClient::new(llm_config)?;
    Ok(Some(Arc::new(PlayerAdvisor::new(llm))))
}

async fn run_server(port_override: Option<u16>) -> Result<()> {
    let clients = build_clients()?;
    let port = port_override.unwrap_or(clients.config.api.port);

    let advisor = build_advisor(&clients.config)?;
    if advisor.is_none() {
        info!("ADVISOR_API_KEY not set, analysis endpoints will return 503");
    }

    let aggregator = Arc::new(Aggregator::new(
        clients.espn.clone(),
        clients.sleeper.clone(),
    ));
    let state = AppState::new(aggregator, clients.espn, advisor);
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(%addr, "starting API server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn run_player_mode(name: &str) -> Result<()> {
    let clients = build_clients()?;
    let aggregator = Aggregator::new(clients.espn.clone(), clients.sleeper);

    let record = aggregator.aggregate(name).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(espn_id) = &record.provider_ids.espn {
        use gridscout::provider::IdentitySource;
        let status = clients.espn.get_status(espn_id).await;
        println!("\nESPN injury status: {}", status);
    }

    Ok(())
}

async fn run_analyze_mode(name: &str) -> Result<()> {
    let clients = build_clients()?;
    let advisor = build_advisor(&clients.config)?.ok_or_else(|| {
        gridscout::error::ScoutError::AdvisorNotConfigured(
            "set ADVISOR_API_KEY to run analysis".to_string(),
        )
    })?;

    let aggregator = Aggregator::new(clients.espn.clone(), clients.sleeper);
    let record = aggregator.aggregate(name).await?;

    let matchup = match record.attributes.get("teamId").and_then(|v| v.as_str()) {
        Some(team_id) => clients.espn.team_schedule(team_id).await.ok(),
        None => None,
    };

    let analysis = advisor.analyze(&record, matchup.as_ref()).await?;

    println!("Player: {} ({}, {})", record.display_name, record.position, record.team);
    println!("Status: {}", record.status);
    println!();
    println!(
        "Recommendation: {} (confidence: {})",
        analysis.recommendation, analysis.confidence
    );
    println!("Projected points: {:.1}", analysis.projected_points);
    if !analysis.key_factors.is_empty() {
        println!("Key factors:");
        for factor in &analysis.key_factors {
            println!("  - {}", factor);
        }
    }
    if !analysis.summary.is_empty() {
        println!("\n{}", analysis.summary);
    }

    Ok(())
}

async fn run_roster_mode(team_id: &str) -> Result<()> {
    let clients = build_clients()?;
    let roster = clients.espn.team_roster(team_id).await?;

    if roster.is_empty() {
        println!("No roster entries for team {}", team_id);
        return Ok(());
    }

    for slot in &roster {
        println!("{:<6} {:<4} {}", slot.id, slot.position, slot.display_name);
    }
    println!("\n{} players", roster.len());

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gridscout=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn init_logging_simple() {
    // Minimal logging for CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
