use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_ledger::api::state::AppState;
use league_ledger::config::AppConfig;
use league_ledger::matrix::MatrixScope;
use league_ledger::models::SeasonId;
use league_ledger::storage::{load_league, StorageConfig};
use league_ledger::League;

#[derive(Parser)]
#[command(name = "league-ledger")]
#[command(about = "Reconciled records and statistics for a fantasy football league")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the all-time records table
    Records,

    /// Print one view of a season
    Season {
        /// Season year
        season: String,

        #[arg(long, value_enum, default_value = "standings")]
        view: SeasonView,
    },

    /// Print an all-play matrix (career unless --season is given)
    AllPlay {
        #[arg(long)]
        season: Option<String>,
    },

    /// Print a head-to-head matrix (career unless --season is given)
    HeadToHead {
        #[arg(long)]
        season: Option<String>,
    },

    /// Print the career scoring consistency index
    Consistency,

    /// Print expected wins and luck (career unless --season is given)
    Luck {
        #[arg(long)]
        season: Option<String>,
    },

    /// Resolve a team name to its owner
    Resolve {
        #[arg(long)]
        season: String,

        #[arg(long, default_value = "0")]
        week: u32,

        #[arg(long)]
        name: String,
    },

    /// Load the data, run every query, and report diagnostics
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum SeasonView {
    Standings,
    Totals,
    Games,
    Luck,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_season(raw: &str) -> Result<SeasonId> {
    raw.parse()
        .with_context(|| format!("Invalid season: {}", raw))
}

fn scope(season: Option<&str>) -> Result<MatrixScope> {
    Ok(match season {
        Some(raw) => MatrixScope::Season(parse_season(raw)?),
        None => MatrixScope::Career,
    })
}

fn load(config: &AppConfig) -> Result<(StorageConfig, League)> {
    let storage = StorageConfig::new(config.data_dir.clone());
    let data = load_league(&storage)
        .with_context(|| format!("Failed to load league data from {:?}", storage.data_dir))?;
    Ok((storage, League::new(data, config.analysis)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting league-ledger v{}", env!("CARGO_PKG_VERSION"));

    let (storage, league) = load(&config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(storage, league);
            let app = league_ledger::api::build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Records => {
            print_json(league.all_time_records().as_slice())?;
        }
        Commands::Season { season, view } => {
            let season = parse_season(&season)?;
            if !league.has_season(season) {
                anyhow::bail!("Season {} not found", season);
            }
            match view {
                SeasonView::Standings => print_json(league.season_standings(season).as_slice())?,
                SeasonView::Totals => print_json(&league.season_totals(season))?,
                SeasonView::Games => print_json(league.season_games(season).as_slice())?,
                SeasonView::Luck => {
                    print_json(league.luck_table(MatrixScope::Season(season)).as_slice())?
                }
            }
        }
        Commands::AllPlay { season } => {
            let matrix = league.all_play_matrix(scope(season.as_deref())?);
            match matrix.as_ref() {
                Some(m) => print_json(m)?,
                None => eprintln!("No all-play data available"),
            }
        }
        Commands::HeadToHead { season } => {
            let matrix = league.head_to_head_matrix(scope(season.as_deref())?);
            match matrix.as_ref() {
                Some(m) => print_json(m)?,
                None => eprintln!("No head-to-head data available"),
            }
        }
        Commands::Consistency => {
            print_json(league.career_consistency_index().as_slice())?;
        }
        Commands::Luck { season } => {
            print_json(league.luck_table(scope(season.as_deref())?).as_slice())?;
        }
        Commands::Resolve { season, week, name } => {
            let season = parse_season(&season)?;
            match league.resolve_owner(season, week, &name) {
                Some(owner) => println!("{}", owner),
                None => println!("(unresolved)"),
            }
        }
        Commands::Validate => {
            let seasons = league.seasons();
            for summary in &seasons {
                let season = summary.season;
                league.season_totals(season);
                league.season_games(season);
                league.all_play_matrix(MatrixScope::Season(season));
                league.head_to_head_matrix(MatrixScope::Season(season));
                league.luck_table(MatrixScope::Season(season));
            }
            let records = league.all_time_records();
            league.all_play_matrix(MatrixScope::Career);
            league.head_to_head_matrix(MatrixScope::Career);
            league.career_consistency_index();
            league.career_luck();

            println!("\n=== Validation ===");
            println!("Owners:           {}", league.data().owners.len());
            println!("Seasons:          {}", seasons.len());
            println!(
                "With weekly data: {}",
                seasons.iter().filter(|s| s.has_weekly_data).count()
            );
            println!("All-time rows:    {}", records.len());

            let summary = league.diagnostics().summary();
            if summary.is_empty() {
                println!("\nNo data-quality issues found");
            } else {
                println!("\nDiagnostics:");
                for (reason, count) in summary {
                    println!("  - {:<24} {}", reason, count);
                }
            }
        }
    }

    Ok(())
}
