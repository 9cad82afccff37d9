use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod db;
mod models;
mod planner;

use commands::{ConfigCommand, MealCommand, ShiftCommand, SwapCommand};
use config::Config;
use db::{init_db, SqliteCalendar};
use planner::Planner;

#[derive(Parser)]
#[command(name = "menu")]
#[command(version)]
#[command(about = "A meal calendar with swap and shift planning", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage planned meals
    Meal(MealCommand),

    /// Exchange meals between two days
    Swap(SwapCommand),

    /// Push a day's meals forward
    Shift(ShiftCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Meal(cmd)) => {
            let planner = open_planner(&config).await?;
            cmd.run(&planner).await?;
        }
        Some(Commands::Swap(cmd)) => {
            let planner = open_planner(&config).await?;
            cmd.run(&planner).await?;
        }
        Some(Commands::Shift(cmd)) => {
            let planner = open_planner(&config).await?;
            cmd.run(&planner).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

async fn open_planner(config: &Config) -> Result<Planner<SqliteCalendar>, db::StoreError> {
    let pool = init_db(config.database_path.value.clone()).await?;
    Ok(Planner::new(SqliteCalendar::new(pool), config.classifier()))
}
