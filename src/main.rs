use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use gator::{AppState, Command, Commands, Config, Database};

/// A command-line RSS feed aggregator.
#[derive(Parser)]
#[clap(version, about)]
struct Cli {
    /// Path to the config file
    #[clap(long, short, env = "GATOR_CONFIG", default_value = "gator.toml", global = true)]
    config: PathBuf,

    /// Command to run (register, login, users, reset, agg, addfeed, feeds,
    /// follow, following, unfollow, browse, posts)
    command: String,

    /// Command arguments
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> gator::Result<()> {
    let config = Config::load_with_env(&cli.config)?;

    // Initialize logging
    if let Err(e) = gator::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        gator::logging::init_console_only(&config.logging.level);
    }

    debug!("Loaded config from {}", cli.config.display());

    let db = Database::open(&config.database.path).await?;
    info!("Database ready at {}", config.database.path);

    let state = AppState::new(config, cli.config, db)?;
    let commands = Commands::with_defaults();

    commands
        .run(&state, Command::new(cli.command, cli.args))
        .await
}
