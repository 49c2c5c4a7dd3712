//! Command line front end for Vowkeeper, an Ironsworn character tracker.

mod commands;
mod prompt;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vk_roster::SessionConfig;

#[derive(Parser)]
#[command(
    name = "vk",
    about = "Vowkeeper - track your Ironsworn characters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding characters.json (default: $VOWKEEPER_DIR or the
    /// platform data directory)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed for generating character ids
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive session (the default)
    Play,

    /// List all characters
    List,

    /// Show a character sheet
    Show {
        /// Character name (case-insensitive)
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = SessionConfig::default();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let result = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => commands::play::run(config),
        Commands::List => commands::list::run(&config),
        Commands::Show { name } => commands::show::run(&config, &name),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
