mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "birthday-board")]
#[command(about = "Show today's and this month's birthdays from a published spreadsheet")]
#[command(version)]
struct Cli {
    /// Log more detail to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sheet once and print the board
    Show {
        /// Sheet CSV URL (overrides sheet_url from config)
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Read a local CSV file instead of fetching the sheet
        #[arg(long)]
        file: Option<PathBuf>,

        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Print the render plan as JSON instead of drawing it
        #[arg(long)]
        json: bool,
    },
    /// Keep the board on screen, reloading the sheet periodically
    Watch {
        /// Sheet CSV URL (overrides sheet_url from config)
        #[arg(long)]
        url: Option<String>,

        /// Reload interval (e.g. "30s", "5m")
        #[arg(short, long)]
        interval: Option<String>,

        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the config file location and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show {
            url,
            file,
            date,
            json,
        } => {
            let reference = commands::parse_reference(date.as_deref())?;
            commands::show::run(url, file, reference, json).await
        }
        Commands::Watch {
            url,
            interval,
            date,
        } => {
            let reference = commands::parse_reference(date.as_deref())?;
            commands::watch::run(url, interval, reference).await
        }
        Commands::Config => commands::config::run(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
