use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod domain;
mod graph;
mod services;
mod state;
mod theme;
mod tui;
mod ui;

#[cfg(test)]
mod test_utils;

use state::platform::paths;
use state::{App, AppConfig, StartupOptions};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "SEER_LOG";

const LOGO: &str = r"
 ___  ___  ___  _ __
/ __|/ _ \/ _ \| '__|
\__ \  __/  __/| |
|___/\___|\___||_|
";

/// seer - terminal bubble map of Sui wallet transfers
#[derive(Parser)]
#[command(version = VERSION, about, long_about = None)]
struct Cli {
    /// Wallet address to load on startup
    address: Option<String>,

    /// Transfer proxy base URL (serves /sent and /received)
    #[arg(long, value_name = "URL")]
    transfers_url: Option<String>,

    /// Sui JSON-RPC endpoint for name lookups and creator scans
    #[arg(long, value_name = "URL")]
    rpc_url: Option<String>,

    /// Write logs here instead of the default data directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration file path and the effective settings
    Config {
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
    /// Display version with ASCII art
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return run_subcommand(command);
    }

    init_logging(cli.log_file.clone());
    let startup = StartupOptions {
        address: cli.address,
        transfers_url: cli.transfers_url,
        rpc_url: cli.rpc_url,
    };
    let mut app = App::new(startup)?;

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;
    info!("seer exited");
    result
}

fn run_subcommand(command: &Commands) -> Result<()> {
    match command {
        Commands::Config { init } => {
            let path = AppConfig::config_path()?;
            if *init && !path.exists() {
                AppConfig::default().save()?;
                println!("Wrote default configuration");
            }
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&AppConfig::load())?);
        }
        Commands::Version => {
            println!("{LOGO}");
            println!("seer v{VERSION}");
            println!("A terminal bubble map for Sui wallet transfers");
        }
    }
    Ok(())
}

/// Sends tracing output to a file so it never draws over the UI.
///
/// Logging is skipped when no log file can be opened.
fn init_logging(log_file: Option<PathBuf>) {
    let Some(path) = log_file.or_else(|| paths::log_file().ok()) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    if installed.is_err() {
        return;
    }
    info!(version = VERSION, log = %path.display(), "seer starting");
}
