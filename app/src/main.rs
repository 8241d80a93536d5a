//! Always Private command line
//!
//! Manages the whitelist the extension consults and replays navigations
//! through the interceptor.

mod commands;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use always_private_core::Config;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "always-private")]
#[command(about = "Open every site that is not whitelisted in a private window")]
struct Args {
    /// Config file path (JSON)
    #[arg(long, short = 'c', env = "ALWAYS_PRIVATE_CONFIG")]
    config: Option<PathBuf>,

    /// Settings database, overrides the config file
    #[arg(long, short = 'd')]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whitelist, one domain per line
    List,
    /// Whitelist one or more domains (URLs are reduced to their host)
    Add {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Remove a domain from the whitelist
    Remove { domain: String },
    /// Export the whitelist as a JSON array
    Export {
        /// File or directory to write to; stdout if omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Merge a JSON array of domains into the whitelist
    Import { file: PathBuf },
    /// Show what would happen to a top-level navigation to URL
    Check { url: String },
    /// Replay recorded request details (JSON array) through the interceptor
    Simulate { events: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    always_private_core::init_logging(args.verbose);

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.database_path = database;
    }
    tracing::debug!(database = %config.database_path.display(), "Using settings database");

    let state = AppState::new(config)?;
    let mut out = std::io::stdout().lock();

    match args.command {
        Command::List => commands::whitelist::list(&state, &mut out),
        Command::Add { domains } => commands::whitelist::add(&state, &domains, &mut out),
        Command::Remove { domain } => commands::whitelist::remove(&state, &domain, &mut out),
        Command::Export { output } => {
            commands::whitelist::export(&state, output.as_deref(), &mut out)
        }
        Command::Import { file } => commands::whitelist::import(&state, &file, &mut out),
        Command::Check { url } => commands::navigation::check(&state, &url, &mut out).map(|_| ()),
        Command::Simulate { events } => {
            commands::navigation::simulate(&state, &events, &mut out).map(|_| ())
        }
    }
}
