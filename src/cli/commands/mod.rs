//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod helpers;
mod probe;
mod scrape;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "pagescout")]
#[command(about = "Headless-browser page scraping service")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the scrape API server
    Serve {
        /// Address to bind to
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,
    },

    /// Scrape a single URL and print the result as JSON
    Scrape {
        /// Page to scrape
        url: String,

        /// Retries after a navigation timeout (overrides config)
        #[arg(short, long)]
        retries: Option<u32>,
    },

    /// Send test requests to a running server
    Probe {
        /// Base URL of the server
        #[arg(long, short, env = "PAGESCOUT_URL", default_value = "http://localhost:3000")]
        server: String,

        /// URLs to request (defaults to a built-in smoke-test list)
        urls: Vec<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_explicit(path).await?,
        None => Config::load().await,
    };

    match cli.command {
        Commands::Serve { host, port } => serve::cmd_serve(&config, &host, port).await,
        Commands::Scrape { url, retries } => scrape::cmd_scrape(&config, &url, retries).await,
        Commands::Probe { server, urls } => probe::cmd_probe(&server, urls).await,
    }
}
