//! Web server command.

use console::style;

use super::helpers::build_scraper;
use crate::config::Config;
use crate::server::AppState;

/// Start the scrape API server.
pub async fn cmd_serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let scraper = build_scraper(config)?;

    if let Some(path) = &config.source_path {
        println!(
            "{} Using config {}",
            style("→").cyan(),
            style(path.display()).dim()
        );
    }
    println!(
        "{} Starting pagescout at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!(
        "  {} retries after timeout, {} user agents",
        scraper.max_retries(),
        config.user_agents.len()
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(AppState::new(scraper), host, port).await
}
